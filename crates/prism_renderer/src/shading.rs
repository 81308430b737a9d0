//! Surface shading model.
//!
//! Lambertian diffuse plus a Phong-like gloss lobe for direct lighting,
//! the stochastic opaque/specular/transmit branch, and roughened reflection
//! sampling shared by camera paths and photons.

use std::f32::consts::PI;

use prism_core::{Color, Material, PointLight};
use prism_math::{angle_between, reflect, rotate_towards, Ray, Vec3};
use rand::RngCore;

use crate::intersect::Intersector;
use crate::sampling::{gen_f32, random_on_hemisphere};

/// Near bound of shadow rays, in world units from the shaded point.
pub const SHADOW_EPSILON: f32 = 0.01;

/// Lights closer than this to the shaded point contribute nothing.
const MIN_LIGHT_DISTANCE: f32 = 1e-4;

/// What a surface does with an arriving ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Opaque: direct lighting plus an optional indirect bounce
    Diffuse,
    /// Dielectric reflection along the roughened mirror direction
    Specular,
    /// Dielectric transmission through the medium
    Transmit,
}

/// Pick the surface event for `material`.
///
/// No random number is drawn when the material has no glassiness or the
/// path is at its depth limit; those cases are always [`SurfaceEvent::Diffuse`].
/// Translucency is only sampled once the dielectric branch has been taken.
pub fn sample_event(material: &Material, at_depth_limit: bool, rng: &mut dyn RngCore) -> SurfaceEvent {
    if material.glassiness <= 0.0 || at_depth_limit {
        return SurfaceEvent::Diffuse;
    }
    if gen_f32(rng) > material.glassiness {
        return SurfaceEvent::Diffuse;
    }
    if material.translucency <= 0.0 || gen_f32(rng) > material.translucency {
        SurfaceEvent::Specular
    } else {
        SurfaceEvent::Transmit
    }
}

/// Mirror reflection of `incident` about `normal`, blurred by `roughness`.
///
/// A random direction on the normal's hemisphere is drawn and the mirror
/// direction is rotated toward it by `roughness` times the angle between
/// them: zero gives a perfect mirror, one a uniformly random hemisphere
/// direction. A random direction is drawn even for zero roughness so the
/// number of draws per bounce does not depend on the material.
pub fn roughen_reflection(incident: Vec3, normal: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let mirror = reflect(incident, normal).normalize_or_zero();
    let random = random_on_hemisphere(normal, rng);
    if roughness <= 0.0 {
        return mirror;
    }
    let angle = angle_between(mirror, random) * roughness;
    rotate_towards(mirror, random, angle).normalize_or_zero()
}

/// Radiance reflected toward the viewer from one unoccluded light.
///
/// `light_colour` is the attenuated light colour already scaled by the
/// facing ratio. `view` is the roughened reflection direction and `to_light`
/// the unit direction toward the light.
pub fn surface_response(material: &Material, view: Vec3, to_light: Vec3, light_colour: Color) -> Color {
    let diffuse = material.albedo * light_colour / PI;
    let highlight = view.dot(to_light).clamp(0.0, 1.0);
    let gloss = if material.glossiness > 0.0 {
        light_colour * highlight.powf(material.gloss_falloff) * material.glossiness
    } else {
        Color::ZERO
    };
    diffuse + gloss
}

/// Direct illumination of `point` by `light`.
///
/// Back-facing lights return zero without casting a shadow ray. The shadow
/// ray spans from [`SHADOW_EPSILON`] to the light position.
pub fn direct_lighting<I: Intersector + ?Sized>(
    intersector: &I,
    point: Vec3,
    normal: Vec3,
    view: Vec3,
    light: &PointLight,
    material: &Material,
) -> Color {
    let to_light = light.direction_from(point);
    let distance = to_light.length();
    if !(distance > MIN_LIGHT_DISTANCE) {
        return Color::ZERO;
    }
    let to_light_unit = to_light / distance;

    let facing = to_light_unit.dot(normal);
    if facing <= 0.0 {
        return Color::ZERO;
    }

    let shadow = Ray::with_range(point, to_light, SHADOW_EPSILON / distance, 1.0);
    if intersector.occluded(&shadow) {
        return Color::ZERO;
    }

    let light_colour = light.colour * light.intensity * facing / (4.0 * PI * distance * distance);
    surface_response(material, view, to_light_unit, light_colour)
}
