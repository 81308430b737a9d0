//! Transport through dielectric media.
//!
//! Entry and exit directions come straight from Snell's law, written as
//! rotations: the refracted ray is the inward normal turned toward the
//! incident direction by the refraction angle, and the exit ray is the
//! outward normal turned toward the interior direction by the exit angle.

use prism_math::{angle_between, reflect, rotate_towards, Ray, Vec3};

use crate::surface::SceneView;

/// Near bound of secondary rays, in world units.
pub const RAY_EPSILON: f32 = 0.01;

/// Ray leaving a medium, with the depth it continues at.
#[derive(Debug, Clone, Copy)]
pub struct ExitRay {
    pub ray: Ray,
    pub depth: u32,
}

/// Direction of a ray entering a medium of index `ior`.
///
/// `incident` is the unit travel direction and `normal` the unit surface
/// normal facing against it.
pub fn refract_direction(incident: Vec3, normal: Vec3, ior: f32) -> Vec3 {
    let incidence = angle_between(normal, -incident);
    let refraction = (incidence.sin() / ior).clamp(-1.0, 1.0).asin();
    rotate_towards(-normal, incident, refraction).normalize_or_zero()
}

/// Direction of a ray leaving a medium of index `ior`, or `None` on total
/// internal reflection.
///
/// `travel` is the unit interior direction and `outward` the unit normal
/// pointing out of the medium (so `travel · outward > 0`).
pub fn exit_direction(travel: Vec3, outward: Vec3, ior: f32) -> Option<Vec3> {
    let interior = angle_between(outward, travel);
    let exit_sin = ior * interior.sin();
    if exit_sin > 1.0 {
        return None;
    }
    Some(rotate_towards(outward, travel, exit_sin.clamp(-1.0, 1.0).asin()).normalize_or_zero())
}

/// Follow a ray through a medium from its entry point until it exits.
///
/// The walk starts at `depth` (already advanced past the entry hit) and
/// takes one more level per internal reflection. `None` means the depth
/// budget ran out inside the medium; such a path contributes nothing.
pub fn trace_through_medium(
    view: &SceneView<'_>,
    entry: Vec3,
    normal: Vec3,
    incident: Vec3,
    ior: f32,
    depth: u32,
    max_depth: u32,
) -> Option<ExitRay> {
    let mut origin = entry;
    let mut direction = refract_direction(incident, normal, ior);
    let mut depth = depth;

    loop {
        let ray = Ray::with_range(origin, direction, RAY_EPSILON, f32::INFINITY);
        let Some(surface) = view.hit(&ray) else {
            // Open mesh: the ray never meets the far side
            return Some(ExitRay { ray, depth });
        };

        let outward = -surface.normal;
        if let Some(exit) = exit_direction(direction, outward, ior) {
            return Some(ExitRay {
                ray: Ray::with_range(surface.point, exit, RAY_EPSILON, f32::INFINITY),
                depth,
            });
        }

        if depth >= max_depth {
            return None;
        }
        depth += 1;
        origin = surface.point;
        direction = reflect(direction, outward).normalize_or_zero();
    }
}
