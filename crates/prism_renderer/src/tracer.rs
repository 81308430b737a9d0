//! Recursive path tracer.
//!
//! One entry point, [`PathTracer::trace`], branches on the sampled
//! [`SurfaceEvent`] at every hit: opaque hits gather direct light and may
//! bounce, specular hits recurse along the roughened reflection, and
//! transmitting hits walk through the medium before recursing.

use prism_core::{Color, Material};
use prism_math::{reflect, Ray, Vec3};
use rand::RngCore;

use crate::dielectric::{trace_through_medium, RAY_EPSILON};
use crate::shading::{direct_lighting, roughen_reflection, sample_event, SurfaceEvent};
use crate::surface::SceneView;

/// First opaque hit of a camera path, kept for photon gathering.
#[derive(Debug, Clone, Copy)]
pub struct VisiblePoint {
    pub position: Vec3,
    pub normal: Vec3,
    pub incident: Vec3,
    pub material: Material,
    /// Product of the albedo weights between the camera and this point
    pub weight: Color,
}

/// Path tracer over a scene view.
#[derive(Clone, Copy)]
pub struct PathTracer<'a> {
    view: SceneView<'a>,
    max_depth: u32,
    background: Color,
    diffuse_bounce: bool,
}

impl<'a> PathTracer<'a> {
    pub fn new(view: SceneView<'a>, max_depth: u32, background: Color) -> Self {
        Self {
            view,
            max_depth,
            background,
            diffuse_bounce: true,
        }
    }

    /// Enable or disable the indirect bounce at opaque hits.
    ///
    /// The progressive renderer turns it off: its photon estimate supplies
    /// the indirect light instead.
    pub fn with_diffuse_bounce(mut self, enabled: bool) -> Self {
        self.diffuse_bounce = enabled;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Radiance arriving along `ray`.
    ///
    /// `depth` counts the bounces already taken. At `max_depth` a hit is
    /// always shaded as opaque and returns direct light only. The first
    /// opaque hit is written to `visible` if it is still empty; `weight` is
    /// the throughput recorded with it.
    pub fn trace(
        &self,
        ray: &Ray,
        depth: u32,
        weight: Color,
        rng: &mut dyn RngCore,
        visible: &mut Option<VisiblePoint>,
    ) -> Color {
        let Some(surface) = self.view.hit(ray) else {
            return self.background;
        };
        let material = surface.material;
        let at_depth_limit = depth >= self.max_depth;

        let reflection = roughen_reflection(surface.incident, surface.normal, material.roughness, rng);

        match sample_event(material, at_depth_limit, rng) {
            SurfaceEvent::Diffuse => {
                if visible.is_none() {
                    *visible = Some(VisiblePoint {
                        position: surface.point,
                        normal: surface.normal,
                        incident: surface.incident,
                        material: *material,
                        weight,
                    });
                }

                let mut colour: Color = self
                    .view
                    .scene
                    .lights()
                    .iter()
                    .map(|light| {
                        direct_lighting(
                            self.view.intersector,
                            surface.point,
                            surface.normal,
                            reflection,
                            light,
                            material,
                        )
                    })
                    .sum();

                if self.diffuse_bounce && !at_depth_limit && material.light_reflection > 0.0 {
                    let bounce = Ray::with_range(surface.point, reflection, RAY_EPSILON, f32::INFINITY);
                    let indirect = self.trace(
                        &bounce,
                        depth + 1,
                        weight * material.light_reflection,
                        rng,
                        visible,
                    );
                    colour += indirect * material.light_reflection;
                }

                colour
            }

            SurfaceEvent::Specular => {
                let bounce = Ray::with_range(surface.point, reflection, RAY_EPSILON, f32::INFINITY);
                self.trace(&bounce, depth + 1, weight * material.albedo, rng, visible) * material.albedo
            }

            SurfaceEvent::Transmit => {
                // Mirror the roughened reflection back below the surface so
                // roughness blurs the refracted ray as well
                let incident = reflect(reflection, surface.normal);
                match trace_through_medium(
                    &self.view,
                    surface.point,
                    surface.normal,
                    incident,
                    material.refractive_index,
                    depth + 1,
                    self.max_depth,
                ) {
                    Some(exit) => {
                        self.trace(&exit.ray, exit.depth, weight * material.albedo, rng, visible)
                            * material.albedo
                    }
                    None => Color::ZERO,
                }
            }
        }
    }

    /// Trace a camera ray from depth zero, replacing a non-finite result
    /// with black.
    pub fn radiance(&self, ray: &Ray, rng: &mut dyn RngCore, visible: &mut Option<VisiblePoint>) -> Color {
        let colour = self.trace(ray, 0, Color::ONE, rng, visible);
        if colour.is_finite() {
            colour
        } else {
            log::warn!("Discarded non-finite radiance sample {:?}", colour);
            Color::ZERO
        }
    }
}
