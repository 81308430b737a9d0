//! Photon emission.
//!
//! Photons leave each point light in uniformly random directions and follow
//! the same opaque/specular/transmit branching as camera paths. Every opaque
//! hit stores a copy of the photon before it bounces on.

use std::f32::consts::PI;

use prism_core::{Color, PointLight};
use prism_math::{reflect, Ray, Vec3};
use rand::RngCore;
use rayon::prelude::*;

use crate::dielectric::{trace_through_medium, RAY_EPSILON};
use crate::sampling::{path_rng, random_unit_vector, PHOTON_STREAM};
use crate::shading::{roughen_reflection, sample_event, SurfaceEvent};
use crate::surface::SceneView;

/// Photons traced per rayon task.
const EMIT_BATCH_SIZE: u64 = 4096;

/// A stored photon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    /// Deposit location
    pub position: Vec3,
    /// Unit direction back toward where the photon came from
    pub incoming: Vec3,
    pub flux: Color,
    /// Surface interactions before this deposit; zero for light arriving
    /// straight from the source
    pub bounces: u32,
}

impl Photon {
    /// True for a deposit at the photon's first hit, which carries the same
    /// light a shadow ray measures.
    pub fn is_direct(&self) -> bool {
        self.bounces == 0
    }
}

/// Counts from one emission pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmissionStats {
    /// Photons launched, over all lights
    pub emitted: u64,
    /// Deposits recorded (one photon may deposit several times)
    pub stored: usize,
}

/// Traces photons from the lights of a scene.
#[derive(Clone, Copy)]
pub struct PhotonEmitter<'a> {
    view: SceneView<'a>,
    max_bounces: u32,
}

impl<'a> PhotonEmitter<'a> {
    pub fn new(view: SceneView<'a>, max_bounces: u32) -> Self {
        Self { view, max_bounces }
    }

    /// Emit `photons_per_light` photons from every light in the scene.
    ///
    /// Photon `i` of light `l` draws from its own generator, seeded from
    /// `seed`, `pass`, and its global index, and the deposits are returned in
    /// photon order. The result is identical for any thread count.
    pub fn emit(&self, photons_per_light: u64, seed: u64, pass: u32) -> (Vec<Photon>, EmissionStats) {
        let lights = self.view.scene.lights();
        let mut photons = Vec::new();
        let stream = PHOTON_STREAM.wrapping_add(pass as u64);

        for (light_index, light) in lights.iter().enumerate() {
            let first = light_index as u64 * photons_per_light;
            photons.extend(self.emit_light(light, photons_per_light, first, seed, stream));
        }

        let stats = EmissionStats {
            emitted: photons_per_light * lights.len() as u64,
            stored: photons.len(),
        };
        (photons, stats)
    }

    /// Emit `count` photons from one light. Each carries `1/count` of the
    /// light's power.
    pub fn emit_light(&self, light: &PointLight, count: u64, first: u64, seed: u64, stream: u64) -> Vec<Photon> {
        if count == 0 {
            return Vec::new();
        }
        let flux = light.power() / count as f32;
        let batches = count.div_ceil(EMIT_BATCH_SIZE);

        let per_batch: Vec<Vec<Photon>> = (0..batches)
            .into_par_iter()
            .map(|batch| {
                let start = batch * EMIT_BATCH_SIZE;
                let end = (start + EMIT_BATCH_SIZE).min(count);
                let mut out = Vec::new();
                for i in start..end {
                    let mut rng = path_rng(seed, stream, first + i);
                    let direction = random_unit_vector(&mut rng);
                    let ray = Ray::with_range(light.position, direction, 0.0, f32::INFINITY);
                    self.trace_photon(&ray, flux, 0, &mut rng, &mut out);
                }
                out
            })
            .collect();

        per_batch.into_iter().flatten().collect()
    }

    /// Follow one photon, appending its deposits to `out`.
    pub fn trace_photon(&self, ray: &Ray, flux: Color, depth: u32, rng: &mut dyn RngCore, out: &mut Vec<Photon>) {
        if !flux.is_finite() || flux == Color::ZERO {
            return;
        }
        let Some(surface) = self.view.hit(ray) else {
            return;
        };
        let material = surface.material;
        let at_depth_limit = depth >= self.max_bounces;

        let reflection = roughen_reflection(surface.incident, surface.normal, material.roughness, rng);

        match sample_event(material, at_depth_limit, rng) {
            SurfaceEvent::Diffuse => {
                out.push(Photon {
                    position: surface.point,
                    incoming: -surface.incident,
                    flux,
                    bounces: depth,
                });

                if !at_depth_limit && material.light_reflection > 0.0 {
                    let bounced = flux * material.albedo / PI * material.light_reflection;
                    let bounce = Ray::with_range(surface.point, reflection, RAY_EPSILON, f32::INFINITY);
                    self.trace_photon(&bounce, bounced, depth + 1, rng, out);
                }
            }

            SurfaceEvent::Specular => {
                let bounce = Ray::with_range(surface.point, reflection, RAY_EPSILON, f32::INFINITY);
                self.trace_photon(&bounce, flux * material.albedo, depth + 1, rng, out);
            }

            SurfaceEvent::Transmit => {
                let incident = reflect(reflection, surface.normal);
                if let Some(exit) = trace_through_medium(
                    &self.view,
                    surface.point,
                    surface.normal,
                    incident,
                    material.refractive_index,
                    depth + 1,
                    self.max_bounces,
                ) {
                    self.trace_photon(&exit.ray, flux * material.albedo, exit.depth, rng, out);
                }
            }
        }
    }
}
