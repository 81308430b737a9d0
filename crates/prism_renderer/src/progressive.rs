//! Stochastic progressive photon gathering.
//!
//! Each camera sample's first opaque hit becomes a [`RayHitPoint`] that lives
//! for the whole render. Every photon pass gathers the photons around it,
//! then shrinks its radius and rescales its flux so that the density
//! estimate stays consistent while the radius goes to zero.

use std::f32::consts::PI;

use prism_core::{Color, Material};
use prism_math::Vec3;
use rayon::prelude::*;

use crate::film::FrameBuffer;
use crate::photon_map::PhotonMap;
use crate::tracer::VisiblePoint;

/// Smallest search radius a hit point starts from.
pub const MIN_RADIUS: f32 = 1e-4;

/// Persistent gather state for one camera sample.
#[derive(Debug, Clone, Copy)]
pub struct RayHitPoint {
    pub position: Vec3,
    pub normal: Vec3,
    pub incident: Vec3,
    pub material: Material,
    /// Image coordinates of the sample that created this point
    pub pixel: (u32, u32),
    /// Throughput from the camera to this point
    pub weight: Color,
    /// Current search radius; zero until the first gather finds photons
    pub radius: f32,
    pub photon_count: u64,
    /// Accumulated (already reflected) flux
    pub flux: Color,
}

impl RayHitPoint {
    pub fn new(visible: VisiblePoint, pixel: (u32, u32)) -> Self {
        Self {
            position: visible.position,
            normal: visible.normal,
            incident: visible.incident,
            material: visible.material,
            pixel,
            weight: visible.weight,
            radius: 0.0,
            photon_count: 0,
            flux: Color::ZERO,
        }
    }

    /// Gather from `map` and apply the progressive radius update.
    ///
    /// Returns the number of photons accepted this pass.
    pub fn gather(&mut self, map: &PhotonMap, initial_neighbours: usize, alpha: f32) -> u64 {
        let photons = if self.radius > 0.0 {
            map.within_radius(self.position, self.radius)
        } else {
            let nearest = map.nearest(self.position, initial_neighbours);
            if nearest.photons.is_empty() {
                return 0;
            }
            self.radius = nearest.max_distance.max(MIN_RADIUS);
            nearest.photons
        };

        let mut added = 0u64;
        let mut new_flux = Color::ZERO;
        for photon in photons {
            let facing = photon.incoming.dot(self.normal);
            if facing > 0.0 {
                new_flux += self.material.albedo * facing * photon.flux / PI;
                added += 1;
            }
        }

        if added == 0 {
            return 0;
        }

        let kept = self.photon_count + ((added as f32 * alpha).round() as u64).max(1);
        let ratio = kept as f32 / (self.photon_count + added) as f32;

        self.radius *= ratio.sqrt();
        self.flux = (self.flux + new_flux) * ratio;
        self.photon_count = kept;
        added
    }

    /// Radiance estimate after `passes` photon passes, each of which
    /// carried the full light power.
    pub fn estimate(&self, passes: u32) -> Color {
        if passes == 0 || self.radius <= 0.0 {
            return Color::ZERO;
        }
        let estimate = self.weight * self.flux / (PI * self.radius * self.radius * passes as f32);
        if estimate.is_finite() {
            estimate
        } else {
            Color::ZERO
        }
    }
}

/// Summary of one gather pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GatherStats {
    /// Photons accepted over all hit points
    pub gathered: u64,
    /// Mean search radius over hit points that have one
    pub mean_radius: f32,
}

/// All hit points of a render and the pass counter.
pub struct ProgressiveGather {
    points: Vec<RayHitPoint>,
    initial_neighbours: usize,
    alpha: f32,
    passes: u32,
}

impl ProgressiveGather {
    pub fn new(points: Vec<RayHitPoint>, initial_neighbours: usize, alpha: f32) -> Self {
        Self {
            points,
            initial_neighbours,
            alpha,
            passes: 0,
        }
    }

    pub fn points(&self) -> &[RayHitPoint] {
        &self.points
    }

    /// Completed gather passes.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Gather from `map` at every hit point in parallel.
    pub fn gather_pass(&mut self, map: &PhotonMap) -> GatherStats {
        let k = self.initial_neighbours;
        let alpha = self.alpha;
        let gathered = self
            .points
            .par_iter_mut()
            .map(|point| point.gather(map, k, alpha))
            .sum::<u64>();
        self.passes += 1;

        let (radius_sum, with_radius) = self
            .points
            .iter()
            .filter(|p| p.radius > 0.0)
            .fold((0.0f64, 0usize), |(sum, n), p| (sum + p.radius as f64, n + 1));
        let mean_radius = if with_radius > 0 {
            (radius_sum / with_radius as f64) as f32
        } else {
            0.0
        };

        GatherStats {
            gathered,
            mean_radius,
        }
    }

    /// Add every hit point's estimate to its pixel, divided by the number of
    /// camera samples per pixel.
    pub fn accumulate(&self, frame: &mut FrameBuffer, samples_per_pixel: u32) {
        let scale = 1.0 / samples_per_pixel.max(1) as f32;
        for point in &self.points {
            let (x, y) = point.pixel;
            frame.add(x, y, point.estimate(self.passes) * scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon::Photon;
    use crate::sampling::gen_f32;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// `n` photons spread uniformly over [-1, 1]^2 on the y = 0 plane,
    /// arriving from above and carrying unit power in total.
    fn plane_photons(n: usize, seed: u64) -> PhotonMap {
        let mut rng = StdRng::seed_from_u64(seed);
        let photons = (0..n)
            .map(|_| Photon {
                position: Vec3::new(gen_f32(&mut rng) * 2.0 - 1.0, 0.0, gen_f32(&mut rng) * 2.0 - 1.0),
                incoming: Vec3::Y,
                flux: Color::ONE / n as f32,
                bounces: 1,
            })
            .collect();
        PhotonMap::build(photons)
    }

    fn hit_point(x: f32, z: f32) -> RayHitPoint {
        RayHitPoint::new(
            VisiblePoint {
                position: Vec3::new(x, 0.0, z),
                normal: Vec3::Y,
                incident: -Vec3::Y,
                material: Material::diffuse(Color::ONE),
                weight: Color::ONE,
            },
            (0, 0),
        )
    }

    fn grid_points() -> Vec<RayHitPoint> {
        let mut points = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                points.push(hit_point(i as f32 * 0.1 - 0.45, j as f32 * 0.1 - 0.45));
            }
        }
        points
    }

    fn variance(values: &[f32]) -> f32 {
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
    }

    #[test]
    fn test_first_gather_uses_nearest_neighbours() {
        let map = plane_photons(2000, 1);
        let mut point = hit_point(0.0, 0.0);

        let added = point.gather(&map, 20, 0.75);
        assert_eq!(added, 20);
        // 20 found, 15 kept
        assert_eq!(point.photon_count, 15);
        assert!(point.radius > 0.0);

        let expected_radius = map.nearest(point.position, 20).max_distance * (15.0f32 / 20.0).sqrt();
        assert!((point.radius - expected_radius).abs() < 1e-6);
    }

    #[test]
    fn test_back_facing_photons_are_ignored() {
        let photons = vec![Photon {
            position: Vec3::ZERO,
            incoming: -Vec3::Y,
            flux: Color::ONE,
            bounces: 1,
        }];
        let map = PhotonMap::build(photons);
        let mut point = hit_point(0.0, 0.0);

        assert_eq!(point.gather(&map, 20, 0.75), 0);
        assert_eq!(point.photon_count, 0);
        assert_eq!(point.flux, Color::ZERO);
    }

    #[test]
    fn test_empty_map_leaves_point_untouched() {
        let map = PhotonMap::build(Vec::new());
        let mut point = hit_point(0.0, 0.0);
        assert_eq!(point.gather(&map, 20, 0.75), 0);
        assert_eq!(point.radius, 0.0);
        assert_eq!(point.estimate(1), Color::ZERO);
    }

    #[test]
    fn test_radius_never_grows() {
        let mut gather = ProgressiveGather::new(grid_points(), 20, 0.75);
        let mut previous: Vec<f32> = vec![f32::INFINITY; gather.points().len()];

        for pass in 0..15 {
            gather.gather_pass(&plane_photons(2000, 100 + pass));
            for (point, prev) in gather.points().iter().zip(previous.iter_mut()) {
                assert!(point.radius <= *prev);
                *prev = point.radius;
            }
        }
        assert_eq!(gather.passes(), 15);
    }

    #[test]
    fn test_estimate_converges_with_falling_variance() {
        let mut gather = ProgressiveGather::new(grid_points(), 20, 0.75);

        // Unit power over an area of 4, white Lambertian surface
        let expected = 0.25 / PI;

        gather.gather_pass(&plane_photons(2000, 1));
        let first: Vec<f32> = gather.points().iter().map(|p| p.estimate(gather.passes()).x).collect();

        for pass in 1..30 {
            gather.gather_pass(&plane_photons(2000, 1 + pass));
        }
        let last: Vec<f32> = gather.points().iter().map(|p| p.estimate(gather.passes()).x).collect();

        let mean = last.iter().sum::<f32>() / last.len() as f32;
        assert!((mean - expected).abs() < expected * 0.1, "mean {mean}, expected {expected}");
        assert!(variance(&last) < variance(&first) * 0.5);
    }

    #[test]
    fn test_accumulate_divides_by_samples() {
        let map = plane_photons(2000, 7);
        let mut points = vec![hit_point(0.0, 0.0), hit_point(0.1, 0.0)];
        for p in &mut points {
            p.pixel = (1, 0);
        }
        let mut gather = ProgressiveGather::new(points, 20, 0.75);
        gather.gather_pass(&map);

        let mut frame = FrameBuffer::new(2, 1);
        gather.accumulate(&mut frame, 2);

        let expected = (gather.points()[0].estimate(1) + gather.points()[1].estimate(1)) / 2.0;
        assert!((frame.get(1, 0) - expected).length() < 1e-6);
        assert_eq!(frame.get(0, 0), Color::ZERO);
    }
}
