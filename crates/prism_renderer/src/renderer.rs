//! Render orchestration.
//!
//! Two entry points share one camera pass:
//! - [`Renderer::render_direct`]: multisampled path tracing, deterministic
//!   for a given seed
//! - [`Renderer::render_progressive`]: the camera pass records a hit point
//!   per sample, then each photon pass emits, rebuilds the photon map,
//!   gathers, and hands a finished frame to the caller
//!
//! Phases never overlap. Within a phase work is split across rayon tasks
//! and merged back in a fixed order.

use std::time::{Duration, Instant};

use prism_core::{Color, Scene};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
use crate::bvh::BvhAccel;
use crate::camera::Camera;
use crate::error::RenderError;
use crate::film::FrameBuffer;
use crate::intersect::Intersector;
use crate::photon::PhotonEmitter;
use crate::photon_map::PhotonMap;
use crate::progressive::{ProgressiveGather, RayHitPoint};
use crate::sampling::{path_rng, CAMERA_STREAM};
use crate::surface::SceneView;
use crate::tracer::PathTracer;

/// Photon mapping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    /// Photons emitted from each light per pass
    pub photons_per_light: u64,
    /// Maximum bounces per photon path
    pub max_bounces: u32,
    /// Number of progressive photon passes
    pub passes: u32,
    /// k for the nearest-neighbour query that sets each initial radius
    pub initial_neighbours: usize,
    /// Fraction of newly gathered photons kept by the radius update
    pub alpha: f32,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            photons_per_light: 100_000,
            max_bounces: 8,
            passes: 8,
            initial_neighbours: 20,
            alpha: 0.75,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Camera samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Interpolate vertex normals where meshes carry them
    pub smooth_shading: bool,
    /// Color returned when a ray doesn't hit anything
    pub background: Color,
    pub seed: u64,
    /// Tile edge length for the parallel camera pass
    pub bucket_size: u32,
    pub photons: PhotonConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
            samples_per_pixel: 5,
            max_depth: 4,
            smooth_shading: true,
            background: Color::ZERO,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            photons: PhotonConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return fail("image resolution must be non-zero");
        }
        if self.samples_per_pixel == 0 {
            return fail("samples_per_pixel must be at least 1");
        }
        if self.bucket_size == 0 {
            return fail("bucket_size must be at least 1");
        }
        if !self.background.is_finite() {
            return fail("background must be finite");
        }
        if !(self.photons.alpha > 0.0 && self.photons.alpha <= 1.0) {
            return fail("photon alpha must lie in (0, 1]");
        }
        if self.photons.initial_neighbours == 0 {
            return fail("initial_neighbours must be at least 1");
        }
        Ok(())
    }
}

fn fail(msg: &str) -> Result<(), RenderError> {
    Err(RenderError::Config(msg.to_string()))
}

/// What happened during one photon pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassReport {
    /// Zero-based pass index
    pub pass: u32,
    /// Total passes requested
    pub passes: u32,
    pub photons_emitted: u64,
    /// Deposits at every opaque hit, first hits from the light included
    pub photons_stored: usize,
    /// Indirect photons accepted by the hit points
    pub photons_gathered: u64,
    /// Mean search radius after the radius update
    pub mean_radius: f32,
    pub emit_time: Duration,
    pub build_time: Duration,
    pub gather_time: Duration,
}

/// Output of the camera pass.
struct CameraPass {
    frame: FrameBuffer,
    hit_points: Vec<RayHitPoint>,
}

/// A configured render of one scene.
pub struct Renderer<'a> {
    scene: &'a Scene,
    intersector: Box<dyn Intersector + 'a>,
    camera: Camera,
    config: RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Validate everything and build the default BVH intersector.
    pub fn new(scene: &'a Scene, camera: Camera, config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        scene.validate()?;

        let accel = BvhAccel::build(scene);
        if accel.triangle_count() == 0 {
            return Err(RenderError::NoGeometry);
        }

        Self::assemble(scene, Box::new(accel), camera, config)
    }

    /// Like [`Renderer::new`], with a caller-supplied intersector that must
    /// have been built over `scene`.
    pub fn with_intersector(
        scene: &'a Scene,
        intersector: impl Intersector + 'a,
        camera: Camera,
        config: RenderConfig,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        scene.validate()?;
        Self::assemble(scene, Box::new(intersector), camera, config)
    }

    fn assemble(
        scene: &'a Scene,
        intersector: Box<dyn Intersector + 'a>,
        mut camera: Camera,
        config: RenderConfig,
    ) -> Result<Self, RenderError> {
        camera
            .validate()
            .map_err(|msg| RenderError::Config(msg.to_string()))?;
        camera.initialize(config.width, config.height);

        Ok(Self {
            scene,
            intersector,
            camera,
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn view(&self) -> SceneView<'_> {
        SceneView::new(self.scene, self.intersector.as_ref(), self.config.smooth_shading)
    }

    /// Multisampled path-traced image.
    pub fn render_direct(&self) -> FrameBuffer {
        let start = Instant::now();
        let pass = self.camera_pass(true, false);
        log::info!(
            "Rendered {}x{} at {} spp in {:.2?}",
            self.config.width,
            self.config.height,
            self.config.samples_per_pixel,
            start.elapsed()
        );
        pass.frame
    }

    /// Progressive photon-mapped render.
    ///
    /// `on_pass` receives every intermediate frame; an error from it stops
    /// the render and is returned unchanged. Scenes without lights, or
    /// configs with zero passes, fall back to a single direct frame.
    pub fn render_progressive<E, F>(&self, mut on_pass: F) -> Result<FrameBuffer, E>
    where
        F: FnMut(&PassReport, &FrameBuffer) -> Result<(), E>,
    {
        let photons = &self.config.photons;
        if photons.passes == 0 || self.scene.lights().is_empty() || photons.photons_per_light == 0 {
            log::warn!("No photon passes to run; rendering direct lighting only");
            let frame = self.render_direct();
            on_pass(&PassReport::default(), &frame)?;
            return Ok(frame);
        }

        let start = Instant::now();
        let camera = self.camera_pass(false, true);
        log::info!(
            "Camera pass: {} hit points in {:.2?}",
            camera.hit_points.len(),
            start.elapsed()
        );

        let emitter = PhotonEmitter::new(self.view(), photons.max_bounces);
        let mut gather = ProgressiveGather::new(camera.hit_points, photons.initial_neighbours, photons.alpha);
        let mut last = None;

        for pass in 0..photons.passes {
            let t = Instant::now();
            let (mut deposits, stats) = emitter.emit(photons.photons_per_light, self.config.seed, pass);
            let emit_time = t.elapsed();

            // The camera frame already holds the shadow-ray direct term
            deposits.retain(|photon| !photon.is_direct());

            let t = Instant::now();
            let map = PhotonMap::build(deposits);
            let build_time = t.elapsed();

            let t = Instant::now();
            let gathered = gather.gather_pass(&map);
            let gather_time = t.elapsed();
            drop(map);

            let mut frame = camera.frame.clone();
            gather.accumulate(&mut frame, self.config.samples_per_pixel);

            let report = PassReport {
                pass,
                passes: photons.passes,
                photons_emitted: stats.emitted,
                photons_stored: stats.stored,
                photons_gathered: gathered.gathered,
                mean_radius: gathered.mean_radius,
                emit_time,
                build_time,
                gather_time,
            };
            log::info!(
                "Pass {}/{}: emitted {} photons ({} stored) in {:.2?}, map built in {:.2?}, gathered {} in {:.2?}",
                pass + 1,
                photons.passes,
                report.photons_emitted,
                report.photons_stored,
                emit_time,
                build_time,
                report.photons_gathered,
                gather_time
            );
            log::debug!("Pass {} mean search radius {:.5}", pass + 1, report.mean_radius);

            on_pass(&report, &frame)?;
            last = Some(frame);
        }

        log::info!("Progressive render finished in {:.2?}", start.elapsed());
        Ok(last.unwrap_or(camera.frame))
    }

    /// Trace every camera sample, bucket by bucket in parallel.
    ///
    /// Sample `s` of pixel `(x, y)` always draws from the same generator,
    /// so the result does not depend on scheduling. Hit points come back in
    /// bucket order, pixel order within a bucket.
    fn camera_pass(&self, diffuse_bounce: bool, collect_hit_points: bool) -> CameraPass {
        let config = &self.config;
        let tracer = PathTracer::new(self.view(), config.max_depth, config.background)
            .with_diffuse_bounce(diffuse_bounce);
        let buckets = generate_buckets(config.width, config.height, config.bucket_size);

        let results: Vec<(Bucket, Vec<Color>, Vec<RayHitPoint>)> = buckets
            .par_iter()
            .map(|bucket| {
                let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
                let mut hit_points = Vec::new();

                for (x, y) in bucket.pixels() {
                    let mut sum = Color::ZERO;
                    for s in 0..config.samples_per_pixel {
                        let index = (y as u64 * config.width as u64 + x as u64)
                            * config.samples_per_pixel as u64
                            + s as u64;
                        let mut rng = path_rng(config.seed, CAMERA_STREAM, index);
                        let ray = self.camera.get_ray(x, y, &mut rng);

                        let mut visible = None;
                        sum += tracer.radiance(&ray, &mut rng, &mut visible);

                        if collect_hit_points {
                            if let Some(point) = visible {
                                hit_points.push(RayHitPoint::new(point, (x, y)));
                            }
                        }
                    }
                    pixels.push(sum / config.samples_per_pixel as f32);
                }

                (*bucket, pixels, hit_points)
            })
            .collect();

        let mut frame = FrameBuffer::new(config.width, config.height);
        let mut hit_points = Vec::new();
        for (bucket, pixels, points) in results {
            for ((x, y), colour) in bucket.pixels().zip(pixels) {
                frame.set(x, y, colour);
            }
            hit_points.extend(points);
        }

        CameraPass { frame, hit_points }
    }
}
