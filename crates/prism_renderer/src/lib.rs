//! Prism renderer - CPU path tracing with progressive photon mapping.
//!
//! Camera paths branch stochastically at every surface (opaque, specular,
//! or transmitting), gathering direct light through shadow rays. Photons
//! follow the same branching from the lights and are stored at opaque hits
//! in a k-d tree, which the progressive gather queries with a shrinking
//! radius every pass.

mod bucket;
mod bvh;
mod camera;
mod dielectric;
mod error;
mod film;
mod intersect;
mod photon;
mod photon_map;
mod progressive;
mod renderer;
mod sampling;
mod shading;
mod surface;
mod tracer;
mod triangle;

pub use bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
pub use bvh::{BvhAccel, BvhNode};
pub use camera::{Camera, Projection};
pub use dielectric::{exit_direction, refract_direction, trace_through_medium, ExitRay, RAY_EPSILON};
pub use error::RenderError;
pub use film::{clamp_color, color_to_rgb, linear_to_gamma, FrameBuffer};
pub use intersect::{Hit, Intersector};
pub use photon::{EmissionStats, Photon, PhotonEmitter};
pub use photon_map::{Nearest, PhotonMap};
pub use progressive::{GatherStats, ProgressiveGather, RayHitPoint, MIN_RADIUS};
pub use renderer::{PassReport, PhotonConfig, RenderConfig, Renderer};
pub use sampling::{gen_f32, path_rng, random_on_hemisphere, random_unit_vector, stream_seed};
pub use shading::{
    direct_lighting, roughen_reflection, sample_event, surface_response, SurfaceEvent, SHADOW_EPSILON,
};
pub use surface::{interpolate_normal, SceneView, SurfaceHit};
pub use tracer::{PathTracer, VisiblePoint};
pub use triangle::Triangle;

/// Re-export common types from prism_core and prism_math
pub use prism_core::{Color, Material, PointLight, Scene};
pub use prism_math::{Interval, Ray, Vec3};
