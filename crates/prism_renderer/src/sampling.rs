//! Random sampling helpers and per-path seeding.
//!
//! Every camera sample and every photon gets its own `StdRng`, seeded from
//! the render seed, a stream tag, and the path index. Work can then be split
//! across threads in any order without changing a single random draw.

use prism_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Stream tag for camera samples.
pub const CAMERA_STREAM: u64 = 0x6361_6d65_7261;
/// Stream tag for photon paths. Each pass offsets it by the pass index.
pub const PHOTON_STREAM: u64 = 0x7068_6f74_6f6e;

/// Uniform `f32` in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project to the surface
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-8 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniform direction on the hemisphere around `normal`.
pub fn random_on_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let v = random_unit_vector(rng);
    if v.dot(normal) < 0.0 {
        -v
    } else {
        v
    }
}

/// SplitMix64 finalizer.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Derive a well-mixed seed for path `index` of `stream`.
pub fn stream_seed(base: u64, stream: u64, index: u64) -> u64 {
    mix(mix(base ^ mix(stream)) ^ index)
}

/// RNG for path `index` of `stream`.
pub fn path_rng(base: u64, stream: u64, index: u64) -> StdRng {
    StdRng::seed_from_u64(stream_seed(base, stream, index))
}
