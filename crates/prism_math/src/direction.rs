//! Direction-vector helpers shared by the shading and transport code.
//!
//! Every bounce in the renderer (mirror, roughened, refracted, exiting) is
//! expressed as a rotation of one unit vector toward another, so these three
//! functions carry most of the geometric reasoning.

use crate::{Quat, Vec3};

/// Reflect a vector about a normal.
///
/// `n` must be unit length; `v` keeps its length.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Angle in radians between two vectors of any length.
///
/// The cosine is clamped to [-1, 1] so rounding never feeds `acos` an
/// out-of-domain value.
#[inline]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    a.normalize_or_zero()
        .dot(b.normalize_or_zero())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Rotate `from` by `angle` radians within the plane spanned by `from` and
/// `towards`, turning it in the direction of `towards`.
///
/// The rotation axis is `from × towards`; by the right-hand rule a positive
/// angle moves `from` toward `towards`. When the two vectors are parallel
/// the plane is undefined and `from` is returned unchanged.
pub fn rotate_towards(from: Vec3, towards: Vec3, angle: f32) -> Vec3 {
    let axis = from.cross(towards);
    if axis.length_squared() < 1e-12 {
        return from;
    }
    Quat::from_axis_angle(axis.normalize(), angle) * from
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_reflect_about_plane() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let reflected = reflect(incoming, Vec3::Y);

        assert_eq!(reflected, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_reflect_is_symmetric_in_normal_sign() {
        let v = Vec3::new(0.3, -0.8, 0.2);
        let n = Vec3::new(0.0, 1.0, 0.0);

        assert!((reflect(v, n) - reflect(v, -n)).length() < 1e-6);
    }

    #[test]
    fn test_angle_between() {
        assert!((angle_between(Vec3::X, Vec3::Y) - FRAC_PI_2).abs() < 1e-6);
        assert!((angle_between(Vec3::X, Vec3::new(2.0, 2.0, 0.0)) - FRAC_PI_4).abs() < 1e-6);
        // Nearly parallel vectors must not produce NaN
        let a = Vec3::new(1.0, 1e-8, 0.0);
        assert!(angle_between(a, Vec3::X).is_finite());
    }

    #[test]
    fn test_rotate_towards_moves_toward_target() {
        let rotated = rotate_towards(Vec3::X, Vec3::Y, FRAC_PI_2);
        assert!((rotated - Vec3::Y).length() < 1e-6);

        let halfway = rotate_towards(Vec3::X, Vec3::Y, FRAC_PI_4);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((halfway - expected).length() < 1e-6);
    }

    #[test]
    fn test_rotate_towards_parallel_is_identity() {
        assert_eq!(rotate_towards(Vec3::Z, Vec3::Z * 3.0, 1.0), Vec3::Z);
    }

    #[test]
    fn test_rotate_towards_preserves_length() {
        let from = Vec3::new(0.0, 0.0, 1.0);
        let towards = Vec3::new(0.4, -0.7, 0.1);
        let rotated = rotate_towards(from, towards, 0.6);

        assert!((rotated.length() - 1.0).abs() < 1e-5);
        assert!((angle_between(from, rotated) - 0.6).abs() < 1e-4);
    }
}
