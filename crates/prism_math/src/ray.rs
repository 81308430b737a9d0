use crate::{Interval, Vec3};

/// A ray in 3D space with origin, direction, and a valid parameter range.
///
/// The direction is not required to be unit length. Intersection distances
/// are expressed in multiples of `direction`, which lets shadow rays use the
/// unnormalized point-to-light vector with a range of `(epsilon, 1.0]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Accepted hit distances along the ray
    pub range: Interval,
}

impl Ray {
    /// Create a ray accepting any hit in front of the origin.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            range: Interval::new(0.0, f32::INFINITY),
        }
    }

    /// Create a ray with explicit near/far bounds.
    pub fn with_range(origin: Vec3, direction: Vec3, near: f32, far: f32) -> Self {
        Self {
            origin,
            direction,
            range: Interval::new(near, far),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
        assert_eq!(ray.range.min, 0.0);
        assert_eq!(ray.range.max, f32::INFINITY);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_with_range() {
        let ray = Ray::with_range(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), 0.01, 1.0);

        assert_eq!(ray.range, Interval::new(0.01, 1.0));
        // t = 1 reaches the end of the unnormalized direction
        assert_eq!(ray.at(1.0), Vec3::new(0.0, 4.0, 0.0));
    }
}
