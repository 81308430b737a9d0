//! World-space triangle primitive for the BVH.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use prism_core::GeometryId;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::intersect::Hit;

/// Twice-area threshold below which a triangle is considered degenerate.
const DEGENERATE_AREA: f32 = 1e-12;

/// A triangle primitive tagged with the object and face it came from.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    geom_id: GeometryId,
    prim_id: u32,
    /// Bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle, or `None` if it has (near) zero area and therefore
    /// no defined normal.
    pub fn new(vertices: [Vec3; 3], geom_id: GeometryId, prim_id: u32) -> Option<Self> {
        let [v0, v1, v2] = vertices;
        let cross = (v1 - v0).cross(v2 - v0);
        if !(cross.length_squared() > DEGENERATE_AREA) {
            return None;
        }

        Some(Self {
            v0,
            v1,
            v2,
            normal: cross.normalize(),
            geom_id,
            prim_id,
            bbox: Aabb::enclosing(&vertices),
        })
    }

    /// Ray parameter of the intersection inside `ray_t`, if any.
    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-10 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        ray_t.contains(t).then_some(t)
    }

    /// Build the hit record for an accepted parameter `t`.
    #[inline]
    pub fn hit_at(&self, t: f32) -> Hit {
        Hit {
            geom_id: self.geom_id,
            prim_id: self.prim_id,
            distance: t,
            geom_normal: self.normal,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_triangle() -> Triangle {
        // Triangle in XY plane at z=-1, wound to face +Z
        Triangle::new(
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ],
            3,
            7,
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = tri.intersect(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((t - 1.0).abs() < 0.001);

        let hit = tri.hit_at(t);
        assert_eq!((hit.geom_id, hit.prim_id), (3, 7));
        assert!((hit.geom_normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_hit_with_unnormalized_direction() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));

        let t = tri.intersect(&ray, Interval::new(0.0, 1.0)).unwrap();
        assert!((t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = facing_triangle();

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&ray, Interval::new(0.001, f32::INFINITY)).is_none());

        // Hit lies beyond the far bound
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray, Interval::new(0.001, 0.5)).is_none());
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let collinear = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert!(Triangle::new(collinear, 0, 0).is_none());

        let collapsed = [Vec3::ONE; 3];
        assert!(Triangle::new(collapsed, 0, 0).is_none());
    }
}
