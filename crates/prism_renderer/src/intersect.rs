//! Intersection Provider interface.
//!
//! The light transport code only ever asks two questions of the geometry:
//! "what is the nearest surface along this ray?" and "is anything in the
//! way along this segment?". Anything answering both can drive a render.

use prism_core::GeometryId;
use prism_math::{Ray, Vec3};

/// Nearest-surface result of an intersection query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Object the triangle belongs to (attachment order)
    pub geom_id: GeometryId,
    /// Face index within that object's mesh
    pub prim_id: u32,
    /// Ray parameter of the hit, in multiples of the ray direction
    pub distance: f32,
    /// Unit geometric normal, outward by winding (not flipped toward the ray)
    pub geom_normal: Vec3,
}

/// Trait for acceleration structures that answer ray queries.
pub trait Intersector: Send + Sync {
    /// Nearest hit with `distance` inside `ray.range`, if any.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    /// True if any surface lies inside `ray.range`.
    fn occluded(&self, ray: &Ray) -> bool;
}

impl<T: Intersector + ?Sized> Intersector for &T {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        (**self).intersect(ray)
    }

    fn occluded(&self, ray: &Ray) -> bool {
        (**self).occluded(ray)
    }
}
