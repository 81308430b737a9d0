//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The default Intersection Provider: every attached mesh is flattened into
//! world-space triangles once, before any trace begins, and queried
//! read-only afterwards.

use prism_core::Scene;
use prism_math::{Aabb, Interval, Ray};

use crate::intersect::{Hit, Intersector};
use crate::triangle::Triangle;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with triangles.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of triangles.
    Leaf { triangles: Vec<Triangle>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of triangles.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        if triangles.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(triangles)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: partition triangles around the median
    /// centroid on the longest centroid axis, recurse on both halves.
    fn build(mut triangles: Vec<Triangle>) -> Self {
        let n = triangles.len();

        let bounds = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| Aabb::surrounding(&acc, &t.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                triangles,
                bbox: bounds,
            };
        }

        let centroids: Vec<_> = triangles.iter().map(|t| t.bounding_box().centroid()).collect();
        let axis = Aabb::enclosing(&centroids).longest_axis();

        let mid = n / 2;
        triangles.select_nth_unstable_by(mid, |a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_triangles = triangles.split_off(mid);
        let left = Self::build(triangles);
        let right = Self::build(right_triangles);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Nearest hit within `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { triangles, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<(f32, &Triangle)> = None;
                for triangle in triangles {
                    let max = closest.map_or(ray_t.max, |(t, _)| t);
                    if let Some(t) = triangle.intersect(ray, Interval::new(ray_t.min, max)) {
                        closest = Some((t, triangle));
                    }
                }
                closest.map(|(t, triangle)| triangle.hit_at(t))
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |h| h.distance);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    /// True as soon as any triangle lies within `ray_t`.
    pub fn any_hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf { triangles, bbox } => {
                bbox.hit(ray, ray_t) && triangles.iter().any(|t| t.intersect(ray, ray_t).is_some())
            }
            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t) && (left.any_hit(ray, ray_t) || right.any_hit(ray, ray_t))
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// BVH over all triangles of a scene.
pub struct BvhAccel {
    root: BvhNode,
    triangle_count: usize,
}

impl BvhAccel {
    /// Flatten every attached mesh into world-space triangles and build the
    /// hierarchy. Zero-area faces are skipped.
    ///
    /// Assumes the scene has been validated (face indices in range).
    pub fn build(scene: &Scene) -> Self {
        let start = std::time::Instant::now();
        let mut triangles = Vec::with_capacity(scene.triangle_count());
        let mut degenerate = 0usize;

        for (geom_id, object) in scene.objects().iter().enumerate() {
            for face in 0..object.mesh.triangle_count() {
                match Triangle::new(object.triangle(face), geom_id as u32, face as u32) {
                    Some(triangle) => triangles.push(triangle),
                    None => degenerate += 1,
                }
            }
        }

        if degenerate > 0 {
            log::warn!("Skipped {} degenerate (zero-area) triangles", degenerate);
        }

        let triangle_count = triangles.len();
        let root = BvhNode::new(triangles);
        log::info!(
            "Built BVH over {} triangles from {} objects in {:.2?}",
            triangle_count,
            scene.objects().len(),
            start.elapsed()
        );

        Self {
            root,
            triangle_count,
        }
    }

    /// Number of triangles committed to the hierarchy.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn bounding_box(&self) -> Aabb {
        self.root.bounding_box()
    }
}

impl Intersector for BvhAccel {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.root.hit(ray, ray.range)
    }

    fn occluded(&self, ray: &Ray) -> bool {
        self.root.any_hit(ray, ray.range)
    }
}
