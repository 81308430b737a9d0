//! Hit resolution: from an intersection result to a shading frame.

use prism_core::{GeometryId, Material, Scene};
use prism_math::{Ray, Vec3};

use crate::intersect::{Hit, Intersector};

/// A scene paired with the intersector built over it.
///
/// Camera paths and photon paths both ask the same two questions, so they
/// share this view instead of carrying the pieces separately.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub scene: &'a Scene,
    pub intersector: &'a dyn Intersector,
    pub smooth_shading: bool,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene, intersector: &'a dyn Intersector, smooth_shading: bool) -> Self {
        Self {
            scene,
            intersector,
            smooth_shading,
        }
    }

    /// Nearest surface along `ray`, resolved into a shading frame.
    pub fn hit(&self, ray: &Ray) -> Option<SurfaceHit<'a>> {
        let hit = self.intersector.intersect(ray)?;
        SurfaceHit::resolve(self.scene, ray, &hit, self.smooth_shading)
    }

    pub fn occluded(&self, ray: &Ray) -> bool {
        self.intersector.occluded(ray)
    }
}

/// Everything the shading code needs to know about a surface hit.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit<'a> {
    /// World-space hit position
    pub point: Vec3,
    /// Unit shading normal, facing against the incoming ray
    pub normal: Vec3,
    /// Unit direction of the incoming ray
    pub incident: Vec3,
    pub material: &'a Material,
    pub geom_id: GeometryId,
    pub prim_id: u32,
}

impl<'a> SurfaceHit<'a> {
    /// Resolve `hit` against the scene it came from.
    ///
    /// Returns `None` if the geometry id is unknown to `scene`, which only
    /// happens when an intersector is paired with the wrong scene.
    pub fn resolve(scene: &'a Scene, ray: &Ray, hit: &Hit, smooth_shading: bool) -> Option<Self> {
        let object = scene.object(hit.geom_id)?;
        let incident = ray.direction.normalize_or_zero();
        let point = ray.at(hit.distance);

        let mut normal = hit.geom_normal;
        if smooth_shading {
            if let Some(vertex_normals) = object.mesh.triangle_normals(hit.prim_id as usize) {
                let vertices = object.triangle(hit.prim_id as usize);
                normal = interpolate_normal(vertices, vertex_normals, point, hit.geom_normal);
            }
        }

        if normal.dot(incident) > 0.0 {
            normal = -normal;
        }

        Some(Self {
            point,
            normal,
            incident,
            material: &object.material,
            geom_id: hit.geom_id,
            prim_id: hit.prim_id,
        })
    }
}

/// Barycentric blend of vertex normals at `point`.
///
/// Each weight is the signed area of the sub-triangle opposite a vertex
/// divided by the full signed area, so the weights sum to one. The result is
/// renormalized; if it degenerates, `geom_normal` is returned instead.
pub fn interpolate_normal(
    vertices: [Vec3; 3],
    vertex_normals: [Vec3; 3],
    point: Vec3,
    geom_normal: Vec3,
) -> Vec3 {
    let [a, b, c] = vertices;
    let n = (b - a).cross(c - a);
    let area2 = n.length_squared();
    if area2 <= f32::EPSILON {
        return geom_normal;
    }

    let wa = (c - b).cross(point - b).dot(n) / area2;
    let wb = (a - c).cross(point - c).dot(n) / area2;
    let wc = (b - a).cross(point - a).dot(n) / area2;

    let blended = vertex_normals[0].normalize_or_zero() * wa
        + vertex_normals[1].normalize_or_zero() * wb
        + vertex_normals[2].normalize_or_zero() * wc;

    let normal = blended.normalize_or_zero();
    if normal == Vec3::ZERO || !normal.is_finite() {
        geom_normal
    } else {
        normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Mesh;
    use prism_math::UVec3;
    use std::sync::Arc;

    const TRI: [Vec3; 3] = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn test_interpolate_at_vertex_returns_vertex_normal() {
        let normals = [
            Vec3::new(1.0, 0.0, 1.0).normalize(),
            Vec3::Z,
            Vec3::new(0.0, 1.0, 1.0).normalize(),
        ];
        let n = interpolate_normal(TRI, normals, TRI[0], Vec3::Z);
        assert!((n - normals[0]).length() < 1e-5);
    }

    #[test]
    fn test_interpolate_at_centroid_is_average() {
        let normals = [Vec3::X, Vec3::Y, Vec3::Z];
        let centroid = (TRI[0] + TRI[1] + TRI[2]) / 3.0;
        let n = interpolate_normal(TRI, normals, centroid, Vec3::Z);
        assert!((n - Vec3::ONE.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_interpolate_degenerate_blend_falls_back() {
        let normals = [Vec3::X, -Vec3::X, Vec3::ZERO];
        let midpoint = (TRI[0] + TRI[1]) / 2.0;
        let n = interpolate_normal(TRI, normals, midpoint, Vec3::Z);
        assert_eq!(n, Vec3::Z);
    }

    #[test]
    fn test_resolve_flips_normal_against_ray() {
        let mut scene = Scene::new();
        let mesh = Mesh::new(TRI.to_vec(), vec![UVec3::new(0, 1, 2)]);
        scene.attach_mesh("tri", Arc::new(mesh), Material::default(), Vec3::ZERO);

        // Ray from below travels along +Z into a +Z facing triangle
        let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::new(0.0, 0.0, 2.0));
        let hit = Hit {
            geom_id: 0,
            prim_id: 0,
            distance: 0.5,
            geom_normal: Vec3::Z,
        };

        let surface = SurfaceHit::resolve(&scene, &ray, &hit, false).unwrap();
        assert_eq!(surface.normal, -Vec3::Z);
        assert_eq!(surface.incident, Vec3::Z);
        assert!((surface.point - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_resolve_unknown_geometry() {
        let scene = Scene::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = Hit {
            geom_id: 3,
            prim_id: 0,
            distance: 1.0,
            geom_normal: Vec3::Z,
        };
        assert!(SurfaceHit::resolve(&scene, &ray, &hit, true).is_none());
    }
}
