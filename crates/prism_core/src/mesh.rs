//! Triangle mesh geometry.
//!
//! A mesh stores vertex positions, optional vertex normals, and two parallel
//! index lists: one triangle of position indices per face and, when normals
//! are present, one triangle of normal indices per face (OBJ-style). Faces
//! are wound counter-clockwise when viewed from the outside, so
//! `(v1 - v0) × (v2 - v0)` is the outward geometric normal.

use prism_math::{Aabb, UVec3, Vec3};

use crate::error::SceneError;

/// A triangle mesh with optional per-vertex normals for smooth shading.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Vertex normals (may be empty when smooth shading is unused)
    pub normals: Vec<Vec3>,

    /// Position indices, one triangle per face
    pub faces: Vec<UVec3>,

    /// Normal indices, one triangle per face (empty when `normals` is empty)
    pub normal_faces: Vec<UVec3>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and faces, without normals.
    pub fn new(positions: Vec<Vec3>, faces: Vec<UVec3>) -> Self {
        let bounds = Aabb::enclosing(&positions);
        Self {
            positions,
            normals: Vec::new(),
            faces,
            normal_faces: Vec::new(),
            bounds,
        }
    }

    /// Attach per-vertex normals and their face indices.
    pub fn with_normals(mut self, normals: Vec<Vec3>, normal_faces: Vec<UVec3>) -> Self {
        self.normals = normals;
        self.normal_faces = normal_faces;
        self
    }

    /// A single quad `a, b, c, d` (counter-clockwise seen from its front).
    pub fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Self::new(
            vec![a, b, c, d],
            vec![UVec3::new(0, 1, 2), UVec3::new(0, 2, 3)],
        )
    }

    /// Axis-aligned box between two corners, faces pointing outward.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let (lo, hi) = (min.min(max), min.max(max));
        let positions: Vec<Vec3> = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect();

        // Each side as four corner indices going around its face
        let sides: [[u32; 4]; 6] = [
            [0, 2, 6, 4], // -x
            [1, 3, 7, 5], // +x
            [0, 1, 5, 4], // -y
            [2, 3, 7, 6], // +y
            [0, 1, 3, 2], // -z
            [4, 5, 7, 6], // +z
        ];

        let center = (lo + hi) * 0.5;
        let mut faces = Vec::with_capacity(12);
        for [a, b, c, d] in sides {
            faces.push(outward(&positions, center, UVec3::new(a, b, c)));
            faces.push(outward(&positions, center, UVec3::new(a, c, d)));
        }

        Self::new(positions, faces)
    }

    /// UV sphere centered at the origin with analytic vertex normals.
    ///
    /// `segments` is the number of slices around the Y axis, `rings` the
    /// number of stacks from pole to pole. The poles are single vertices so
    /// no zero-area triangles are produced.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut positions = vec![Vec3::new(0.0, radius, 0.0)];
        for ring in 1..rings {
            let theta = std::f32::consts::PI * ring as f32 / rings as f32;
            for segment in 0..segments {
                let phi = std::f32::consts::TAU * segment as f32 / segments as f32;
                positions.push(
                    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius,
                );
            }
        }
        positions.push(Vec3::new(0.0, -radius, 0.0));

        let bottom = positions.len() as u32 - 1;
        let ring_start = |ring: u32| 1 + (ring - 1) * segments;
        let mut faces = Vec::new();

        for segment in 0..segments {
            let next = (segment + 1) % segments;

            // Top cap
            faces.push(UVec3::new(0, ring_start(1) + segment, ring_start(1) + next));

            // Body
            for ring in 1..rings - 1 {
                let a = ring_start(ring) + segment;
                let b = ring_start(ring) + next;
                let c = ring_start(ring + 1) + segment;
                let d = ring_start(ring + 1) + next;
                faces.push(UVec3::new(a, c, d));
                faces.push(UVec3::new(a, d, b));
            }

            // Bottom cap
            let last = ring_start(rings - 1);
            faces.push(UVec3::new(bottom, last + next, last + segment));
        }

        let faces: Vec<UVec3> = faces
            .into_iter()
            .map(|face| outward(&positions, Vec3::ZERO, face))
            .collect();
        let normals = positions.iter().map(|p| p.normalize_or_zero()).collect();
        let normal_faces = faces.clone();

        Self::new(positions, faces).with_normals(normals, normal_faces)
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Replaces any existing normals; normal faces then mirror the position
    /// faces. Face normals are area weighted (unnormalized cross products).
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in &self.faces {
            let [i0, i1, i2] = face.to_array().map(|i| i as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let [p0, p1, p2] = [self.positions[i0], self.positions[i1], self.positions[i2]];
            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = normals;
        self.normal_faces = self.faces.clone();
    }

    /// Check if the mesh has normals usable for smooth shading.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normal_faces.len() == self.faces.len()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertex positions of face `face`, in mesh space.
    ///
    /// Panics if the face or its indices are out of range; call
    /// [`Mesh::validate`] first.
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        self.faces[face].to_array().map(|i| self.positions[i as usize])
    }

    /// Vertex normals of face `face`, if the mesh carries normals.
    pub fn triangle_normals(&self, face: usize) -> Option<[Vec3; 3]> {
        if !self.has_normals() {
            return None;
        }
        let indices = self.normal_faces.get(face)?;
        let mut normals = [Vec3::ZERO; 3];
        for (slot, index) in normals.iter_mut().zip(indices.to_array()) {
            *slot = *self.normals.get(index as usize)?;
        }
        Some(normals)
    }

    /// Check every index list against the vertex and normal arrays.
    pub fn validate(&self, name: &str) -> Result<(), SceneError> {
        for (face, indices) in self.faces.iter().enumerate() {
            for index in indices.to_array() {
                if index as usize >= self.positions.len() {
                    return Err(SceneError::VertexIndexOutOfRange {
                        mesh: name.to_string(),
                        face,
                        index,
                        count: self.positions.len(),
                    });
                }
            }
        }

        if self.normal_faces.is_empty() {
            return Ok(());
        }

        if self.normal_faces.len() != self.faces.len() {
            return Err(SceneError::NormalFaceCountMismatch {
                mesh: name.to_string(),
                faces: self.faces.len(),
                normal_faces: self.normal_faces.len(),
            });
        }

        for (face, indices) in self.normal_faces.iter().enumerate() {
            for index in indices.to_array() {
                if index as usize >= self.normals.len() {
                    return Err(SceneError::NormalIndexOutOfRange {
                        mesh: name.to_string(),
                        face,
                        index,
                        count: self.normals.len(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Flip the winding of `face` if its normal points toward `center`.
fn outward(positions: &[Vec3], center: Vec3, face: UVec3) -> UVec3 {
    let [a, b, c] = face.to_array().map(|i| positions[i as usize]);
    let normal = (b - a).cross(c - a);
    let centroid = (a + b + c) / 3.0;

    if normal.dot(centroid - center) < 0.0 {
        UVec3::new(face.x, face.z, face.y)
    } else {
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &Mesh, face: usize) -> Vec3 {
        let [a, b, c] = mesh.triangle(face);
        (b - a).cross(c - a)
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![UVec3::new(0, 1, 2)],
        );

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
        assert!(mesh.triangle_normals(0).is_none());
    }

    #[test]
    fn test_quad_winding_faces_front() {
        // Floor quad seen from above
        let quad = Mesh::quad(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(-1.0, 0.0, -1.0),
        );

        assert_eq!(quad.triangle_count(), 2);
        for face in 0..2 {
            assert!(face_normal(&quad, face).y > 0.0);
        }
    }

    #[test]
    fn test_cuboid_faces_point_outward() {
        let cube = Mesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        for face in 0..cube.triangle_count() {
            let [a, b, c] = cube.triangle(face);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal(&cube, face).dot(centroid) > 0.0, "face {face} points inward");
        }
    }

    #[test]
    fn test_uv_sphere_is_closed_and_outward() {
        let sphere = Mesh::uv_sphere(2.0, 16, 8);

        // Two pole vertices plus (rings - 1) loops
        assert_eq!(sphere.vertex_count(), 2 + 7 * 16);
        // Two caps plus two triangles per body quad
        assert_eq!(sphere.triangle_count(), 2 * 16 + 2 * 16 * 6);
        assert!(sphere.has_normals());
        assert!(sphere.validate("sphere").is_ok());

        for face in 0..sphere.triangle_count() {
            let [a, b, c] = sphere.triangle(face);
            let n = face_normal(&sphere, face);
            assert!(n.length() > 0.0, "degenerate face {face}");
            assert!(n.dot(a + b + c) > 0.0, "face {face} points inward");
        }
        for normal in &sphere.normals {
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_compute_normals() {
        let mut mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![UVec3::new(0, 1, 2)],
        );
        mesh.compute_normals();

        assert!(mesh.has_normals());
        // CCW in the XY plane seen from +Z
        for normal in &mesh.normals {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
        assert_eq!(mesh.triangle_normals(0), Some([Vec3::Z; 3]));
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -2.0, -3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            vec![UVec3::new(0, 1, 2)],
        );

        assert!((mesh.bounds.x.min - (-1.0)).abs() < 0.001);
        assert!((mesh.bounds.y.max - 5.0).abs() < 0.001);
        assert!((mesh.bounds.z.max - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_validate_reports_bad_indices() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![UVec3::new(0, 1, 2)]);
        assert_eq!(
            mesh.validate("broken"),
            Err(SceneError::VertexIndexOutOfRange {
                mesh: "broken".to_string(),
                face: 0,
                index: 2,
                count: 2,
            })
        );

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![UVec3::new(0, 1, 2)])
            .with_normals(vec![Vec3::Z], vec![UVec3::new(0, 0, 1)]);
        assert!(matches!(
            mesh.validate("normals"),
            Err(SceneError::NormalIndexOutOfRange { index: 1, .. })
        ));

        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![UVec3::new(0, 1, 2)])
            .with_normals(vec![Vec3::Z], vec![]);
        assert!(mesh.validate("no normal faces").is_ok());
    }
}
