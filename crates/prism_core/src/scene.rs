//! Scene assembly: meshes placed in the world with materials, plus lights.
//!
//! Meshes are shared through `Arc` so the same geometry can be attached
//! several times (two rods from one rod mesh). The scene owns the handles;
//! a render only borrows the scene.

use std::sync::Arc;

use prism_math::Vec3;

use crate::error::SceneError;
use crate::light::PointLight;
use crate::material::Material;
use crate::mesh::Mesh;

/// Index of an attached object, assigned in attachment order.
pub type GeometryId = u32;

/// A mesh placed in the world with its material.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub material: Material,
    /// World-space offset added to every vertex
    pub translation: Vec3,
}

impl SceneObject {
    /// World-space vertex positions of face `face`.
    #[inline]
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        self.mesh.triangle(face).map(|p| p + self.translation)
    }
}

/// A complete scene: attached geometry and point lights.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<PointLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `mesh` at `position` and return its geometry id.
    pub fn attach_mesh(
        &mut self,
        name: impl Into<String>,
        mesh: Arc<Mesh>,
        material: Material,
        position: Vec3,
    ) -> GeometryId {
        let id = self.objects.len() as GeometryId;
        self.objects.push(SceneObject {
            name: name.into(),
            mesh,
            material,
            translation: position,
        });
        id
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: GeometryId) -> Option<&SceneObject> {
        self.objects.get(id as usize)
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }

    /// Validate all meshes, materials, and lights.
    pub fn validate(&self) -> Result<(), SceneError> {
        for object in &self.objects {
            object.mesh.validate(&object.name)?;
            object.material.validate(&object.name)?;
        }

        for (index, light) in self.lights.iter().enumerate() {
            if !light.intensity.is_finite() || light.intensity < 0.0 {
                return Err(SceneError::InvalidLight {
                    index,
                    reason: "intensity must be finite and non-negative",
                });
            }
            if !light.colour.is_finite() || light.colour.min_element() < 0.0 {
                return Err(SceneError::InvalidLight {
                    index,
                    reason: "colour must be finite and non-negative",
                });
            }
            if !light.position.is_finite() {
                return Err(SceneError::InvalidLight {
                    index,
                    reason: "position must be finite",
                });
            }
        }

        Ok(())
    }
}
