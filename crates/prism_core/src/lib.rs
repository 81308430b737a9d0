//! Prism Core - scene data consumed by the renderer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Mesh` with per-face vertex and normal indices, plus a few
//!   procedural builders (quads, boxes, spheres)
//! - **Shading inputs**: `Material` coefficients and isotropic `PointLight`s
//! - **Scene assembly**: `Scene`, which attaches shared meshes at offsets and
//!   hands out geometry ids in attachment order
//!
//! Everything here is immutable once a render starts; the renderer only
//! borrows a `Scene` for the duration of a render call.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use prism_core::{Material, Mesh, PointLight, Scene};
//! use prism_math::Vec3;
//!
//! let mut scene = Scene::new();
//! let sphere = Arc::new(Mesh::uv_sphere(1.0, 32, 16));
//! scene.attach_mesh("ball", sphere, Material::diffuse(Vec3::ONE), Vec3::ZERO);
//! scene.add_light(PointLight::new(Vec3::new(0.0, 3.0, 1.0), Vec3::ONE, 300.0));
//! scene.validate()?;
//! ```

pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use error::SceneError;
pub use light::PointLight;
pub use material::{Color, Material};
pub use mesh::Mesh;
pub use scene::{GeometryId, Scene, SceneObject};
