//! Validation errors for scene data.

use thiserror::Error;

/// Problems detected while validating a scene before rendering.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("Mesh '{mesh}': face {face} references vertex {index}, but only {count} vertices exist")]
    VertexIndexOutOfRange {
        mesh: String,
        face: usize,
        index: u32,
        count: usize,
    },

    #[error("Mesh '{mesh}': face {face} references normal {index}, but only {count} normals exist")]
    NormalIndexOutOfRange {
        mesh: String,
        face: usize,
        index: u32,
        count: usize,
    },

    #[error("Mesh '{mesh}': {normal_faces} normal faces for {faces} faces")]
    NormalFaceCountMismatch {
        mesh: String,
        faces: usize,
        normal_faces: usize,
    },

    #[error("Material of '{object}': {field} = {value} is outside {expected}")]
    MaterialOutOfRange {
        object: String,
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("Light {index}: {reason}")]
    InvalidLight { index: usize, reason: &'static str },
}
