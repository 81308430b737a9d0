//! Renderer construction errors.

use prism_core::SceneError;
use thiserror::Error;

/// Errors raised while setting up a render. Tracing itself never fails.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("invalid render configuration: {0}")]
    Config(String),

    #[error("scene has no renderable triangles")]
    NoGeometry,
}
