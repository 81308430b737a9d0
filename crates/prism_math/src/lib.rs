// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod direction;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use direction::{angle_between, reflect, rotate_towards};
pub use interval::Interval;
pub use ray::Ray;
