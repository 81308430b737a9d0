//! Isotropic point lights.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// A point light radiating equally in every direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub colour: Color,
    /// Radiant intensity scale; unbounded above
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, colour: Color, intensity: f32) -> Self {
        Self {
            position,
            colour,
            intensity,
        }
    }

    /// Unnormalized vector from `point` to the light.
    #[inline]
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        self.position - point
    }

    #[inline]
    pub fn distance_from(&self, point: Vec3) -> f32 {
        self.direction_from(point).length()
    }

    /// Total emitted power (colour scaled by intensity).
    #[inline]
    pub fn power(&self) -> Color {
        self.colour * self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_and_distance() {
        let light = PointLight::new(Vec3::new(0.0, 3.0, 1.0), Vec3::ONE, 300.0);
        let point = Vec3::new(0.0, 0.0, 1.0);

        assert_eq!(light.direction_from(point), Vec3::new(0.0, 3.0, 0.0));
        assert!((light.distance_from(point) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_power() {
        let light = PointLight::new(Vec3::ZERO, Vec3::new(1.0, 0.5, 0.0), 600.0);
        assert_eq!(light.power(), Vec3::new(600.0, 300.0, 0.0));
    }
}
