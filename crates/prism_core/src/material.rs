//! Surface material coefficients.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Surface description shared by the path tracer and the photon emitter.
///
/// All coefficients except `refractive_index` and `gloss_falloff` are
/// probabilities or energy weights in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse/albedo color
    pub albedo: Color,

    /// Blur applied to every bounce direction (0 = mirror, 1 = fully random hemisphere)
    pub roughness: f32,

    /// Energy retained by the indirect bounce of an opaque hit
    pub light_reflection: f32,

    /// Weight of the glossy highlight
    pub glossiness: f32,

    /// Highlight sharpness exponent
    pub gloss_falloff: f32,

    /// Probability that a hit is treated as a dielectric instead of opaque
    pub glassiness: f32,

    /// Probability that a dielectric hit transmits rather than reflects
    pub translucency: f32,

    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Color::splat(0.8),
            roughness: 1.0,
            light_reflection: 0.5,
            glossiness: 0.0,
            gloss_falloff: 1.0,
            glassiness: 0.0,
            translucency: 0.0,
            refractive_index: 1.5,
        }
    }
}

impl Material {
    /// Matte surface with the given albedo.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Fully transmissive dielectric (glass-like).
    pub fn glass(albedo: Color, refractive_index: f32) -> Self {
        Self {
            albedo,
            roughness: 0.0,
            glassiness: 1.0,
            translucency: 1.0,
            refractive_index,
            ..Default::default()
        }
    }

    /// Perfect or blurred mirror: a dielectric that never transmits.
    pub fn mirror(albedo: Color, roughness: f32) -> Self {
        Self {
            albedo,
            roughness,
            glassiness: 1.0,
            translucency: 0.0,
            ..Default::default()
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_light_reflection(mut self, light_reflection: f32) -> Self {
        self.light_reflection = light_reflection;
        self
    }

    pub fn with_gloss(mut self, glossiness: f32, gloss_falloff: f32) -> Self {
        self.glossiness = glossiness;
        self.gloss_falloff = gloss_falloff;
        self
    }

    pub fn with_glassiness(mut self, glassiness: f32, translucency: f32) -> Self {
        self.glassiness = glassiness;
        self.translucency = translucency;
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: f32) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    /// True if a hit on this surface can ever take the dielectric branch.
    pub fn is_dielectric(&self) -> bool {
        self.glassiness > 0.0
    }

    /// Check coefficient ranges. `object` names the owner in the error.
    pub fn validate(&self, object: &str) -> Result<(), SceneError> {
        let unit = [
            ("albedo.r", self.albedo.x),
            ("albedo.g", self.albedo.y),
            ("albedo.b", self.albedo.z),
            ("roughness", self.roughness),
            ("light_reflection", self.light_reflection),
            ("glossiness", self.glossiness),
            ("glassiness", self.glassiness),
            ("translucency", self.translucency),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(out_of_range(object, field, value, "[0, 1]"));
            }
        }

        if !(self.refractive_index >= 1.0) {
            return Err(out_of_range(
                object,
                "refractive_index",
                self.refractive_index,
                "[1, inf)",
            ));
        }
        if !(self.gloss_falloff >= 0.0) || !self.gloss_falloff.is_finite() {
            return Err(out_of_range(
                object,
                "gloss_falloff",
                self.gloss_falloff,
                "[0, inf)",
            ));
        }

        Ok(())
    }
}

fn out_of_range(object: &str, field: &'static str, value: f32, expected: &'static str) -> SceneError {
    SceneError::MaterialOutOfRange {
        object: object.to_string(),
        field,
        value,
        expected,
    }
}
