//! Camera for ray generation.

use prism_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::sampling::gen_f32;

/// How image-plane positions map to rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Pinhole camera with a vertical field of view in degrees
    Perspective { vfov: f32 },
    /// Parallel rays through a view window `height` world units tall
    Orthographic { height: f32 },
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings (set by initialize())
    image_width: u32,
    image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    projection: Projection,
    /// Clip distances along the view axis
    near: f32,
    far: f32,
    /// Random sub-pixel offsets instead of pixel centres
    jitter: bool,

    // Cached computed values (set by initialize())
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 1,
            image_height: 1,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            projection: Projection::Perspective { vfov: 90.0 },
            near: 0.01,
            far: 1000.0,
            jitter: true,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            half_width: 1.0,
            half_height: 1.0,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Perspective projection with a vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.projection = Projection::Perspective { vfov };
        self
    }

    /// Orthographic projection through a window `height` units tall.
    pub fn with_orthographic(mut self, height: f32) -> Self {
        self.projection = Projection::Orthographic { height };
        self
    }

    /// Set near and far clip distances.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Toggle jittered sub-pixel sampling.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn position(&self) -> Vec3 {
        self.look_from
    }

    /// Initialize the camera for an image size (must be called before
    /// generating rays).
    pub fn initialize(&mut self, width: u32, height: u32) {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        let aspect = self.image_width as f32 / self.image_height as f32;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        self.half_height = match self.projection {
            Projection::Perspective { vfov } => (vfov.to_radians() / 2.0).tan(),
            Projection::Orthographic { height } => height / 2.0,
        };
        self.half_width = self.half_height * aspect;
    }

    /// Check the camera can produce rays.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.look_from.is_finite() || !self.look_at.is_finite() {
            return Err("camera position must be finite");
        }
        if (self.look_from - self.look_at).length_squared() <= 0.0 {
            return Err("camera must look at a point other than its position");
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() <= 0.0 {
            return Err("camera up vector is parallel to the view direction");
        }
        let window = match self.projection {
            Projection::Perspective { vfov } => vfov > 0.0 && vfov < 180.0,
            Projection::Orthographic { height } => height > 0.0,
        };
        if !window {
            return Err("camera field of view or window height out of range");
        }
        if !(self.near >= 0.0 && self.far > self.near) {
            return Err("camera clip planes must satisfy 0 <= near < far");
        }
        Ok(())
    }

    /// Generate a ray for pixel (i, j).
    ///
    /// Jittered cameras draw two random numbers for the sub-pixel offset;
    /// otherwise the ray passes through the pixel centre and no randomness
    /// is consumed.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let (ox, oy) = if self.jitter {
            (gen_f32(rng), gen_f32(rng))
        } else {
            (0.5, 0.5)
        };

        let sx = (i as f32 + ox) / self.image_width as f32;
        let sy = (j as f32 + oy) / self.image_height as f32;
        let px = (2.0 * sx - 1.0) * self.half_width;
        let py = (1.0 - 2.0 * sy) * self.half_height;

        match self.projection {
            Projection::Perspective { .. } => {
                // Unit component along the view axis, so t measures depth
                let direction = px * self.u + py * self.v - self.w;
                Ray::with_range(self.look_from, direction, self.near, self.far)
            }
            Projection::Orthographic { .. } => {
                let origin = self.look_from + px * self.u + py * self.v;
                Ray::with_range(origin, -self.w, self.near, self.far)
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
