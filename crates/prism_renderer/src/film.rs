//! Frame buffer assembly.

use prism_core::Color;

/// Linear RGB image, row-major, origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        pixel_index(self.width, x, y)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Add to the pixel at (x, y). Non-finite values are dropped.
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        if color.is_finite() {
            let i = self.index(x, y);
            self.pixels[i] += color;
        }
    }

    /// Linear RGB triples clamped to [0, 1], in row-major order.
    pub fn to_linear(&self) -> Vec<[f32; 3]> {
        self.pixels.iter().map(|c| clamp_color(*c).to_array()).collect()
    }

    /// 8-bit RGB bytes, optionally gamma corrected.
    pub fn to_rgb8(&self, gamma: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color, gamma));
        }
        bytes
    }
}

/// Row-major offset of pixel (x, y), computed in `usize`.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp each channel to [0, 1]. A colour with a NaN channel becomes black.
#[inline]
pub fn clamp_color(color: Color) -> Color {
    let c = if color.is_nan() { Color::ZERO } else { color };
    c.clamp(Color::ZERO, Color::ONE)
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color, gamma: bool) -> [u8; 3] {
    let c = clamp_color(color);
    let c = if gamma {
        Color::new(linear_to_gamma(c.x), linear_to_gamma(c.y), linear_to_gamma(c.z))
    } else {
        c
    };
    [
        (255.0 * c.x).round() as u8,
        (255.0 * c.y).round() as u8,
        (255.0 * c.z).round() as u8,
    ]
}
