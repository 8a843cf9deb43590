//! RGBA textures for materials.
//!
//! Textures are decoded with the `image` crate and stored as linear float
//! RGBA so the tracer can read both color and alpha from a single lookup.

use std::path::Path;

use glam::Vec4;
use thiserror::Error;

use crate::color::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Linear RGBA pixels, row-major, top row first
    pub pixels: Vec<Color>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid(color: Color) -> Self {
        Self::new(1, 1, vec![color], "<solid>")
    }

    /// Load a texture from an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: display.clone(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(display));
        }

        let pixels = rgba
            .pixels()
            .map(|p| {
                Vec4::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                    p[3] as f32 / 255.0, // Alpha is linear
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", display, width, height);

        Ok(Self::new(width, height, pixels, display))
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// Texel centres sit at `(i + 0.5) / width`, coordinates wrap (repeat),
    /// and `v = 0` is the bottom edge of the image.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::ZERO;
        }

        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let (x0, y0) = (x0 as i64, y0 as i64);
        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x0 + 1, y0);
        let p01 = self.texel(x0, y0 + 1);
        let p11 = self.texel(x0 + 1, y0 + 1);

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }

    /// Pixel at integer coordinates, wrapping in both directions.
    fn texel(&self, x: i64, y: i64) -> Color {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.pixels
            .get(y * self.width as usize + x)
            .copied()
            .unwrap_or(Color::ZERO)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
