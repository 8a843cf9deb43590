//! Surface materials.

use std::sync::Arc;

use crate::color::{self, Color};
use crate::texture::Texture;

/// A surface material: flat color or texture, plus an optional mirror term.
///
/// A reflective material adds `alpha * shininess` times the mirrored
/// radiance on top of its own color.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (for diagnostics)
    pub name: String,

    /// Flat RGBA color, used when there is no texture
    pub color: Color,

    /// Color texture sampled at the hit's UV coordinates
    pub texture: Option<Arc<Texture>>,

    /// Whether the surface traces a mirror reflection
    pub reflective: bool,

    /// Reflection strength
    pub shininess: f32,
}

impl Material {
    /// Opaque mid-grey, not reflective.
    pub const DEFAULT: Material = Material {
        name: String::new(),
        color: color::grey(0.5),
        texture: None,
        reflective: false,
        shininess: 0.0,
    };

    /// Create a new material with just a name and flat color.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            ..Self::DEFAULT
        }
    }

    /// Use a texture instead of the flat color.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Make the material reflective with the given strength.
    pub fn with_reflection(mut self, shininess: f32) -> Self {
        self.reflective = true;
        self.shininess = shininess;
        self
    }

    /// Check if this material uses a texture.
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}
