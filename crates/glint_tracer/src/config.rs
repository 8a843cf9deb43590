//! Render configuration.

use glint_core::{color, Color, LayerMask};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;

/// Errors from an invalid `RenderConfig`.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("resolution_scale must be a positive number, got {0}")]
    ResolutionScale(f32),

    #[error("far_distance must be a positive number, got {0}")]
    FarDistance(f32),

    #[error("{name} must be a non-negative number, got {value}")]
    Offset { name: &'static str, value: f32 },

    #[error("bucket_size must be at least 1")]
    BucketSize,
}

/// Settings for one rendered frame.
///
/// Every field has a default, so a partial JSON object deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Recursion depth at which rays stop being traced
    pub max_depth: u32,
    /// Multiply surface colors by direct lighting
    pub use_lighting: bool,
    /// Shade with interpolated vertex normals instead of face normals
    pub smooth_edges: bool,
    /// Shade every object with its first material
    pub single_material_only: bool,
    /// Output pixels per screen pixel
    pub resolution_scale: f32,
    /// Longest distance a traced ray looks for geometry
    pub far_distance: f32,
    /// Layers that block traced rays
    pub collision_mask: LayerMask,
    /// Returned for rays that escape a scene without an environment
    pub fallback_color: Color,
    /// Returned for hits that cannot be attributed to an object
    pub error_color: Color,
    /// Distance behind a transparent surface the continuing ray starts at
    pub transparency_offset: f32,
    /// Distance in front of a surface reflection and shadow rays start at
    pub surface_offset: f32,
    /// Edge length of the square tiles the frame is split into
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            use_lighting: true,
            smooth_edges: true,
            single_material_only: false,
            resolution_scale: 1.0,
            far_distance: 1000.0,
            collision_mask: LayerMask::RAYTRACE,
            fallback_color: color::BLUE,
            error_color: color::RED,
            transparency_offset: 0.01,
            surface_offset: 0.0001,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Check the values a render cannot proceed without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.resolution_scale.is_finite() && self.resolution_scale > 0.0) {
            return Err(ConfigError::ResolutionScale(self.resolution_scale));
        }
        if self.far_distance.is_nan() || self.far_distance <= 0.0 {
            return Err(ConfigError::FarDistance(self.far_distance));
        }
        for (name, value) in [
            ("transparency_offset", self.transparency_offset),
            ("surface_offset", self.surface_offset),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Offset { name, value });
            }
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::BucketSize);
        }
        Ok(())
    }
}
