//! Glint Core - Scene data model for the glint ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SceneObject`, `Mesh`, `Material`, `Light`
//! - **Textures**: bilinear-sampled RGBA textures loaded with `image`
//! - **Scene descriptions**: JSON files deserialized with serde and built
//!   into a `Scene`
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//!
//! let json = std::fs::read_to_string("scene.json")?;
//! let scene = SceneDescription::from_json(&json)?.build(".")?;
//! println!("Loaded {} objects, {} lights",
//!     scene.object_count(),
//!     scene.lights().len());
//! ```

pub mod color;
pub mod description;
pub mod light;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use color::Color;
pub use description::SceneDescription;
pub use light::{Light, LightKind};
pub use material::Material;
pub use mesh::Mesh;
pub use scene::{
    ConstantEnvironment, EnvironmentSampler, LayerMask, ObjectId, Scene, SceneError, SceneObject,
    Transform,
};
pub use texture::{Texture, TextureError};
