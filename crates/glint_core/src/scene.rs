//! Scene graph types for glint.
//!
//! A scene is a flat list of objects (mesh + ordered material list + world
//! transform), a list of lights, an ambient color and an optional
//! environment. Objects are addressed by `ObjectId`, which is what the
//! intersector reports as a hit's owner.

use std::fmt;
use std::sync::Arc;

use glint_math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{self, Color};
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::texture::TextureError;

/// Shared by every object without materials.
static FALLBACK_MATERIAL: Material = Material::DEFAULT;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Object {object} references unknown material {material:?}")]
    UnknownMaterial { object: String, material: String },

    #[error("Material {material} references unknown texture {texture:?}")]
    UnknownTexture { material: String, texture: String },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("Scene description error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Index of an object within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Bit set of layers an intersection query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// The layer ray-traced geometry lives on by default.
    pub const RAYTRACE: LayerMask = LayerMask(1 << 31);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// True when the two masks share at least one layer.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::RAYTRACE
    }
}

/// Maps a ray direction that left the scene to a color.
pub trait EnvironmentSampler: Send + Sync + fmt::Debug {
    fn sample(&self, direction: Vec3) -> Color;
}

/// Environment of a single color in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEnvironment {
    pub color: Color,
}

impl ConstantEnvironment {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl EnvironmentSampler for ConstantEnvironment {
    fn sample(&self, _direction: Vec3) -> Color {
        self.color
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 local-to-world matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A renderable object: shared mesh, ordered materials, placement.
///
/// Material `i` shades submesh `i` of the mesh.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub materials: Vec<Arc<Material>>,
    pub transform: Transform,
    pub layer: LayerMask,
}

impl SceneObject {
    /// Create an object on the ray-trace layer with an identity transform.
    pub fn new(name: impl Into<String>, mesh: Arc<Mesh>, materials: Vec<Arc<Material>>) -> Self {
        Self {
            name: name.into(),
            mesh,
            materials,
            transform: Transform::default(),
            layer: LayerMask::RAYTRACE,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    /// The first material, or `Material::DEFAULT` for an object without any.
    pub fn primary_material(&self) -> &Material {
        self.materials
            .first()
            .map(Arc::as_ref)
            .unwrap_or(&FALLBACK_MATERIAL)
    }

    /// Material for a submesh slot. Slots past the end of the material
    /// list fall back to the primary material.
    pub fn material(&self, index: usize) -> &Material {
        match self.materials.get(index) {
            Some(material) => material,
            None => {
                log::debug!(
                    "Object {} has no material slot {} ({} materials), using primary",
                    self.name,
                    index,
                    self.materials.len()
                );
                self.primary_material()
            }
        }
    }

    /// Local-to-world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}

/// A complete scene.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Objects, indexed by `ObjectId`
    objects: Vec<SceneObject>,

    /// Every light, enabled or not
    lights: Vec<Light>,

    /// Light every surface receives regardless of occlusion
    pub ambient: Color,

    /// Color source for rays that leave the scene
    pub environment: Option<Arc<dyn EnvironmentSampler>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scene {
    /// Create an empty scene with black ambient light and no environment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: color::BLACK,
            environment: None,
        }
    }

    /// Add an object to the scene and return its ID.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// Get an object by ID.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// Iterate over objects with their IDs.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    /// Get object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// All lights, enabled or not.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Copy of the light list, taken once before a frame is traced.
    pub fn snapshot_lights(&self) -> Vec<Light> {
        self.lights.clone()
    }

    /// Set the ambient light color.
    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the environment sampler.
    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentSampler>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Get total triangle count across all objects.
    pub fn total_triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Arc<Mesh> {
        Arc::new(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2], None))
    }

    #[test]
    fn test_scene_objects() {
        let mut scene = Scene::new("test");
        let a = scene.add_object(SceneObject::new("a", triangle_mesh(), vec![]));
        let b = scene.add_object(SceneObject::new("b", triangle_mesh(), vec![]));

        assert_eq!(a, ObjectId(0));
        assert_eq!(b, ObjectId(1));
        assert_eq!(scene.object(b).unwrap().name, "b");
        assert!(scene.object(ObjectId(7)).is_none());
        assert_eq!(scene.total_triangle_count(), 2);
    }

    #[test]
    fn test_material_fallbacks() {
        let red = Arc::new(Material::new("red", color::RED));
        let blue = Arc::new(Material::new("blue", color::BLUE));
        let object = SceneObject::new("o", triangle_mesh(), vec![red, blue]);

        assert_eq!(object.material(1).name, "blue");
        assert_eq!(object.material(5).name, "red");

        let bare = SceneObject::new("bare", triangle_mesh(), vec![]);
        assert_eq!(bare.primary_material().color, Material::DEFAULT.color);
    }

    #[test]
    fn test_layer_mask() {
        assert!(LayerMask::RAYTRACE.intersects(LayerMask::ALL));
        assert!(!LayerMask::RAYTRACE.intersects(LayerMask(1)));
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
        assert_eq!(LayerMask::default(), LayerMask::RAYTRACE);
    }

    #[test]
    fn test_light_snapshot_is_a_copy() {
        let mut scene = Scene::new("lights");
        scene.add_light(Light::directional(1.0));
        let snapshot = scene.snapshot_lights();
        scene.add_light(Light::point(1.0, 2.0));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_constant_environment() {
        let env = ConstantEnvironment::new(color::BLUE);
        assert_eq!(env.sample(Vec3::X), color::BLUE);
        assert_eq!(env.sample(-Vec3::Y), color::BLUE);
    }

    #[test]
    fn test_transform_matrix() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::splat(2.0));
        let p = transform.to_matrix().transform_point3(Vec3::ONE);
        assert!((p - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-6);
    }
}
