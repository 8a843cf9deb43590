//! JSON scene descriptions.
//!
//! A description names its textures and materials once and lets objects
//! refer to materials by name, in submesh order:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "ambient": [0.1, 0.1, 0.1],
//!   "environment": { "type": "constant", "color": [0.2, 0.3, 0.8] },
//!   "textures": { "checker": "checker.png" },
//!   "materials": {
//!     "floor": { "texture": "checker" },
//!     "mirror": { "color": [0.9, 0.9, 0.9], "reflective": true, "shininess": 0.6 }
//!   },
//!   "objects": [
//!     { "name": "floor", "mesh": { "type": "quad", "size": 10.0 },
//!       "materials": ["floor"],
//!       "transform": { "rotation": [-90.0, 0.0, 0.0] } }
//!   ],
//!   "lights": [
//!     { "type": "directional", "intensity": 1.0, "direction": [0.0, -1.0, 0.0] }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{EulerRot, Quat, Vec2, Vec3, Vec4};
use serde::Deserialize;

use crate::color::{self, Color};
use crate::light::{Light, LightKind};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::scene::{ConstantEnvironment, LayerMask, Scene, SceneError, SceneObject, Transform};
use crate::texture::Texture;

/// Either `[r, g, b]` (opaque) or `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl ColorValue {
    pub fn to_color(self) -> Color {
        match self {
            ColorValue::Rgb([r, g, b]) => color::rgb(r, g, b),
            ColorValue::Rgba(rgba) => Vec4::from_array(rgba),
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        ColorValue::Rgb([0.0, 0.0, 0.0])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentDescription {
    Constant { color: ColorValue },
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDescription {
    #[serde(default = "default_material_color")]
    pub color: ColorValue,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub reflective: bool,
    #[serde(default)]
    pub shininess: f32,
}

fn default_material_color() -> ColorValue {
    ColorValue::Rgb([0.5, 0.5, 0.5])
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshDescription {
    Quad {
        size: f32,
    },
    Cube {
        size: f32,
    },
    Triangles {
        positions: Vec<Vec3>,
        #[serde(default)]
        normals: Option<Vec<Vec3>>,
        #[serde(default)]
        uvs: Option<Vec<Vec2>>,
        submeshes: Vec<Vec<u32>>,
    },
}

impl MeshDescription {
    /// Build the mesh, computing normals when they are missing.
    pub fn build(&self) -> Result<Mesh, SceneError> {
        let mut mesh = match self {
            MeshDescription::Quad { size } => Mesh::quad(*size),
            MeshDescription::Cube { size } => Mesh::cube(*size),
            MeshDescription::Triangles {
                positions,
                normals,
                uvs,
                submeshes,
            } => Mesh::with_submeshes(
                positions.clone(),
                normals.clone(),
                uvs.clone(),
                submeshes.clone(),
            ),
        };
        mesh.validate()?;
        mesh.ensure_normals();
        Ok(mesh)
    }
}

/// Translation, XYZ Euler rotation in degrees, and scale.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransformDescription {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformDescription {
    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.translation)
            .with_rotation(euler_degrees(self.rotation))
            .with_scale(self.scale)
    }
}

/// Rotation applied about Z, then X, then Y.
fn euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDescription {
    #[serde(default)]
    pub name: String,
    pub mesh: MeshDescription,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub transform: TransformDescription,
    #[serde(default)]
    pub layer: LayerMask,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKindDescription {
    Directional,
    Point { range: f32 },
    Spot { range: f32, cone_half_angle: f32 },
    Area,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightDescription {
    #[serde(flatten)]
    pub kind: LightKindDescription,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub position: Vec3,
    /// XYZ Euler rotation in degrees, ignored when `direction` is set
    #[serde(default)]
    pub rotation: Vec3,
    /// Direction the light shines in
    #[serde(default)]
    pub direction: Option<Vec3>,
}

fn default_intensity() -> f32 {
    1.0
}

fn default_enabled() -> bool {
    true
}

impl LightDescription {
    pub fn to_light(&self) -> Light {
        let kind = match self.kind {
            LightKindDescription::Directional => LightKind::Directional,
            LightKindDescription::Point { range } => LightKind::Point { range },
            LightKindDescription::Spot {
                range,
                cone_half_angle,
            } => LightKind::Spot {
                range,
                cone_half_angle,
            },
            LightKindDescription::Area => LightKind::Area,
        };

        let mut light = Light::new(kind, self.intensity).at(self.position);
        light = match self.direction {
            Some(direction) => light.facing(direction),
            None => light.with_rotation(euler_degrees(self.rotation)),
        };
        if !self.enabled {
            light = light.disabled();
        }
        light
    }
}

/// A whole scene as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ambient: ColorValue,
    #[serde(default)]
    pub environment: Option<EnvironmentDescription>,
    /// Texture name -> image path
    #[serde(default)]
    pub textures: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    #[serde(default)]
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load textures, resolve names and assemble the scene.
    ///
    /// Relative texture paths resolve against `base_dir`.
    pub fn build(&self, base_dir: impl AsRef<Path>) -> Result<Scene, SceneError> {
        let base_dir = base_dir.as_ref();

        let mut textures = HashMap::new();
        for (name, path) in &self.textures {
            let texture = Texture::load(base_dir.join(path))?;
            textures.insert(name.as_str(), Arc::new(texture));
        }

        let mut materials = HashMap::new();
        for (name, desc) in &self.materials {
            let mut material = Material::new(name.clone(), desc.color.to_color());
            if let Some(texture_name) = &desc.texture {
                let texture = textures.get(texture_name.as_str()).ok_or_else(|| {
                    SceneError::UnknownTexture {
                        material: name.clone(),
                        texture: texture_name.clone(),
                    }
                })?;
                material = material.with_texture(texture.clone());
            }
            if desc.reflective {
                material = material.with_reflection(desc.shininess);
            }
            materials.insert(name.as_str(), Arc::new(material));
        }

        let mut scene = Scene::new(self.name.clone()).with_ambient(self.ambient.to_color());

        if let Some(EnvironmentDescription::Constant { color }) = &self.environment {
            scene = scene.with_environment(Arc::new(ConstantEnvironment::new(color.to_color())));
        }

        for desc in &self.objects {
            let mesh = desc.mesh.build()?;

            let object_materials = desc
                .materials
                .iter()
                .map(|name| {
                    materials
                        .get(name.as_str())
                        .cloned()
                        .ok_or_else(|| SceneError::UnknownMaterial {
                            object: desc.name.clone(),
                            material: name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if object_materials.len() < mesh.submesh_count() {
                log::warn!(
                    "Object {} has {} submeshes but {} materials; extra submeshes use the primary material",
                    desc.name,
                    mesh.submesh_count(),
                    object_materials.len()
                );
            }

            let object = SceneObject::new(desc.name.clone(), Arc::new(mesh), object_materials)
                .with_transform(desc.transform.to_transform())
                .with_layer(desc.layer);
            scene.add_object(object);
        }

        for light in &self.lights {
            scene.add_light(light.to_light());
        }

        log::info!(
            "Built scene {:?}: {} objects, {} triangles, {} lights, {} textures",
            scene.name,
            scene.object_count(),
            scene.total_triangle_count(),
            scene.lights().len(),
            textures.len()
        );

        Ok(scene)
    }
}
