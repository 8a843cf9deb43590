//! Direct lighting at a surface point.
//!
//! Every enabled light adds a grey contribution of its intensity, scaled by
//! how squarely it faces the surface, by its range and cone, and by the
//! fraction of light that makes it through whatever lies in between.
//! Occluders are never fully opaque unless their alpha is 1: each one
//! passes `1 - alpha` of the light.

use std::sync::Arc;

use glint_core::{Color, LayerMask, Light, LightKind, Scene};
use glint_math::{angle_degrees, Ray, Vec3, Vec4};

use crate::intersect::SceneIntersector;
use crate::material::{sample_color, MaterialResolver};

/// Brightness factor for light arriving at `angle` degrees from the normal:
/// 1 head-on, 0 at grazing and beyond.
pub fn angular_falloff(normal: Vec3, to_light: Vec3) -> f32 {
    (1.0 - angle_degrees(normal, to_light) / 90.0).max(0.0)
}

/// Linear range falloff: full strength at the light, zero at `range`.
/// `None` beyond the range.
pub fn range_attenuation(distance: f32, range: f32) -> Option<f32> {
    if range <= 0.0 || distance > range {
        return None;
    }
    Some((range - distance) / range)
}

/// Cone falloff: full strength on the axis, zero at the cone edge.
/// `None` at or outside the cone.
pub fn spot_attenuation(angle: f32, cone_half_angle: f32) -> Option<f32> {
    if angle < cone_half_angle {
        Some(1.0 - angle / cone_half_angle)
    } else {
        None
    }
}

/// Computes the light arriving at surface points for one frame.
///
/// Holds a snapshot of the scene's lights taken at construction.
pub struct LightingEngine<'a> {
    scene: &'a Scene,
    intersector: &'a dyn SceneIntersector,
    materials: Arc<MaterialResolver>,
    lights: Vec<Light>,
    mask: LayerMask,
}

impl<'a> LightingEngine<'a> {
    pub fn new(
        scene: &'a Scene,
        intersector: &'a dyn SceneIntersector,
        materials: Arc<MaterialResolver>,
        mask: LayerMask,
    ) -> Self {
        Self {
            scene,
            intersector,
            materials,
            lights: scene.snapshot_lights(),
            mask,
        }
    }

    /// Lights this engine shades with.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Total light at `point` on a surface with `normal`: the scene ambient
    /// plus every enabled light's contribution.
    ///
    /// `point` should already be offset off the surface.
    pub fn illuminate(&self, point: Vec3, normal: Vec3) -> Color {
        self.lights
            .iter()
            .filter(|light| light.enabled)
            .fold(self.scene.ambient, |total, light| {
                total + self.light_contribution(light, point, normal)
            })
    }

    /// One light's contribution at a point. Alpha is always 0.
    pub fn light_contribution(&self, light: &Light, point: Vec3, normal: Vec3) -> Color {
        let strength = match light.kind {
            LightKind::Directional => {
                let to_light = -light.forward();
                angular_falloff(normal, to_light) * self.transmittance(point, to_light, f32::INFINITY)
            }

            LightKind::Point { range } => {
                let offset = light.position - point;
                let distance = offset.length();
                let Some(attenuation) = range_attenuation(distance, range) else {
                    return Color::ZERO;
                };
                attenuation
                    * angular_falloff(normal, offset)
                    * self.transmittance(point, offset, distance)
            }

            LightKind::Spot {
                range,
                cone_half_angle,
            } => {
                let offset = light.position - point;
                let distance = offset.length();
                let Some(attenuation) = range_attenuation(distance, range) else {
                    return Color::ZERO;
                };
                let Some(cone) = spot_attenuation(angle_degrees(offset, -light.forward()), cone_half_angle)
                else {
                    return Color::ZERO;
                };
                attenuation
                    * cone
                    * angular_falloff(normal, offset)
                    * self.transmittance(point, offset, distance)
            }

            LightKind::Area => 0.0,
        };

        let value = light.intensity * strength;
        Vec4::new(value, value, value, 0.0)
    }

    /// Fraction of light that passes from `origin` along `direction` for
    /// `max_distance`. Each hit multiplies it by `1 - alpha` of the hit
    /// surface's color. Hits that belong to no object block completely.
    pub fn transmittance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> f32 {
        if max_distance <= 0.0 || direction == Vec3::ZERO {
            return 1.0;
        }

        let ray = Ray::new(origin, direction);
        let mut passed = 1.0;
        for hit in self.intersector.all_hits(&ray, max_distance, self.mask) {
            let Some((id, object)) = hit
                .object
                .and_then(|id| self.scene.object(id).map(|object| (id, object)))
            else {
                return 0.0;
            };
            let material = self.materials.resolve(id, object, hit.triangle_index);
            passed *= 1.0 - sample_color(material, hit.uv).w;
            if passed <= 0.0 {
                return 0.0;
            }
        }
        passed
    }
}
