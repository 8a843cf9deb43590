//! Scene lights.

use glint_math::{Quat, Vec3};

/// What kind of light this is, with the parameters that kind needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Infinitely distant light shining along the light's forward axis.
    Directional,
    /// Omni light with a linear falloff to zero at `range`.
    Point { range: f32 },
    /// Point light restricted to a cone around the forward axis.
    /// `cone_half_angle` is in degrees.
    Spot { range: f32, cone_half_angle: f32 },
    /// Area lights can be placed in a scene but do not light it.
    Area,
}

/// A light source. Orientation is a rotation of the local +Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub intensity: f32,
    pub enabled: bool,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Light {
    /// An enabled light of the given kind at the origin, facing +Z.
    pub fn new(kind: LightKind, intensity: f32) -> Self {
        Self {
            kind,
            intensity,
            enabled: true,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn directional(intensity: f32) -> Self {
        Self::new(LightKind::Directional, intensity)
    }

    pub fn point(intensity: f32, range: f32) -> Self {
        Self::new(LightKind::Point { range }, intensity)
    }

    pub fn spot(intensity: f32, range: f32, cone_half_angle: f32) -> Self {
        Self::new(
            LightKind::Spot {
                range,
                cone_half_angle,
            },
            intensity,
        )
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotate the light so that it shines along `direction`.
    pub fn facing(self, direction: Vec3) -> Self {
        let rotation = Quat::from_rotation_arc(Vec3::Z, direction.normalize());
        self.with_rotation(rotation)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Direction the light shines in.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}
