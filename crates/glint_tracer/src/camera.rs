//! Pinhole camera for generating primary rays.

use glint_math::{Ray, Vec3};
use serde::Deserialize;

/// A pinhole camera looking from `position` toward `target`.
///
/// Rays are generated for continuous screen coordinates with the origin at
/// the top-left corner of the screen, x to the right and y down.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PinholeCamera {
    /// Screen size in pixels
    pub width: u32,
    pub height: u32,

    // Camera positioning
    position: Vec3,
    target: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    #[serde(skip)]
    upper_left: Vec3,
    #[serde(skip)]
    delta_u: Vec3,
    #[serde(skip)]
    delta_v: Vec3,
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl PinholeCamera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            width: 800,
            height: 450,
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            vfov: 60.0,
            upper_left: Vec3::ZERO,
            delta_u: Vec3::ZERO,
            delta_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set screen resolution.
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, position: Vec3, target: Vec3, up: Vec3) -> Self {
        self.position = position;
        self.target = target;
        self.up = up;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Recompute the cached screen basis. Must be called after changing any
    /// setting and before generating rays.
    pub fn initialize(&mut self) {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;

        // Viewport one unit in front of the camera
        let viewport_height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        let viewport_width = viewport_height * (width / height);

        // Camera basis; w points backwards
        let w = (self.position - self.target).normalize_or_zero();
        let u = self.up.cross(w).normalize_or_zero();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.delta_u = viewport_u / width;
        self.delta_v = viewport_v / height;
        self.upper_left = self.position - w - viewport_u / 2.0 - viewport_v / 2.0;
    }

    /// Ray from the camera through screen point `(x, y)`.
    pub fn ray_for_screen_point(&self, x: f32, y: f32) -> Ray {
        let on_screen = self.upper_left + x * self.delta_u + y * self.delta_v;
        Ray::new(self.position, on_screen - self.position)
    }
}
