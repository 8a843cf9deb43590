//! Scene intersection queries.
//!
//! The tracer never walks geometry itself. It asks a `SceneIntersector` for
//! the nearest hit along a ray (camera, transparency and reflection rays) or
//! for every hit up to a distance (shadow rays).

use glint_core::{LayerMask, ObjectId};
use glint_math::{Mat4, Ray, Vec2, Vec3};

/// Hits closer to the ray origin than this are ignored.
pub const MIN_HIT_DISTANCE: f32 = 0.001;

/// Record of a ray-triangle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// World-space point of intersection
    pub point: Vec3,
    /// Flat triangle normal, facing against the incoming ray
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Object that owns the triangle. `None` means the intersector found
    /// geometry it cannot attribute to any object.
    pub object: Option<ObjectId>,
    /// Index of the triangle in the owner's mesh
    pub triangle_index: usize,
    /// Interpolated texture coordinates
    pub uv: Vec2,
    /// Owner's local-to-world matrix
    pub transform: Mat4,
}

/// Geometric ray queries against a scene.
pub trait SceneIntersector: Send + Sync {
    /// Closest hit within `max_distance` on any layer in `mask`.
    fn nearest_hit(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<Hit>;

    /// Every hit within `max_distance` on any layer in `mask`, nearest first.
    fn all_hits(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Vec<Hit>;
}
