//! Test doubles shared by the tracer's unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glint_core::{LayerMask, Material, Mesh, ObjectId, SceneObject};
use glint_math::{Mat4, Ray, Vec2, Vec3};

use crate::intersect::{Hit, SceneIntersector};

/// Intersector that answers nearest-hit queries from a queue, in order,
/// and every all-hits query with the same list.
pub struct ScriptedIntersector {
    nearest: Mutex<VecDeque<Hit>>,
    shadow: Vec<Hit>,
    rays: Mutex<Vec<Ray>>,
    queries: AtomicUsize,
}

impl ScriptedIntersector {
    pub fn new(nearest: Vec<Hit>) -> Self {
        Self {
            nearest: Mutex::new(nearest.into()),
            shadow: Vec::new(),
            rays: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_shadow_hits(mut self, hits: Vec<Hit>) -> Self {
        self.shadow = hits;
        self
    }

    /// A hit `distance` down the -Z axis on a surface facing +Z.
    pub fn hit_on(object: ObjectId, distance: f32) -> Hit {
        Hit {
            point: Vec3::new(0.0, 0.0, -distance),
            normal: Vec3::Z,
            distance,
            object: Some(object),
            triangle_index: 0,
            uv: Vec2::splat(0.5),
            transform: Mat4::IDENTITY,
        }
    }

    /// Number of nearest-hit queries made so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Rays passed to nearest-hit queries, in order.
    pub fn rays(&self) -> Vec<Ray> {
        self.rays.lock().unwrap().clone()
    }
}

impl SceneIntersector for ScriptedIntersector {
    fn nearest_hit(&self, ray: &Ray, _max_distance: f32, _mask: LayerMask) -> Option<Hit> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.rays.lock().unwrap().push(*ray);
        self.nearest.lock().unwrap().pop_front()
    }

    fn all_hits(&self, _ray: &Ray, max_distance: f32, _mask: LayerMask) -> Vec<Hit> {
        self.shadow
            .iter()
            .filter(|hit| hit.distance <= max_distance)
            .copied()
            .collect()
    }
}

/// A 2x2 quad facing +Z with one material.
pub fn quad_object(material: Material) -> SceneObject {
    SceneObject::new(
        material.name.clone(),
        Arc::new(Mesh::quad(2.0)),
        vec![Arc::new(material)],
    )
}
