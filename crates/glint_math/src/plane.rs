use crate::{Ray, Vec3};

/// An infinite plane `dot(normal, p) + distance = 0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Plane through three points, wound so that `normal = (b - a) x (c - a)`.
    ///
    /// Returns `None` when the points are collinear.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Self {
            normal,
            distance: -normal.dot(a),
        })
    }

    /// Signed distance from the plane to a point.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Distance along the ray to the plane.
    ///
    /// `None` when the ray runs parallel to the plane or the plane lies
    /// behind the ray origin.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let along = ray.direction.dot(self.normal);
        if along.abs() < f32::EPSILON {
            return None;
        }
        let t = -self.signed_distance(ray.origin) / along;
        (t > 0.0).then_some(t)
    }
}
