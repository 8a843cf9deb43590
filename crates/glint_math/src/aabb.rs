use crate::{Interval, Ray, Vec3};

/// Boxes thinner than this along an axis are widened so slab tests on
/// flat geometry still register hits.
const MIN_EXTENT: f32 = 1e-4;

/// Axis-aligned bounding box stored as its two corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box. Growing it by anything yields that thing's bounds.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box spanning two corners given in any order, widened on flat axes.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let flat = (max - min).cmplt(Vec3::splat(MIN_EXTENT));
        let pad = Vec3::select(flat, Vec3::splat(MIN_EXTENT * 0.5), Vec3::ZERO);
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Smallest box holding every point. Empty input gives `Aabb::EMPTY`.
    pub fn from_point_cloud(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::EMPTY;
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::from_corners(min, max)
    }

    /// Box holding both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box grown to hold `point`.
    pub fn including(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the widest axis: 0 for X, 1 for Y, 2 for Z.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x > e.y && e.x > e.z {
            0
        } else if e.y > e.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether `ray` passes through the box somewhere inside `range`.
    pub fn hit(&self, ray: &Ray, range: Interval) -> bool {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let near = t0.min(t1).max_element().max(range.min);
        let far = t0.max(t1).min_element().min(range.max);
        near <= far
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_any_order() {
        let aabb = Aabb::from_corners(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_flat_box_is_widened() {
        let aabb = Aabb::from_corners(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(aabb.extent().z > 0.0);
        assert_eq!(aabb.extent().x, 1.0);
    }

    #[test]
    fn test_point_cloud() {
        let aabb = Aabb::from_point_cloud(&[
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(0.0, 0.0, 5.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 2.0, 5.0));

        assert_eq!(Aabb::from_point_cloud(&[]), Aabb::EMPTY);
    }

    #[test]
    fn test_union_with_empty() {
        let unit = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        assert_eq!(Aabb::EMPTY.union(&unit), unit);
        assert_eq!(Aabb::EMPTY.including(Vec3::ONE).centroid(), Vec3::ONE);
    }

    #[test]
    fn test_ray_hit() {
        let aabb = Aabb::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0));
        let range = Interval::new(0.0, 100.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&toward, range));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&away, range));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&beside, range));

        // Too short to reach the box
        assert!(!aabb.hit(&toward, Interval::new(0.0, 2.0)));
    }

    #[test]
    fn test_longest_axis_and_centroid() {
        assert_eq!(Aabb::from_corners(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_corners(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_corners(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);

        let aabb = Aabb::from_corners(Vec3::ZERO, Vec3::splat(10.0));
        assert_eq!(aabb.centroid(), Vec3::splat(5.0));
    }
}
