//! Bounding Volume Hierarchy (BVH) scene intersector.
//!
//! Flattens every object's triangles into world space and builds a binary
//! tree over them. Triangles are tested with Möller-Trumbore and hit from
//! either side; the reported normal always faces the incoming ray.

use glint_core::{LayerMask, ObjectId, Scene};
use glint_math::{Aabb, Interval, Mat4, Ray, Vec2, Vec3};

use crate::intersect::{Hit, SceneIntersector, MIN_HIT_DISTANCE};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// Determinant below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A world-space triangle and the object it came from.
#[derive(Debug, Clone)]
struct Primitive {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    uvs: [Vec2; 3],
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    object: ObjectId,
    triangle_index: usize,
    layer: LayerMask,
    bounds: Aabb,
    centroid: Vec3,
}

impl Primitive {
    /// Möller-Trumbore. Returns distance and barycentric (u, v).
    fn intersect(&self, ray: &Ray, range: Interval) -> Option<(f32, f32, f32)> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        range.contains(t).then_some((t, u, v))
    }

    fn to_hit(&self, ray: &Ray, t: f32, u: f32, v: f32, transform: Mat4) -> Hit {
        let normal = if ray.direction.dot(self.normal) > 0.0 {
            -self.normal
        } else {
            self.normal
        };
        let uv = self.uvs[0] * (1.0 - u - v) + self.uvs[1] * u + self.uvs[2] * v;

        Hit {
            point: ray.at(t),
            normal,
            distance: t,
            object: Some(self.object),
            triangle_index: self.triangle_index,
            uv,
            transform,
        }
    }
}

#[derive(Debug)]
enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bounds: Aabb,
    },
    /// Indices into the primitive list
    Leaf { primitives: Vec<usize>, bounds: Aabb },
    /// Only for a scene with no triangles
    Empty,
}

impl BvhNode {
    /// Median split on the longest axis of the primitive centroids.
    fn build(primitives: &[Primitive], mut indices: Vec<usize>) -> Self {
        let n = indices.len();
        if n == 0 {
            return BvhNode::Empty;
        }

        let bounds = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| acc.union(&primitives[i].bounds));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                primitives: indices,
                bounds,
            };
        }

        let axis = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| acc.including(primitives[i].centroid))
            .longest_axis();
        indices.sort_unstable_by(|&a, &b| {
            primitives[a].centroid[axis].total_cmp(&primitives[b].centroid[axis])
        });

        let right_indices = indices.split_off(n / 2);
        let left = Self::build(primitives, indices);
        let right = Self::build(primitives, right_indices);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bounds,
        }
    }

    /// Closest hit in `range`, as (primitive, t, u, v).
    fn nearest(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        range: Interval,
        mask: LayerMask,
    ) -> Option<(usize, f32, f32, f32)> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf {
                primitives: leaf,
                bounds,
            } => {
                if !bounds.hit(ray, range) {
                    return None;
                }

                let mut closest = None;
                let mut max = range.max;
                for &index in leaf {
                    let primitive = &primitives[index];
                    if !primitive.layer.intersects(mask) {
                        continue;
                    }
                    if let Some((t, u, v)) = primitive.intersect(ray, range.until(max)) {
                        max = t;
                        closest = Some((index, t, u, v));
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bounds } => {
                if !bounds.hit(ray, range) {
                    return None;
                }

                let hit_left = left.nearest(primitives, ray, range, mask);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(range.max, |(_, t, _, _)| t);
                let hit_right = right.nearest(primitives, ray, range.until(right_max), mask);

                hit_right.or(hit_left)
            }
        }
    }

    /// Every hit in `range`, unordered.
    fn collect(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        range: Interval,
        mask: LayerMask,
        out: &mut Vec<(usize, f32, f32, f32)>,
    ) {
        match self {
            BvhNode::Empty => {}

            BvhNode::Leaf {
                primitives: leaf,
                bounds,
            } => {
                if !bounds.hit(ray, range) {
                    return;
                }
                for &index in leaf {
                    let primitive = &primitives[index];
                    if !primitive.layer.intersects(mask) {
                        continue;
                    }
                    if let Some((t, u, v)) = primitive.intersect(ray, range) {
                        out.push((index, t, u, v));
                    }
                }
            }

            BvhNode::Branch { left, right, bounds } => {
                if !bounds.hit(ray, range) {
                    return;
                }
                left.collect(primitives, ray, range, mask, out);
                right.collect(primitives, ray, range, mask, out);
            }
        }
    }
}

/// Reference `SceneIntersector` over a scene's triangle meshes.
///
/// The hierarchy is built once from a scene and is immutable afterwards, so
/// one intersector can serve every render thread.
#[derive(Debug)]
pub struct BvhIntersector {
    primitives: Vec<Primitive>,
    transforms: Vec<Mat4>,
    root: BvhNode,
}

impl BvhIntersector {
    /// Build a BVH over every triangle in the scene.
    ///
    /// Triangles with out-of-range vertex indices or zero area are skipped.
    pub fn build(scene: &Scene) -> Self {
        let mut primitives = Vec::with_capacity(scene.total_triangle_count());
        let mut transforms = Vec::with_capacity(scene.object_count());
        let mut skipped = 0usize;

        for (id, object) in scene.objects() {
            let matrix = object.model_matrix();
            transforms.push(matrix);

            let mesh = &object.mesh;
            for triangle_index in 0..mesh.triangle_count() {
                let Some([a, b, c]) = mesh.triangle(triangle_index) else {
                    skipped += 1;
                    continue;
                };
                let (Some(p0), Some(p1), Some(p2)) = (
                    mesh.positions.get(a as usize),
                    mesh.positions.get(b as usize),
                    mesh.positions.get(c as usize),
                ) else {
                    skipped += 1;
                    continue;
                };

                let v0 = matrix.transform_point3(*p0);
                let v1 = matrix.transform_point3(*p1);
                let v2 = matrix.transform_point3(*p2);
                let Some(normal) = (v1 - v0).cross(v2 - v0).try_normalize() else {
                    skipped += 1;
                    continue;
                };

                primitives.push(Primitive {
                    v0,
                    v1,
                    v2,
                    uvs: [mesh.uv(a), mesh.uv(b), mesh.uv(c)],
                    normal,
                    object: id,
                    triangle_index,
                    layer: object.layer,
                    bounds: Aabb::from_point_cloud(&[v0, v1, v2]),
                    centroid: (v0 + v1 + v2) / 3.0,
                });
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} degenerate or invalid triangles", skipped);
        }

        let indices = (0..primitives.len()).collect();
        let root = BvhNode::build(&primitives, indices);

        log::info!(
            "Built BVH: {} triangles from {} objects",
            primitives.len(),
            transforms.len()
        );

        Self {
            primitives,
            transforms,
            root,
        }
    }

    /// Number of triangles in the hierarchy.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    fn make_hit(&self, ray: &Ray, (index, t, u, v): (usize, f32, f32, f32)) -> Hit {
        let primitive = &self.primitives[index];
        let transform = self
            .transforms
            .get(primitive.object.0)
            .copied()
            .unwrap_or(Mat4::IDENTITY);
        primitive.to_hit(ray, t, u, v, transform)
    }
}

impl SceneIntersector for BvhIntersector {
    fn nearest_hit(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<Hit> {
        let range = Interval::new(MIN_HIT_DISTANCE, max_distance);
        self.root
            .nearest(&self.primitives, ray, range, mask)
            .map(|found| self.make_hit(ray, found))
    }

    fn all_hits(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Vec<Hit> {
        let range = Interval::new(MIN_HIT_DISTANCE, max_distance);
        let mut found = Vec::new();
        self.root
            .collect(&self.primitives, ray, range, mask, &mut found);

        let mut hits: Vec<Hit> = found
            .into_iter()
            .map(|found| self.make_hit(ray, found))
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits
    }
}
