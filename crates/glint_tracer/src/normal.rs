//! Smooth shading normals from per-vertex normals.
//!
//! The hit point is projected from the vertex farthest from it onto the
//! opposite edge. The edge point's normal blends the two edge vertices by
//! distance along the edge, and the result blends toward the far vertex's
//! normal by how far the hit point sits from the edge.

use glint_core::Mesh;
use glint_math::{Plane, Ray, Vec3};

use crate::intersect::Hit;

/// Lengths below this make the interpolation undefined.
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Interpolated normal at `point` inside a triangle.
///
/// `positions` and `normals` are the triangle's world-space vertices and
/// vertex normals in winding order, and `flat_normal` is the face normal.
/// Returns `None` when the geometry is degenerate, for example when the
/// projection ray runs parallel to the edge plane.
pub fn interpolate_normal(
    point: Vec3,
    flat_normal: Vec3,
    positions: [Vec3; 3],
    normals: [Vec3; 3],
) -> Option<Vec3> {
    let d = positions.map(|p| p.distance(point));

    // The farthest vertex becomes A, the lowest index winning ties. The
    // other two span the edge B-C in winding order.
    let mut a = 0;
    for i in 1..3 {
        if d[i] > d[a] {
            a = i;
        }
    }
    let (b, c) = match a {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    // Plane containing edge B-C and the face normal
    let edge_plane = Plane::from_points(
        positions[b],
        positions[c] + flat_normal,
        positions[c] - flat_normal,
    )?;

    let toward_point = point - positions[a];
    if toward_point.length() < DEGENERATE_LENGTH {
        return None;
    }
    let ray = Ray::new(positions[a], toward_point);
    let edge_point = ray.at(edge_plane.raycast(&ray)?);

    let edge_length = positions[b].distance(positions[c]);
    let span = edge_point.distance(positions[a]);
    if edge_length < DEGENERATE_LENGTH || span < DEGENERATE_LENGTH {
        return None;
    }

    let along_edge = (positions[b].distance(edge_point) / edge_length).clamp(0.0, 1.0);
    let edge_normal = lerp(normals[b], normals[c], along_edge);

    let toward_far = (edge_point.distance(point) / span).clamp(0.0, 1.0);
    Some(lerp(edge_normal, normals[a], toward_far))
}

/// `from` exactly when both ends are equal, unlike `Vec3::lerp`.
fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from + (to - from) * t
}

/// Shading normal for a hit.
///
/// Uses the mesh's vertex normals taken to world space with the hit's
/// transform, oriented to the same side as the hit's flat normal. Falls back
/// to the flat normal when the mesh has no normals or interpolation fails.
pub fn smooth_normal(hit: &Hit, mesh: &Mesh) -> Vec3 {
    match try_smooth_normal(hit, mesh) {
        Some(normal) => normal,
        None => {
            log::debug!(
                "Normal interpolation failed for triangle {} at {:?}, using flat normal",
                hit.triangle_index,
                hit.point
            );
            hit.normal
        }
    }
}

fn try_smooth_normal(hit: &Hit, mesh: &Mesh) -> Option<Vec3> {
    let [i0, i1, i2] = mesh.triangle(hit.triangle_index)?;

    let position = |i: u32| {
        mesh.positions
            .get(i as usize)
            .map(|p| hit.transform.transform_point3(*p))
    };
    let positions = [position(i0)?, position(i1)?, position(i2)?];

    let normal_matrix = hit.transform.inverse().transpose();
    let normal = |i: u32| {
        mesh.normal(i)
            .and_then(|n| normal_matrix.transform_vector3(n).try_normalize())
    };
    let normals = [normal(i0)?, normal(i1)?, normal(i2)?];

    let smooth = interpolate_normal(hit.point, hit.normal, positions, normals)?.try_normalize()?;
    if smooth.dot(hit.normal) < 0.0 {
        Some(-smooth)
    } else {
        Some(smooth)
    }
}
