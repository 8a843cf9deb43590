//! Small vector helpers shared by the tracer.

use crate::Vec3;

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
///
/// Zero-length input yields 0. The cosine is clamped so that parallel
/// unit vectors give exactly 0 instead of NaN.
pub fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Reflect a direction about a normal.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}
