// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod geometry;
mod interval;
mod plane;
mod ray;

pub use aabb::Aabb;
pub use geometry::{angle_degrees, reflect};
pub use interval::Interval;
pub use plane::Plane;
pub use ray::Ray;
