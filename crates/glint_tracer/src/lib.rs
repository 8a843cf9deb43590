//! Glint Tracer - recursive Whitted-style ray tracing.
//!
//! Given a scene and a `SceneIntersector`, the tracer resolves the color seen
//! along each camera ray: surface color from the hit triangle's material,
//! alpha blending with what lies behind, mirror reflection, and direct
//! lighting with soft occlusion through translucent surfaces.
//!
//! # Example
//!
//! ```ignore
//! use glint_tracer::{render, BvhIntersector, PinholeCamera, RenderConfig};
//!
//! let intersector = BvhIntersector::build(&scene);
//! let mut camera = PinholeCamera::new().with_screen(640, 360);
//! camera.initialize();
//! let image = render(&scene, &intersector, &camera, &RenderConfig::default())?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod config;
mod intersect;
mod lighting;
mod material;
mod normal;
mod renderer;
mod tracer;

#[cfg(test)]
mod testing;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhIntersector;
pub use camera::PinholeCamera;
pub use config::{ConfigError, RenderConfig};
pub use intersect::{Hit, SceneIntersector, MIN_HIT_DISTANCE};
pub use lighting::{angular_falloff, range_attenuation, spot_attenuation, LightingEngine};
pub use material::{
    resolve_material, resolve_material_index, sample_color, submesh_index_by_scan,
    MaterialResolver, SubmeshTable,
};
pub use normal::{interpolate_normal, smooth_normal};
pub use renderer::{output_size, render, render_frame, render_pixel, ImageBuffer};
pub use tracer::RayTracer;
