//! Frame rendering.
//!
//! One camera ray per output pixel, traced bucket by bucket on the rayon
//! thread pool. Buckets share only read-only state, so the frame is
//! identical whatever order they finish in.

use std::time::Instant;

use glint_core::{Color, Scene};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::camera::PinholeCamera;
use crate::config::{ConfigError, RenderConfig};
use crate::intersect::SceneIntersector;
use crate::tracer::RayTracer;

/// Image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        for ((x, y), color) in result.bucket.pixels().zip(&result.pixels) {
            self.set(x, y, *color);
        }
    }

    /// Raw little-endian RGBA `f32` bytes, rows top to bottom.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        if cfg!(target_endian = "little") {
            bytemuck::cast_slice(&self.pixels).to_vec()
        } else {
            self.pixels
                .iter()
                .flat_map(|c| c.to_array())
                .flat_map(f32::to_le_bytes)
                .collect()
        }
    }
}

/// Output size for a screen scaled by `scale`.
pub fn output_size(camera: &PinholeCamera, scale: f32) -> (u32, u32) {
    let scaled = |n: u32| (n as f32 * scale).floor().max(0.0) as u32;
    (scaled(camera.width), scaled(camera.height))
}

/// Color of output pixel `(x, y)`: a camera ray through screen point
/// `(x / scale, y / scale)`, traced from depth 0.
pub fn render_pixel(tracer: &RayTracer, camera: &PinholeCamera, x: u32, y: u32, scale: f32) -> Color {
    let ray = camera.ray_for_screen_point(x as f32 / scale, y as f32 / scale);
    tracer.trace(&ray, 0)
}

/// Render one frame with an existing tracer.
pub fn render_frame(tracer: &RayTracer, camera: &PinholeCamera, config: &RenderConfig) -> ImageBuffer {
    let scale = config.resolution_scale;
    let (width, height) = output_size(camera, scale);
    let buckets = generate_buckets(width, height, config.bucket_size);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, tracer, camera, scale))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }
    image
}

/// Validate the configuration, build a tracer for this frame and render it.
pub fn render(
    scene: &Scene,
    intersector: &dyn SceneIntersector,
    camera: &PinholeCamera,
    config: &RenderConfig,
) -> Result<ImageBuffer, ConfigError> {
    config.validate()?;

    let start = Instant::now();
    let tracer = RayTracer::new(scene, intersector, config);
    let image = render_frame(&tracer, camera, config);

    log::info!(
        "Rendered {}x{} frame in {:.2?}",
        image.width,
        image.height,
        start.elapsed()
    );

    Ok(image)
}
