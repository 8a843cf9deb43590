//! Square tiles of the output image.
//!
//! A frame is cut into buckets that are traced independently, then copied
//! back into the image in any order.

use glint_core::Color;

use crate::camera::PinholeCamera;
use crate::renderer::render_pixel;
use crate::tracer::RayTracer;

pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// A tile of the output image. Buckets on the right and bottom edges are
/// clipped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the order returned by `generate_buckets`
    pub index: usize,
}

impl Bucket {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinates covered by this bucket, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// Traced colors of one bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Same order as `Bucket::pixels`
    pub pixels: Vec<Color>,
}

/// Tile a `width` x `height` image with `bucket_size` squares, left to
/// right and then top to bottom.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let step = bucket_size.max(1) as usize;
    (0..height)
        .step_by(step)
        .flat_map(|y| (0..width).step_by(step).map(move |x| (x, y)))
        .enumerate()
        .map(|(index, (x, y))| Bucket {
            x,
            y,
            width: (width - x).min(step as u32),
            height: (height - y).min(step as u32),
            index,
        })
        .collect()
}

/// Trace every pixel of a bucket.
pub fn render_bucket(
    bucket: &Bucket,
    tracer: &RayTracer,
    camera: &PinholeCamera,
    scale: f32,
) -> BucketResult {
    let pixels = bucket
        .pixels()
        .map(|(x, y)| render_pixel(tracer, camera, x, y, scale))
        .collect();
    BucketResult {
        bucket: *bucket,
        pixels,
    }
}
