//! glint - render a scene file to a raw RGBA float buffer.

mod cli;
mod job;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_tracer::{render, BvhIntersector};

use crate::cli::Args;
use crate::job::RenderJob;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let start = Instant::now();

    let mut job = RenderJob::load(&args.job)?;
    job.apply_overrides(&args);

    let base_dir = args.job.parent().unwrap_or_else(|| Path::new("."));
    let scene = job
        .scene
        .build(base_dir)
        .with_context(|| format!("Failed to build scene from {}", args.job.display()))?;

    let intersector = BvhIntersector::build(&scene);
    let image = render(&scene, &intersector, &job.camera, &job.render)
        .context("Invalid render settings")?;

    std::fs::write(&args.output, image.to_raw_bytes())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} ({}x{} RGBA f32, little-endian) in {:.2?}",
        args.output.display(),
        image.width,
        image.height,
        start.elapsed()
    );

    Ok(())
}
