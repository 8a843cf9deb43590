//! Render job files.
//!
//! A job is a scene description with two extra blocks: `camera`, and an
//! optional `render` block of `RenderConfig` fields.

use std::path::Path;

use anyhow::{Context, Result};
use glint_core::SceneDescription;
use glint_tracer::{PinholeCamera, RenderConfig};
use serde::Deserialize;

use crate::cli::Args;

#[derive(Debug, Deserialize)]
pub struct RenderJob {
    #[serde(flatten)]
    pub scene: SceneDescription,
    pub camera: PinholeCamera,
    #[serde(default)]
    pub render: RenderConfig,
}

impl RenderJob {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut job: RenderJob = serde_json::from_str(json).context("Invalid render job")?;
        job.camera.initialize();
        Ok(job)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply command-line overrides to the render block.
    pub fn apply_overrides(&mut self, args: &Args) {
        let render = &mut self.render;
        if let Some(max_depth) = args.max_depth {
            render.max_depth = max_depth;
        }
        if args.no_lighting {
            render.use_lighting = false;
        }
        if args.flat_shading {
            render.smooth_edges = false;
        }
        if args.single_material {
            render.single_material_only = true;
        }
        if let Some(scale) = args.scale {
            render.resolution_scale = scale;
        }
    }
}
