use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render a scene file with the glint ray tracer")]
pub struct Args {
    /// Render job: scene description plus camera and render settings
    pub job: PathBuf,

    #[arg(short, long, default_value = "output.rgba", help = "Raw RGBA f32 output file")]
    pub output: PathBuf,

    #[arg(long, help = "Maximum recursion depth")]
    pub max_depth: Option<u32>,

    #[arg(long, help = "Disable direct lighting")]
    pub no_lighting: bool,

    #[arg(long, help = "Shade with face normals instead of interpolated vertex normals")]
    pub flat_shading: bool,

    #[arg(long, help = "Shade every object with its first material")]
    pub single_material: bool,

    #[arg(long, help = "Output pixels per screen pixel")]
    pub scale: Option<f32>,

    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,
}
