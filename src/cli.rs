// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::environment::EnvironmentPreset;

#[derive(Parser, Debug, Clone)]
#[command(name = "vitrine")]
#[command(about = "Decorative real-time 3D showcase scenes", long_about = None)]
pub struct Cli {
    /// Scene to present
    #[arg(long, value_enum, default_value_t = ScenePick::Hero)]
    pub scene: ScenePick,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Override the window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Override the environment backdrop preset
    #[arg(long)]
    pub environment: Option<EnvironmentPreset>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePick {
    /// Rotating solid, fixed camera
    Showcase,
    /// Particle annulus with drag-to-orbit camera
    Hero,
}
