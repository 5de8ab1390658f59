use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cli::Cli;
use crate::environment::EnvironmentPreset;

/// Runtime configuration, loadable from a JSON file
///
/// Every field has a default, so a config file only needs to name what it
/// changes. CLI flags override the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub environment: EnvironmentPreset,
    /// Show the FPS overlay
    pub overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            environment: EnvironmentPreset::City,
            overlay: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "vitrine".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Fold CLI overrides into this configuration
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
        if let Some(environment) = cli.environment {
            self.environment = environment;
        }
        if cli.no_ui {
            self.overlay = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();

        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.environment, EnvironmentPreset::City);
        assert!(config.overlay);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "environment": "night" }"#).expect("valid config");

        assert_eq!(config.environment, EnvironmentPreset::Night);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let config = Config {
            window: WindowConfig {
                width: 640,
                height: 480,
                title: "test".to_string(),
            },
            environment: EnvironmentPreset::Sunset,
            overlay: false,
        };

        let text = serde_json::to_string(&config).expect("serialize");
        let back: Config = serde_json::from_str(&text).expect("deserialize");

        assert_eq!(back, config);
    }
}
