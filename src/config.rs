//! Application configuration.
//!
//! Settings come from an optional TOML file. Every key is optional and
//! falls back to [`SceneConfig::default`]:
//!
//! ```toml
//! title = "Kitchen Island"
//! width = 1280
//! height = 720
//! clear_colour = [0.1, 0.1, 0.12, 1.0]
//! assets_dir = "assets"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File read by [`SceneConfig::from_env`] unless `ISLAND_CONFIG` names another one.
pub const DEFAULT_CONFIG_FILE: &str = "island.toml";
pub const CONFIG_ENV: &str = "ISLAND_CONFIG";
pub const ASSETS_DIR_ENV: &str = "ISLAND_ASSETS_DIR";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA, each channel in 0..1.
    pub clear_colour: [f64; 4],
    /// Directory texture paths are resolved against.
    pub assets_dir: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "Kitchen Island".to_string(),
            width: 1280,
            height: 720,
            clear_colour: [0.1, 0.1, 0.12, 1.0],
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl SceneConfig {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Defaults, overlaid with the config file if one exists, then with
    /// `ISLAND_ASSETS_DIR`. A broken config file is reported and ignored.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            match Self::load(&path) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::error!("ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        if let Some(dir) = std::env::var_os(ASSETS_DIR_ENV) {
            config.assets_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}
