//! Application configuration module.
//!
//! Handles loading and validating the optional `config.toml` passed with
//! `--config`. Every key has a default, so a missing file and an empty file
//! behave identically.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! size = 128                       # Longer side of gallery thumbnails, px
//! cache_dir = ".assembler_thumbs"  # Hidden cache folder inside each image folder
//!
//! [preview]
//! dpi = 300                        # Pixels per inch for the on-screen canvas preview
//! padding = 50.0                   # Space around the preview canvas, px
//!
//! [settings]
//! file_name = ".assembler_settings"
//!
//! [canvas]                         # Used when a folder has no settings file yet
//! width = 8.0
//! height = 10.0
//! margin_top = 1.0
//! margin_bottom = 1.0
//! margin_left = 1.0
//! margin_right = 1.0
//! ```
//!
//! Per-folder state (canvas and selection) is not stored here; it lives in the
//! folder's settings file, see [`settings`](crate::settings).
//!
//! Unknown keys are rejected to catch typos early.

use crate::layout::CanvasSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Gallery thumbnail generation and caching.
    pub thumbnails: ThumbnailsConfig,
    /// Full-view canvas preview.
    pub preview: PreviewConfig,
    /// Per-folder settings file.
    pub settings: SettingsConfig,
    /// Canvas used for folders without saved settings.
    pub canvas: CanvasSpec,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size must be non-zero".into(),
            ));
        }
        if self.thumbnails.cache_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.cache_dir must not be empty".into(),
            ));
        }
        if self.preview.dpi == 0 {
            return Err(ConfigError::Validation(
                "preview.dpi must be non-zero".into(),
            ));
        }
        if !self.preview.padding.is_finite() || self.preview.padding < 0.0 {
            return Err(ConfigError::Validation(
                "preview.padding must be a non-negative number".into(),
            ));
        }
        if self.settings.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "settings.file_name must not be empty".into(),
            ));
        }
        if !self.canvas.is_valid() {
            return Err(ConfigError::Validation(
                "canvas values must be non-negative numbers".into(),
            ));
        }
        Ok(())
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Longer side of a generated thumbnail in pixels.
    pub size: u32,
    /// Cache directory name, relative to the image folder.
    pub cache_dir: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            size: 128,
            cache_dir: ".assembler_thumbs".to_string(),
        }
    }
}

/// Canvas preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub dpi: u32,
    pub padding: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            padding: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Name of the per-folder settings file.
    pub file_name: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            file_name: ".assembler_settings".to_string(),
        }
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate config TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path` if given, otherwise the defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(AppConfig::default()),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Page Assembler Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with `page-assembler --config <file> <command>`.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Gallery thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Longer side of each generated thumbnail, in pixels.
size = 128

# Hidden folder, created inside the image folder, holding cached thumbnails.
# Cached files are never refreshed; delete the folder to regenerate them.
cache_dir = ".assembler_thumbs"

# ---------------------------------------------------------------------------
# Full-view canvas preview
# ---------------------------------------------------------------------------
[preview]
# Pixels per inch used to size the on-screen canvas before it is scaled
# into the window.
dpi = 300

# Space left around the canvas inside the preview area, in pixels.
padding = 50.0

# ---------------------------------------------------------------------------
# Per-folder settings
# ---------------------------------------------------------------------------
[settings]
# File written into each image folder holding the canvas and the ordered
# selection.
file_name = ".assembler_settings"

# ---------------------------------------------------------------------------
# Default canvas (inches)
# ---------------------------------------------------------------------------
# Used for folders that have no settings file yet.
[canvas]
width = 8.0
height = 10.0
margin_top = 1.0
margin_bottom = 1.0
margin_left = 1.0
margin_right = 1.0
"##
}
