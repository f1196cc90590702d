//! Generation settings and their TOML loader.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the standard 1000x1000 white canvas, quarter-size sprites, three passes
//! and JPEG quality 95.
//!
//! ```toml
//! canvas_width = 800
//! canvas_height = 600
//! background = [250, 245, 235]
//! scale = 0.25
//! passes = 3
//! jpeg_quality = 90
//! shadow = true
//! resize_filter = "lanczos3"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::plan::DEFAULT_PASSES;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Settings for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Solid fill of the canvas before any placement
    pub background: [u8; 3],
    /// Linear scale applied to both sprites after loading
    pub scale: f64,
    /// Number of layering passes
    pub passes: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Run the shadow stage on both sprites
    pub shadow: bool,
    /// Filter used when scaling sprites
    pub resize_filter: FilterType,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 1000,
            background: [255, 255, 255],
            scale: 0.25,
            passes: DEFAULT_PASSES,
            jpeg_quality: 95,
            shadow: false,
            resize_filter: FilterType::Bilinear,
        }
    }
}

impl SynthConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SynthConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges, collecting every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.canvas_width == 0 || self.canvas_height == 0 {
            errors.push(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 || self.scale > 1.0 {
            errors.push(format!("scale must be in (0, 1], got {}", self.scale));
        }
        if self.passes == 0 {
            errors.push("passes must be at least 1".to_string());
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            errors.push(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
