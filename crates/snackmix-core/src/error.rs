//! Error type shared by every stage of the generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::raster::ChannelLayout;

/// Errors that can occur while synthesizing a ratio image.
///
/// Every variant is fatal for the current `generate` call. Nothing in the
/// pipeline retries; the caller decides whether to run the whole call again.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A sprite asset is missing, unreadable or not a decodable image.
    #[error("Failed to load sprite '{}': {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    /// A sprite asset decoded fine but carries no alpha channel.
    #[error("Sprite '{}' has no alpha channel", path.display())]
    MissingAlpha { path: PathBuf },

    /// Scaled sprite footprint does not fit the canvas.
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// Encoding failed or the output location could not be written.
    #[error("Failed to encode or write output: {0}")]
    EncodeWrite(String),

    /// A placement region exceeds the canvas.
    #[error(
        "Region {width}x{height} at ({x}, {y}) exceeds canvas {canvas_width}x{canvas_height}"
    )]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    /// Target ratio is NaN or outside [0, 1].
    #[error("Invalid ratio {0}: must be within [0, 1]")]
    InvalidRatio(f64),

    /// A raster carries a different channel layout than the operation needs.
    #[error("Expected {expected} raster, got {actual}")]
    LayoutMismatch {
        expected: ChannelLayout,
        actual: ChannelLayout,
    },

    /// Pixel buffer length does not match `width * height * channels`.
    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// Generation settings failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias used throughout the crate.
pub type SynthResult<T> = Result<T, SynthError>;
