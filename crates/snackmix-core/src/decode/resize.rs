//! Sprite downscaling.
//!
//! Sprites are shrunk to a fixed fraction of their linear size before
//! placement. Uses the `image` crate's resampling filters and returns new
//! rasters without modifying the input.

use super::FilterType;
use crate::error::{SynthError, SynthResult};
use crate::raster::{ChannelLayout, Raster};

/// Compute the scaled dimensions of a `width` x `height` sprite.
///
/// Each dimension is multiplied by `scale` and floored, so a scale of 0.25
/// behaves like integer division by 4.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).floor() as u32;
    let h = (height as f64 * scale).floor() as u32;
    (w, h)
}

/// Scale a sprite by `scale` of its linear size.
///
/// # Arguments
///
/// * `sprite` - RGBA source sprite
/// * `scale` - Linear scale factor, must be finite and positive
/// * `filter` - Interpolation filter to use
///
/// # Errors
///
/// Returns `SynthError::Dimension` if the factor is invalid or the scaled
/// sprite would have a zero dimension, and `SynthError::LayoutMismatch` for
/// non-RGBA input.
pub fn scale_sprite(sprite: &Raster, scale: f64, filter: FilterType) -> SynthResult<Raster> {
    sprite.require_layout(ChannelLayout::Rgba)?;

    if !scale.is_finite() || scale <= 0.0 {
        return Err(SynthError::Dimension(format!(
            "scale factor must be positive, got {scale}"
        )));
    }

    let (width, height) = scaled_dimensions(sprite.width(), sprite.height(), scale);
    if width == 0 || height == 0 {
        return Err(SynthError::Dimension(format!(
            "sprite {}x{} scaled by {scale} collapses to {width}x{height}",
            sprite.width(),
            sprite.height()
        )));
    }

    // Fast path: if dimensions match, just clone
    if sprite.dimensions() == (width, height) {
        return Ok(sprite.clone());
    }

    let rgba = sprite.to_rgba_image()?;
    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(Raster::from_rgba_image(resized))
}
