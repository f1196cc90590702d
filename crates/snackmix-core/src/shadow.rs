//! Optional soft-shadow stage for sprites.
//!
//! Blends each sprite pixel's color with a Gaussian-blurred copy of the
//! sprite, weighted by its own alpha:
//!
//! ```text
//! rgb = α * rgb + (1 - α) * blur(rgb)
//! ```
//!
//! Opaque pixels keep their color; translucent fringes pick up the blurred
//! surroundings. Alpha is left untouched, so the stage never changes which
//! pixels a sprite covers. It runs only when `SynthConfig::shadow` is set.

use crate::error::SynthResult;
use crate::raster::{ChannelLayout, Raster};

/// Gaussian sigma matching a 15x15 kernel.
pub const SHADOW_SIGMA: f32 = 2.6;

/// Apply the shadow blend to an RGBA sprite, returning a new sprite.
pub fn apply_shadow(sprite: &Raster) -> SynthResult<Raster> {
    sprite.require_layout(ChannelLayout::Rgba)?;
    if sprite.is_empty() {
        return Ok(sprite.clone());
    }

    let rgb: Vec<u8> = sprite
        .pixels()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let rgb = Raster::new(sprite.width(), sprite.height(), ChannelLayout::Rgb, rgb)?;
    let blurred = image::imageops::blur(&rgb.to_rgb_image()?, SHADOW_SIGMA);

    let mut out = sprite.clone();
    for (px, shade) in out
        .pixels_mut()
        .chunks_exact_mut(4)
        .zip(blurred.as_raw().chunks_exact(3))
    {
        let alpha = px[3] as f32 / 255.0;
        for c in 0..3 {
            let v = alpha * px[c] as f32 + (1.0 - alpha) * shade[c] as f32;
            px[c] = v.clamp(0.0, 255.0).round() as u8;
        }
    }

    Ok(out)
}
