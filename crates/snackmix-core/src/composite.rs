//! Alpha-over compositing of sprites onto the canvas.
//!
//! For each covered pixel and color channel:
//!
//! ```text
//! dest = α * src + (1 - α) * dest        α = src_alpha / 255
//! ```
//!
//! The destination is mutated in place. Later composites occlude earlier
//! ones; there is no depth buffer.

use crate::error::{SynthError, SynthResult};
use crate::raster::{ChannelLayout, Raster};

/// Check that a `width` x `height` region at `(x, y)` lies fully inside a
/// `canvas_width` x `canvas_height` canvas.
///
/// Uses overflow-safe arithmetic, so huge offsets fail instead of wrapping.
pub fn check_region(
    canvas_width: u32,
    canvas_height: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> SynthResult<()> {
    let fits = |offset: u32, extent: u32, limit: u32| {
        offset
            .checked_add(extent)
            .is_some_and(|end| end <= limit)
    };

    if fits(x, width, canvas_width) && fits(y, height, canvas_height) {
        Ok(())
    } else {
        Err(SynthError::OutOfBounds {
            x,
            y,
            width,
            height,
            canvas_width,
            canvas_height,
        })
    }
}

/// Blend an RGBA sprite onto `canvas` with its top-left corner at `(x, y)`.
///
/// The canvas may be RGB or RGBA; only its color channels are written.
///
/// # Errors
///
/// * `SynthError::LayoutMismatch` if `sprite` is not RGBA
/// * `SynthError::OutOfBounds` if the sprite's box is not fully inside the canvas
///
/// Nothing is written when an error is returned.
///
/// # Example
///
/// ```ignore
/// use snackmix_core::composite::composite_over;
///
/// composite_over(&mut canvas, &rotated, 120, 48)?;
/// ```
pub fn composite_over(canvas: &mut Raster, sprite: &Raster, x: u32, y: u32) -> SynthResult<()> {
    sprite.require_layout(ChannelLayout::Rgba)?;
    check_region(
        canvas.width(),
        canvas.height(),
        x,
        y,
        sprite.width(),
        sprite.height(),
    )?;

    let dst_channels = canvas.layout().channels();
    let canvas_width = canvas.width() as usize;
    let sprite_width = sprite.width() as usize;
    let src = sprite.pixels();
    let dst = canvas.pixels_mut();

    for row in 0..sprite.height() as usize {
        let src_row = &src[row * sprite_width * 4..(row + 1) * sprite_width * 4];
        let dst_start = ((y as usize + row) * canvas_width + x as usize) * dst_channels;
        let dst_row = &mut dst[dst_start..dst_start + sprite_width * dst_channels];

        for (s, d) in src_row
            .chunks_exact(4)
            .zip(dst_row.chunks_exact_mut(dst_channels))
        {
            blend_pixel(&mut d[..3], s);
        }
    }

    Ok(())
}

/// Blend one straight-alpha RGBA source pixel over three destination channels.
#[inline]
fn blend_pixel(dst: &mut [u8], src: &[u8]) {
    match src[3] {
        0 => {}
        255 => dst.copy_from_slice(&src[..3]),
        a => {
            let alpha = a as f32 / 255.0;
            for c in 0..3 {
                let v = alpha * src[c] as f32 + (1.0 - alpha) * dst[c] as f32;
                dst[c] = v.clamp(0.0, 255.0).round() as u8;
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn sprite_strategy(alpha: u8) -> impl Strategy<Value = Raster> {
        (1u32..=8, 1u32..=8).prop_flat_map(move |(w, h)| {
            let size = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), size..=size).prop_map(move |mut pixels| {
                for px in pixels.chunks_exact_mut(4) {
                    px[3] = alpha;
                }
                Raster::new(w, h, ChannelLayout::Rgba, pixels).unwrap()
            })
        })
    }

    proptest! {
        /// Property: Fully transparent sprites never change the canvas.
        #[test]
        fn prop_transparent_identity(
            sprite in sprite_strategy(0),
            fill in any::<[u8; 3]>(),
            x in 0u32..8,
            y in 0u32..8,
        ) {
            let mut canvas = Raster::filled(16, 16, ChannelLayout::Rgb, &fill).unwrap();
            let before = canvas.clone();
            composite_over(&mut canvas, &sprite, x, y).unwrap();
            prop_assert_eq!(canvas, before);
        }

        /// Property: Fully opaque sprites replace the covered region exactly.
        #[test]
        fn prop_opaque_overwrite(
            sprite in sprite_strategy(255),
            x in 0u32..8,
            y in 0u32..8,
        ) {
            let mut canvas = Raster::filled(16, 16, ChannelLayout::Rgb, &[255, 255, 255]).unwrap();
            composite_over(&mut canvas, &sprite, x, y).unwrap();

            for sy in 0..sprite.height() {
                for sx in 0..sprite.width() {
                    prop_assert_eq!(canvas.pixel(x + sx, y + sy), &sprite.pixel(sx, sy)[..3]);
                }
            }
        }

        /// Property: The result always lies between source and destination values.
        #[test]
        fn prop_blend_is_convex(
            src in any::<[u8; 4]>(),
            dst in any::<[u8; 3]>(),
        ) {
            let mut canvas = Raster::filled(1, 1, ChannelLayout::Rgb, &dst).unwrap();
            let sprite = Raster::filled(1, 1, ChannelLayout::Rgba, &src).unwrap();
            composite_over(&mut canvas, &sprite, 0, 0).unwrap();

            for c in 0..3 {
                let lo = src[c].min(dst[c]);
                let hi = src[c].max(dst[c]);
                let v = canvas.pixel(0, 0)[c];
                prop_assert!(v >= lo && v <= hi, "channel {} = {} outside [{}, {}]", c, v, lo, hi);
            }
        }
    }
}
