//! Sprite rotation into an expanded, non-clipping frame.
//!
//! # Algorithm
//!
//! The rotation uses inverse mapping: for each pixel in the output frame we
//! calculate which source position contributes to it and sample it with
//! bilinear interpolation. Pixel centers sit at `i + 0.5`, so quarter turns
//! map pixels onto pixels exactly.
//!
//! For a counter-clockwise rotation by θ (image coordinates, y down), with
//! `(dx, dy)` measured from the output frame's center:
//! ```text
//! src_x = dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y = dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! Rotating about the source center and re-centering inside the expanded
//! frame is the same affine map as a rotation about `(w/2, h/2)` followed by
//! a translation of `(w'/2 - w/2, h'/2 - h/2)`.
//!
//! All four channels share the same sample weights. Color is interpolated
//! alpha-weighted so transparent neighbors never darken an edge, and samples
//! outside the source read as fully transparent.

use crate::error::SynthResult;
use crate::raster::{ChannelLayout, Raster};

/// Tolerance in degrees for treating an angle as an exact quarter turn.
const QUARTER_TURN_EPSILON: f64 = 0.001;

/// Compute the dimensions of the bounding box for a rotated sprite.
///
/// When a sprite is rotated, the corners extend beyond the original bounds.
/// This function calculates the minimum bounding box that contains the
/// entire rotated sprite:
///
/// ```text
/// w' = round(h * |sin θ| + w * |cos θ|)
/// h' = round(h * |cos θ| + w * |sin θ|)
/// ```
///
/// # Arguments
///
/// * `width` - Original sprite width
/// * `height` - Original sprite height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height), never smaller than 1x1.
///
/// # Example
///
/// ```
/// use snackmix_core::transform::compute_rotated_bounds;
///
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
///
/// // No rotation preserves dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (h * sin + w * cos).round() as u32;
    let new_h = (h * cos + w * sin).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Number of counter-clockwise quarter turns `angle_degrees` corresponds to,
/// or `None` if the angle is not axis-aligned.
///
/// Handles negative angles and multiples of 360.
pub fn quarter_turns(angle_degrees: f64) -> Option<u8> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < QUARTER_TURN_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Rotate an RGBA sprite around its center.
///
/// The output frame is expanded to fit the entire rotated sprite (no
/// clipping); its size is [`compute_rotated_bounds`]. Pixels outside the
/// rotated silhouette have alpha 0.
///
/// # Arguments
///
/// * `sprite` - RGBA source sprite
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Errors
///
/// Returns `SynthError::LayoutMismatch` if `sprite` is not RGBA.
pub fn rotate_sprite(sprite: &Raster, angle_degrees: f64) -> SynthResult<Raster> {
    sprite.require_layout(ChannelLayout::Rgba)?;

    if sprite.is_empty() {
        return Ok(sprite.clone());
    }

    match quarter_turns(angle_degrees) {
        Some(turns) => rotate_quarter_turns(sprite, turns),
        None => rotate_bilinear(sprite, angle_degrees),
    }
}

/// Exact rotation by a multiple of 90 degrees counter-clockwise.
fn rotate_quarter_turns(sprite: &Raster, turns: u8) -> SynthResult<Raster> {
    if turns % 4 == 0 {
        return Ok(sprite.clone());
    }

    let rgba = sprite.to_rgba_image()?;
    // image's rotate90/rotate270 are clockwise
    let rotated = match turns % 4 {
        1 => image::imageops::rotate270(&rgba),
        2 => image::imageops::rotate180(&rgba),
        _ => image::imageops::rotate90(&rgba),
    };
    Ok(Raster::from_rgba_image(rotated))
}

fn rotate_bilinear(sprite: &Raster, angle_degrees: f64) -> SynthResult<Raster> {
    let (src_w, src_h) = sprite.dimensions();
    let (dst_w, dst_h) = compute_rotated_bounds(src_w, src_h, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w as f64 / 2.0;
    let src_cy = src_h as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Pixel center relative to the frame center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to source index space (pixel centers at i + 0.5)
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 4;
            output[idx..idx + 4].copy_from_slice(&sample_bilinear(sprite, src_x, src_y));
        }
    }

    Raster::new(dst_w, dst_h, ChannelLayout::Rgba, output)
}

/// Fetch a pixel as [f64; 4], transparent black outside the sprite.
#[inline]
fn get_pixel_f64(sprite: &Raster, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 || px >= sprite.width() as i64 || py >= sprite.height() as i64 {
        return [0.0; 4];
    }
    let p = sprite.pixel(px as u32, py as u32);
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

/// Sample a pixel using alpha-weighted bilinear interpolation.
///
/// Considers the 4 nearest pixels. Alpha is interpolated directly; color is
/// interpolated premultiplied and divided back by the resulting alpha.
fn sample_bilinear(sprite: &Raster, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (sprite.width() as f64, sprite.height() as f64);

    // Entirely outside the footprint, including the half-pixel fringe
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0; 4];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let taps = [
        (get_pixel_f64(sprite, x0, y0), (1.0 - fx) * (1.0 - fy)),
        (get_pixel_f64(sprite, x0 + 1, y0), fx * (1.0 - fy)),
        (get_pixel_f64(sprite, x0, y0 + 1), (1.0 - fx) * fy),
        (get_pixel_f64(sprite, x0 + 1, y0 + 1), fx * fy),
    ];

    let mut color = [0.0f64; 3];
    let mut alpha = 0.0f64;
    for (p, weight) in taps {
        let wa = weight * p[3];
        alpha += wa;
        for c in 0..3 {
            color[c] += p[c] * wa;
        }
    }

    let out_alpha = alpha.clamp(0.0, 255.0).round() as u8;
    if out_alpha == 0 {
        return [0; 4];
    }

    let mut result = [0u8; 4];
    for c in 0..3 {
        result[c] = (color[c] / alpha).clamp(0.0, 255.0).round() as u8;
    }
    result[3] = out_alpha;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    /// Opaque sprite with a gradient pattern.
    fn test_sprite(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, 255 - v, 64, 255]);
            }
        }
        Raster::new(width, height, ChannelLayout::Rgba, pixels).unwrap()
    }

    /// Opaque `inner` x `inner` square centered in a transparent `size` x `size` sprite.
    fn disc_sprite(size: u32, inner: u32) -> Raster {
        let start = (size - inner) / 2;
        let mut pixels = vec![0u8; (size * size * 4) as usize];
        for y in start..start + inner {
            for x in start..start + inner {
                let idx = ((y * size + x) * 4) as usize;
                pixels[idx..idx + 4].copy_from_slice(&[200, 120, 40, 255]);
            }
        }
        Raster::new(size, size, ChannelLayout::Rgba, pixels).unwrap()
    }

    #[test]
    fn test_no_rotation() {
        let sprite = test_sprite(100, 50);
        let result = rotate_sprite(&sprite, 0.0).unwrap();
        assert_eq!(result, sprite);
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(quarter_turns(0.0), Some(0));
        assert_eq!(quarter_turns(90.0), Some(1));
        assert_eq!(quarter_turns(180.0), Some(2));
        assert_eq!(quarter_turns(270.0), Some(3));
        assert_eq!(quarter_turns(360.0), Some(0));
        assert_eq!(quarter_turns(-90.0), Some(3));
        assert_eq!(quarter_turns(450.0), Some(1));
        assert_eq!(quarter_turns(359.9999), Some(0));
        assert_eq!(quarter_turns(45.0), None);
        assert_eq!(quarter_turns(1.0), None);
    }

    #[test]
    fn test_axis_aligned_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert_eq!((w, h), (141, 141));
    }

    #[test]
    fn test_bounds_formula() {
        // w' = round(h|sin| + w|cos|), h' = round(h|cos| + w|sin|)
        let (w, h) = compute_rotated_bounds(80, 40, 30.0);
        let rad = 30f64.to_radians();
        assert_eq!(w, (40.0 * rad.sin() + 80.0 * rad.cos()).round() as u32);
        assert_eq!(h, (40.0 * rad.cos() + 80.0 * rad.sin()).round() as u32);
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1.0, 15.0, 45.0, 89.0, 90.0, 135.0, 179.0, 180.0, 270.0, 359.0] {
            let (w, h) = compute_rotated_bounds(1, 1, angle);
            assert!(w > 0, "Width should be > 0 for angle {}", angle);
            assert!(h > 0, "Height should be > 0 for angle {}", angle);
        }
    }

    #[test]
    fn test_90_degree_is_counter_clockwise() {
        // Marker in the top-right corner moves to the top-left corner
        let mut pixels = vec![0u8; 4 * 2 * 4];
        pixels[3 * 4..3 * 4 + 4].copy_from_slice(&[255, 0, 0, 255]);
        let sprite = Raster::new(4, 2, ChannelLayout::Rgba, pixels).unwrap();

        let rotated = rotate_sprite(&sprite, 90.0).unwrap();
        assert_eq!(rotated.dimensions(), (2, 4));
        assert_eq!(rotated.pixel(0, 0), &[255, 0, 0, 255]);
    }

    #[test]
    fn test_bilinear_matches_exact_quarter_turn() {
        let sprite = test_sprite(7, 5);
        let exact = rotate_sprite(&sprite, 90.0).unwrap();
        let sampled = rotate_bilinear(&sprite, 90.0).unwrap();
        assert_eq!(sampled, exact);

        let exact = rotate_sprite(&sprite, 180.0).unwrap();
        let sampled = rotate_bilinear(&sprite, 180.0).unwrap();
        assert_eq!(sampled, exact);
    }

    #[test]
    fn test_rotation_expands_frame() {
        let sprite = test_sprite(100, 100);
        let result = rotate_sprite(&sprite, 45.0).unwrap();

        assert!(result.width() > sprite.width());
        assert!(result.height() > sprite.height());
        assert_eq!(result.layout(), ChannelLayout::Rgba);
    }

    #[test]
    fn test_corners_transparent_after_rotation() {
        let sprite = test_sprite(40, 40);
        let rotated = rotate_sprite(&sprite, 45.0).unwrap();
        let (w, h) = rotated.dimensions();

        for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
            assert_eq!(rotated.pixel(x, y)[3], 0, "corner ({}, {}) not transparent", x, y);
        }
        // Center stays opaque
        assert_eq!(rotated.pixel(w / 2, h / 2)[3], 255);
    }

    #[test]
    fn test_transparent_sprite_stays_transparent() {
        let sprite = Raster::new(16, 9, ChannelLayout::Rgba, vec![0u8; 16 * 9 * 4]).unwrap();
        for angle in [13.0, 45.0, 90.0, 200.0, 333.0] {
            let rotated = rotate_sprite(&sprite, angle).unwrap();
            assert!(
                rotated.pixels().iter().all(|&v| v == 0),
                "angle {} leaked color",
                angle
            );
        }
    }

    #[test]
    fn test_transparent_border_does_not_darken_edges() {
        let sprite = disc_sprite(30, 10);
        let rotated = rotate_sprite(&sprite, 30.0).unwrap();

        for px in rotated.pixels().chunks_exact(4) {
            if px[3] > 0 {
                // Alpha-weighted sampling keeps the sprite color on soft edges
                assert!((px[0] as i32 - 200).abs() <= 1, "red drifted: {:?}", px);
                assert!((px[1] as i32 - 120).abs() <= 1, "green drifted: {:?}", px);
            }
        }
    }

    #[test]
    fn test_rotation_center_preservation() {
        let sprite = disc_sprite(21, 3);
        let rotated = rotate_sprite(&sprite, 37.0).unwrap();
        let (w, h) = rotated.dimensions();
        assert_eq!(rotated.pixel(w / 2, h / 2)[3], 255);
    }

    #[test]
    fn test_1x1_sprite_rotation() {
        let sprite = Raster::new(1, 1, ChannelLayout::Rgba, vec![128, 128, 128, 255]).unwrap();
        let result = rotate_sprite(&sprite, 45.0).unwrap();
        assert!(result.width() >= 1);
        assert!(result.height() >= 1);
    }

    #[test]
    fn test_very_thin_sprite_rotation() {
        let sprite = test_sprite(100, 1);
        let result = rotate_sprite(&sprite, 45.0).unwrap();
        assert_eq!(result.dimensions(), (71, 71));
    }

    #[test]
    fn test_rejects_rgb() {
        let canvas = Raster::filled(4, 4, ChannelLayout::Rgb, &[0, 0, 0]).unwrap();
        assert!(matches!(
            rotate_sprite(&canvas, 30.0),
            Err(SynthError::LayoutMismatch { .. })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=200, 1u32..=200)
    }

    proptest! {
        /// Property: Axis-aligned angles never inflate the frame.
        #[test]
        fn prop_axis_aligned_exact(
            (width, height) in dimensions_strategy(),
            turns in 0u32..8,
        ) {
            let angle = turns as f64 * 90.0;
            let (w, h) = compute_rotated_bounds(width, height, angle);
            if turns % 2 == 0 {
                prop_assert_eq!((w, h), (width, height));
            } else {
                prop_assert_eq!((w, h), (height, width));
            }
        }

        /// Property: The frame perimeter never shrinks.
        #[test]
        fn prop_perimeter_never_shrinks(
            (width, height) in dimensions_strategy(),
            angle in 0u32..360,
        ) {
            let (w, h) = compute_rotated_bounds(width, height, angle as f64);
            prop_assert!(w + h >= width + height, "{}x{} at {} -> {}x{}", width, height, angle, w, h);
        }

        /// Property: Square sprites never shrink in either dimension.
        #[test]
        fn prop_square_never_shrinks(
            size in 1u32..=200,
            angle in 0u32..360,
        ) {
            let (w, h) = compute_rotated_bounds(size, size, angle as f64);
            prop_assert!(w >= size && h >= size);
        }

        /// Property: Rotated raster dimensions always equal the computed bounds.
        #[test]
        fn prop_output_matches_bounds(
            (width, height) in (1u32..=24, 1u32..=24),
            angle in 0u32..360,
        ) {
            let sprite = Raster::new(
                width,
                height,
                ChannelLayout::Rgba,
                vec![255u8; (width * height * 4) as usize],
            ).unwrap();
            let rotated = rotate_sprite(&sprite, angle as f64).unwrap();
            prop_assert_eq!(rotated.dimensions(), compute_rotated_bounds(width, height, angle as f64));
            prop_assert_eq!(rotated.pixels().len(), rotated.pixel_count() as usize * 4);
        }
    }
}
