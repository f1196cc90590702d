//! Ratio-driven placement of two sprite classes.
//!
//! # Counts
//!
//! The tiling unit is class A's scaled footprint. It estimates how many
//! sprite copies fit the canvas:
//!
//! ```text
//! n_total = floor(canvas_h / sprite_h) * floor(canvas_w / sprite_w)
//! n_a     = round_half_up(n_total * ratio)
//! n_b     = n_total - n_a
//! ```
//!
//! Only class A's footprint is used even when class B scales to a different
//! size.
//!
//! # Passes
//!
//! Every pass places `n_a` copies of class A and then `n_b` copies of class
//! B. Each copy gets a fresh whole-degree rotation in `[0, 360)` and a
//! uniformly sampled offset that keeps the rotated box inside the canvas, and
//! is composited immediately.
//!
//! Placements are allowed to overlap, within a pass and across passes. The
//! layered, overlapping look is the intended texture of the image, so the
//! measured pixel share of class A only approximates the requested ratio.
//! The requested ratio stays the answer.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::composite::composite_over;
use crate::error::{SynthError, SynthResult};
use crate::raster::Raster;
use crate::transform::rotate_sprite;

/// Default number of layering passes.
pub const DEFAULT_PASSES: u32 = 3;

/// Which of the two sprite classes a placement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteClass {
    /// The class whose share the ratio describes.
    A,
    /// The complementary class.
    B,
}

/// Per-pass placement counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCounts {
    /// Copies placed per pass, both classes together.
    pub total: u32,
    /// Class A copies per pass.
    pub class_a: u32,
    /// Class B copies per pass.
    pub class_b: u32,
}

/// One composite performed by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Zero-based pass index.
    pub pass: u32,
    pub class: SpriteClass,
    /// Counter-clockwise rotation applied to the sprite.
    pub angle_degrees: f64,
    /// Left edge of the rotated box on the canvas.
    pub x: u32,
    /// Top edge of the rotated box on the canvas.
    pub y: u32,
    /// Rotated box width.
    pub width: u32,
    /// Rotated box height.
    pub height: u32,
}

/// Reject ratios that are NaN or outside [0, 1].
pub fn validate_ratio(ratio: f64) -> SynthResult<f64> {
    if ratio.is_nan() || !(0.0..=1.0).contains(&ratio) {
        return Err(SynthError::InvalidRatio(ratio));
    }
    Ok(ratio)
}

/// Number of sprite copies per pass for a canvas and a tiling footprint.
///
/// # Errors
///
/// Returns `SynthError::Dimension` if the footprint is empty or does not fit
/// the canvas at least once.
pub fn tiling_total(
    canvas_width: u32,
    canvas_height: u32,
    footprint_width: u32,
    footprint_height: u32,
) -> SynthResult<u32> {
    if footprint_width == 0 || footprint_height == 0 {
        return Err(SynthError::Dimension(format!(
            "empty tiling footprint {footprint_width}x{footprint_height}"
        )));
    }

    let rows = canvas_height / footprint_height;
    let cols = canvas_width / footprint_width;
    let total = rows.checked_mul(cols).ok_or_else(|| {
        SynthError::Dimension(format!("tiling count {rows}x{cols} overflows"))
    })?;

    if total == 0 {
        return Err(SynthError::Dimension(format!(
            "sprite footprint {footprint_width}x{footprint_height} does not fit canvas {canvas_width}x{canvas_height}"
        )));
    }
    Ok(total)
}

/// Split `total` copies between the classes.
///
/// `class_a = round_half_up(total * ratio)`, so a share of exactly one half
/// rounds toward class A.
pub fn split_counts(total: u32, ratio: f64) -> SynthResult<PlacementCounts> {
    let ratio = validate_ratio(ratio)?;
    // f64::round is half away from zero, i.e. half-up for non-negative values
    let class_a = ((total as f64 * ratio).round() as u32).min(total);
    Ok(PlacementCounts {
        total,
        class_a,
        class_b: total - class_a,
    })
}

/// Compute per-pass counts for a canvas, a tiling footprint and a ratio.
pub fn plan_counts(
    canvas_width: u32,
    canvas_height: u32,
    footprint: (u32, u32),
    ratio: f64,
) -> SynthResult<PlacementCounts> {
    let ratio = validate_ratio(ratio)?;
    let total = tiling_total(canvas_width, canvas_height, footprint.0, footprint.1)?;
    split_counts(total, ratio)
}

/// Sample a rotation angle: a whole number of degrees in [0, 360).
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(0u32..360) as f64
}

/// Sample an offset so that `[offset, offset + sprite_extent]` stays inside
/// `[0, canvas_extent]`. Both ends of the range are reachable.
pub fn sample_offset<R: Rng + ?Sized>(
    canvas_extent: u32,
    sprite_extent: u32,
    rng: &mut R,
) -> SynthResult<u32> {
    let max = canvas_extent.checked_sub(sprite_extent).ok_or_else(|| {
        SynthError::Dimension(format!(
            "rotated sprite extent {sprite_extent} exceeds canvas extent {canvas_extent}"
        ))
    })?;
    Ok(rng.random_range(0..=max))
}

/// Drives rotation and compositing for all passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPlanner {
    passes: u32,
}

impl Default for PlacementPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_PASSES)
    }
}

impl PlacementPlanner {
    /// Create a planner running `passes` layering passes.
    pub fn new(passes: u32) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Rotate `sprite` by a random angle and composite it at a random,
    /// bounds-safe offset.
    pub fn place_one<R: Rng + ?Sized>(
        &self,
        canvas: &mut Raster,
        sprite: &Raster,
        class: SpriteClass,
        pass: u32,
        rng: &mut R,
    ) -> SynthResult<Placement> {
        let angle_degrees = random_angle(rng);
        let rotated = rotate_sprite(sprite, angle_degrees)?;
        let (width, height) = rotated.dimensions();

        let x = sample_offset(canvas.width(), width, rng)?;
        let y = sample_offset(canvas.height(), height, rng)?;

        composite_over(canvas, &rotated, x, y)?;

        let placement = Placement {
            pass,
            class,
            angle_degrees,
            x,
            y,
            width,
            height,
        };
        trace!(?placement, "placed sprite");
        Ok(placement)
    }

    /// Run every pass with fixed `counts`, returning the placements in the
    /// order they were composited.
    pub fn run<R: Rng + ?Sized>(
        &self,
        canvas: &mut Raster,
        sprite_a: &Raster,
        sprite_b: &Raster,
        counts: PlacementCounts,
        rng: &mut R,
    ) -> SynthResult<Vec<Placement>> {
        let mut placements = Vec::with_capacity(counts.total as usize * self.passes as usize);

        for pass in 0..self.passes {
            debug!(
                pass,
                class_a = counts.class_a,
                class_b = counts.class_b,
                "starting pass"
            );
            for _ in 0..counts.class_a {
                placements.push(self.place_one(canvas, sprite_a, SpriteClass::A, pass, rng)?);
            }
            for _ in 0..counts.class_b {
                placements.push(self.place_one(canvas, sprite_b, SpriteClass::B, pass, rng)?);
            }
        }

        Ok(placements)
    }

    /// Derive counts from the canvas and class A's footprint, then run every
    /// pass.
    pub fn plan_and_run<R: Rng + ?Sized>(
        &self,
        canvas: &mut Raster,
        sprite_a: &Raster,
        sprite_b: &Raster,
        ratio: f64,
        rng: &mut R,
    ) -> SynthResult<(PlacementCounts, Vec<Placement>)> {
        let counts = plan_counts(canvas.width(), canvas.height(), sprite_a.dimensions(), ratio)?;
        debug!(
            total = counts.total,
            class_a = counts.class_a,
            class_b = counts.class_b,
            ratio,
            "planned placement counts"
        );
        let placements = self.run(canvas, sprite_a, sprite_b, counts, rng)?;
        Ok((counts, placements))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
