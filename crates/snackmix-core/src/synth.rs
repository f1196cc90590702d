//! End-to-end image synthesis.
//!
//! The pipeline is linear and stops at the first error:
//!
//! 1. validate the configuration and the ratio
//! 2. load both sprites (alpha required)
//! 3. scale each sprite by `SynthConfig::scale`
//! 4. optionally run the shadow stage
//! 5. fill a fresh canvas with the background color
//! 6. run the placement planner
//! 7. encode the canvas as JPEG and write it out
//!
//! # Example
//!
//! ```ignore
//! use snackmix_core::synth::generate;
//!
//! generate(0.3, "quiz.jpg".as_ref(), "snack_a.png".as_ref(), "snack_b.png".as_ref())?;
//! ```

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::SynthConfig;
use crate::decode::{load_sprite, scale_sprite};
use crate::encode::write_jpeg;
use crate::error::SynthResult;
use crate::plan::{validate_ratio, Placement, PlacementCounts, PlacementPlanner};
use crate::raster::{ChannelLayout, Raster};
use crate::shadow::apply_shadow;

/// In-memory result of a synthesis run.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Finished RGB canvas.
    pub canvas: Raster,
    /// Per-pass counts used by the planner.
    pub counts: PlacementCounts,
    /// Every composite, in the order it was applied.
    pub placements: Vec<Placement>,
}

/// Renders ratio images with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Scale a loaded sprite and apply the shadow stage if enabled.
    pub fn prepare_sprite(&self, sprite: &Raster) -> SynthResult<Raster> {
        let scaled = scale_sprite(sprite, self.config.scale, self.config.resize_filter)?;
        if self.config.shadow {
            apply_shadow(&scaled)
        } else {
            Ok(scaled)
        }
    }

    /// Render an image for `ratio` from already-loaded sprites.
    ///
    /// Sprites are given at their source size; scaling and the shadow stage
    /// happen here. No file is touched. The configuration is validated first,
    /// so settings built in code get the same checks as a loaded file.
    #[tracing::instrument(level = "debug", skip(self, sprite_a, sprite_b, rng))]
    pub fn render<R: Rng + ?Sized>(
        &self,
        ratio: f64,
        sprite_a: &Raster,
        sprite_b: &Raster,
        rng: &mut R,
    ) -> SynthResult<Rendered> {
        self.config.validate()?;
        let ratio = validate_ratio(ratio)?;

        let sprite_a = self.prepare_sprite(sprite_a)?;
        let sprite_b = self.prepare_sprite(sprite_b)?;
        debug!(
            a = ?sprite_a.dimensions(),
            b = ?sprite_b.dimensions(),
            "scaled sprites"
        );

        let mut canvas = Raster::filled(
            self.config.canvas_width,
            self.config.canvas_height,
            ChannelLayout::Rgb,
            &self.config.background,
        )?;

        let planner = PlacementPlanner::new(self.config.passes);
        let (counts, placements) =
            planner.plan_and_run(&mut canvas, &sprite_a, &sprite_b, ratio, rng)?;

        Ok(Rendered {
            canvas,
            counts,
            placements,
        })
    }

    /// Load, render and write one image using the given random source.
    #[tracing::instrument(skip(self, rng))]
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        ratio: f64,
        output: &Path,
        sprite_a: &Path,
        sprite_b: &Path,
        rng: &mut R,
    ) -> SynthResult<()> {
        self.config.validate()?;
        let ratio = validate_ratio(ratio)?;
        let a = load_sprite(sprite_a)?;
        let b = load_sprite(sprite_b)?;

        let rendered = self.render(ratio, &a, &b, rng)?;
        write_jpeg(&rendered.canvas, self.config.jpeg_quality, output)?;

        info!(
            output = %output.display(),
            placements = rendered.placements.len(),
            class_a = rendered.counts.class_a,
            class_b = rendered.counts.class_b,
            "wrote image"
        );
        Ok(())
    }

    /// Load, render and write one image with an OS-seeded random source.
    pub fn generate(
        &self,
        ratio: f64,
        output: &Path,
        sprite_a: &Path,
        sprite_b: &Path,
    ) -> SynthResult<()> {
        let mut rng = StdRng::from_os_rng();
        self.generate_with_rng(ratio, output, sprite_a, sprite_b, &mut rng)
    }
}

/// Write an image whose class A share approximates `ratio`, using the
/// default configuration.
///
/// # Errors
///
/// * `SynthError::Config` for settings that fail validation
/// * `SynthError::InvalidRatio` for NaN or out-of-range ratios
/// * `SynthError::AssetLoad` / `SynthError::MissingAlpha` for bad sprites
/// * `SynthError::Dimension` when sprites scale to nothing or do not fit
/// * `SynthError::EncodeWrite` when the output cannot be written
pub fn generate(ratio: f64, output: &Path, sprite_a: &Path, sprite_b: &Path) -> SynthResult<()> {
    Synthesizer::default().generate(ratio, output, sprite_a, sprite_b)
}
