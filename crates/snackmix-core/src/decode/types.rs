//! Settings shared by the sprite loading stage.

use image::imageops::FilterType as ImageFilter;
use serde::{Deserialize, Serialize};

/// Resampling filter used when sprites are shrunk to their placement size.
///
/// Sprites are only ever downscaled, so the choice mostly affects how soft
/// the alpha fringe looks after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Picks one source pixel; keeps hard edges and aliasing.
    Nearest,
    /// Triangle filter, the config default.
    #[default]
    Bilinear,
    /// Sharper downscale with a little ringing at the sprite outline.
    Lanczos3,
}

impl FilterType {
    /// Map onto `image::imageops` for `scale_sprite`.
    pub fn to_image_filter(self) -> ImageFilter {
        match self {
            Self::Nearest => ImageFilter::Nearest,
            Self::Bilinear => ImageFilter::Triangle,
            Self::Lanczos3 => ImageFilter::Lanczos3,
        }
    }
}
