//! Sprite decoding with alpha-channel enforcement.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use crate::error::{SynthError, SynthResult};
use crate::raster::Raster;

/// Load a sprite from disk.
///
/// # Errors
///
/// Returns `SynthError::AssetLoad` if the file cannot be read or decoded.
/// Returns `SynthError::MissingAlpha` if the image has no alpha channel.
pub fn load_sprite(path: &Path) -> SynthResult<Raster> {
    let bytes = std::fs::read(path).map_err(|e| SynthError::AssetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_sprite(&bytes, path)
}

/// Decode a sprite from in-memory bytes.
///
/// `origin` is only used to label errors.
///
/// # Returns
///
/// An RGBA `Raster` with straight (non-premultiplied) alpha.
pub fn decode_sprite(bytes: &[u8], origin: &Path) -> SynthResult<Raster> {
    let load_err = |reason: String| SynthError::AssetLoad {
        path: origin.to_path_buf(),
        reason,
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| load_err(e.to_string()))?;

    let img = reader.decode().map_err(|e| load_err(e.to_string()))?;

    if !img.color().has_alpha() {
        return Err(SynthError::MissingAlpha {
            path: origin.to_path_buf(),
        });
    }

    Ok(Raster::from_rgba_image(img.into_rgba8()))
}
