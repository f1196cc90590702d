//! JPEG encoding of the finished canvas.
//!
//! Uses the `image` crate's JPEG encoder. The canvas is lossy-encoded, so
//! the written file only approximates the in-memory pixels.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use crate::error::{SynthError, SynthResult};
use crate::raster::{ChannelLayout, Raster};

/// Encode an RGB canvas to JPEG bytes.
///
/// # Arguments
///
/// * `canvas` - RGB raster to encode
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Errors
///
/// Returns `SynthError::LayoutMismatch` for non-RGB rasters and
/// `SynthError::EncodeWrite` for empty rasters or encoder failures.
///
/// # Example
///
/// ```ignore
/// use snackmix_core::encode::encode_jpeg;
///
/// let jpeg = encode_jpeg(&canvas, 95).unwrap();
///
/// // Verify JPEG magic bytes
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(canvas: &Raster, quality: u8) -> SynthResult<Vec<u8>> {
    canvas.require_layout(ChannelLayout::Rgb)?;

    if canvas.is_empty() {
        return Err(SynthError::EncodeWrite(format!(
            "cannot encode empty canvas {}x{}",
            canvas.width(),
            canvas.height()
        )));
    }

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(
            canvas.pixels(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| SynthError::EncodeWrite(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode `canvas` as JPEG and write it to `path`, replacing any existing file.
pub fn write_jpeg(canvas: &Raster, quality: u8, path: &Path) -> SynthResult<()> {
    let bytes = encode_jpeg(canvas, quality)?;
    std::fs::write(path, bytes)
        .map_err(|e| SynthError::EncodeWrite(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_canvas(width: u32, height: u32) -> Raster {
        Raster::filled(width, height, ChannelLayout::Rgb, &[128, 128, 128]).unwrap()
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode_jpeg(&gray_canvas(100, 100), 90).unwrap();

        // Check JPEG magic bytes (SOI marker)
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);

        // Check JPEG ends with EOI marker
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let canvas = gray_canvas(10, 10);

        // Quality 0 should be clamped to 1
        assert!(encode_jpeg(&canvas, 0).is_ok());

        // Quality 255 should be clamped to 100
        assert!(encode_jpeg(&canvas, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_rejects_rgba() {
        let sprite = Raster::filled(4, 4, ChannelLayout::Rgba, &[0, 0, 0, 255]).unwrap();
        assert!(matches!(
            encode_jpeg(&sprite, 90),
            Err(SynthError::LayoutMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg_empty_canvas() {
        let canvas = Raster::new(0, 100, ChannelLayout::Rgb, vec![]).unwrap();
        assert!(matches!(
            encode_jpeg(&canvas, 90),
            Err(SynthError::EncodeWrite(_))
        ));
    }

    #[test]
    fn test_write_jpeg_decodes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let canvas = Raster::filled(64, 48, ChannelLayout::Rgb, &[255, 255, 255]).unwrap();

        write_jpeg(&canvas, 95, &path).unwrap();

        let decoded = image::open(&path).unwrap().into_rgb8();
        assert_eq!(decoded.dimensions(), (64, 48));
        // White survives lossy encoding closely
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&v| v >= 250)));
    }

    #[test]
    fn test_write_jpeg_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.jpg");

        let result = write_jpeg(&gray_canvas(8, 8), 90, &path);
        assert!(matches!(result, Err(SynthError::EncodeWrite(_))));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
