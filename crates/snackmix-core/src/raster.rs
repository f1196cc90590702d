//! Tagged raster buffers.
//!
//! Every image that moves through the pipeline is a [`Raster`]: width, height,
//! an explicit [`ChannelLayout`] and a row-major 8-bit pixel buffer. Sprites
//! are `Rgba`, the canvas is `Rgb`. Operations check the layout they need
//! instead of guessing it from the buffer length.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Channel layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Three color channels, no transparency.
    Rgb,
    /// Three color channels followed by a straight (non-premultiplied) alpha.
    Rgba,
}

impl ChannelLayout {
    /// Number of bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    /// Returns true if the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ChannelLayout::Rgba)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLayout::Rgb => f.write_str("RGB"),
            ChannelLayout::Rgba => f.write_str("RGBA"),
        }
    }
}

/// An 8-bit raster with an explicit channel layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from raw pixel data.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::InvalidBuffer` if `pixels.len()` is not
    /// `width * height * layout.channels()`.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        pixels: Vec<u8>,
    ) -> SynthResult<Self> {
        let expected = buffer_len(width, height, layout);
        if pixels.len() != expected {
            return Err(SynthError::InvalidBuffer {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            pixels,
        })
    }

    /// Create a raster where every pixel is `color`.
    ///
    /// `color` must have exactly `layout.channels()` entries.
    pub fn filled(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        color: &[u8],
    ) -> SynthResult<Self> {
        if color.len() != layout.channels() {
            return Err(SynthError::InvalidBuffer {
                expected: layout.channels(),
                actual: color.len(),
            });
        }
        let mut pixels = Vec::with_capacity(buffer_len(width, height, layout));
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(color);
        }
        Ok(Self {
            width,
            height,
            layout,
            pixels,
        })
    }

    /// Create an RGBA raster from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgba,
            pixels: img.into_raw(),
        }
    }

    /// Create an RGB raster from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbaImage`. Fails for non-RGBA rasters.
    pub fn to_rgba_image(&self) -> SynthResult<image::RgbaImage> {
        self.require_layout(ChannelLayout::Rgba)?;
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            SynthError::InvalidBuffer {
                expected: buffer_len(self.width, self.height, self.layout),
                actual: self.pixels.len(),
            },
        )
    }

    /// Convert to an `image::RgbImage`. Fails for non-RGB rasters.
    pub fn to_rgb_image(&self) -> SynthResult<image::RgbImage> {
        self.require_layout(ChannelLayout::Rgb)?;
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            SynthError::InvalidBuffer {
                expected: buffer_len(self.width, self.height, self.layout),
                actual: self.pixels.len(),
            },
        )
    }

    /// Fail with `LayoutMismatch` unless this raster has `expected` layout.
    pub fn require_layout(&self, expected: ChannelLayout) -> SynthResult<()> {
        if self.layout != expected {
            return Err(SynthError::LayoutMismatch {
                expected,
                actual: self.layout,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Raw pixel data, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw pixel data, row-major. The length cannot change.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the raster and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of pixel (x, y).
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.layout.channels()
    }

    /// Channels of pixel (x, y). Panics if out of range.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let idx = self.index(x, y);
        &self.pixels[idx..idx + self.layout.channels()]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if this is an empty raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn buffer_len(width: u32, height: u32, layout: ChannelLayout) -> usize {
    width as usize * height as usize * layout.channels()
}
