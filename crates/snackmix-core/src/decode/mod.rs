//! Sprite loading and scaling.
//!
//! This module provides functionality for:
//! - Decoding sprite assets (PNG or any format the `image` crate reads)
//! - Rejecting sprites without an alpha channel
//! - Downscaling sprites to a fraction of their linear size
//!
//! Sprites are always returned as RGBA [`Raster`](crate::raster::Raster)s.
//! All operations are synchronous.
//!
//! # Examples
//!
//! ```ignore
//! use snackmix_core::decode::{load_sprite, scale_sprite, FilterType};
//!
//! let sprite = load_sprite("kakinotane.png".as_ref()).unwrap();
//! let small = scale_sprite(&sprite, 0.25, FilterType::Bilinear).unwrap();
//! println!("Scaled to {}x{}", small.width(), small.height());
//! ```

mod resize;
mod sprite;
mod types;

pub use resize::{scale_sprite, scaled_dimensions};
pub use sprite::{decode_sprite, load_sprite};
pub use types::FilterType;
