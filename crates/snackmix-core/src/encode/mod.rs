//! Canvas encoding.
//!
//! This module provides functionality for:
//! - Encoding the RGB canvas to JPEG with configurable quality
//! - Writing the encoded bytes to the output location
//!
//! # Examples
//!
//! ```ignore
//! use snackmix_core::encode::encode_jpeg;
//!
//! let jpeg_bytes = encode_jpeg(&canvas, 95).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, write_jpeg};
