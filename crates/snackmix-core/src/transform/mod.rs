//! Geometric transforms applied to sprites before compositing.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Origin is the top-left corner, y grows downward
//! - Pixel centers sit at `(x + 0.5, y + 0.5)`

mod rotation;

pub use rotation::{compute_rotated_bounds, quarter_turns, rotate_sprite};
