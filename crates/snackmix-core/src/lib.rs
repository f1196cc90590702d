//! Snackmix Core - ratio image synthesis
//!
//! Renders a JPEG in which many rotated copies of two sprite classes are
//! scattered over a solid canvas, with class A making up roughly a requested
//! share of the copies. The image is meant to be judged by eye, e.g. in a
//! "what is the mix ratio?" quiz.
//!
//! The pipeline is split into stages:
//! - [`decode`]: sprite loading and scaling
//! - [`shadow`]: optional soft-edge stage
//! - [`transform`]: rotation with bounding-box expansion
//! - [`composite`]: alpha-over blending onto the canvas
//! - [`plan`]: placement counts, random angles and offsets
//! - [`encode`]: JPEG output
//! - [`synth`]: the orchestrator tying them together
//!
//! [`quiz`] builds the multiple-choice answers a ratio is drawn from.

pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod plan;
pub mod quiz;
pub mod raster;
pub mod shadow;
pub mod synth;
pub mod transform;

pub use composite::composite_over;
pub use config::{ConfigError, SynthConfig};
pub use error::{SynthError, SynthResult};
pub use plan::{Placement, PlacementCounts, PlacementPlanner, SpriteClass};
pub use quiz::{Difficulty, Quiz, QuizError};
pub use raster::{ChannelLayout, Raster};
pub use synth::{generate, Rendered, Synthesizer};
pub use transform::{compute_rotated_bounds, rotate_sprite};
