//! Pole detector: parameters and the two-phase pipeline.
//!
//! - [`params`] – configuration types used by the detector and the CLI.
//! - `pipeline` – the [`PoleDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::{HysteresisParams, PoleParams};
pub use pipeline::{PoleDetector, PoleReport};
