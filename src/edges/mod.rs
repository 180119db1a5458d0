//! Gradient-based edge extraction.
//!
//! The extractor walks a fixed chain: directional gradients and magnitude
//! summation (`grad`), direction-guided non-maximum suppression (`nms`), then
//! double thresholding and hysteresis linking (`linking`). A standalone
//! four-kernel magnitude detector (`grad::edge_magnitude`) serves the
//! region-extraction phase, which needs edges but no linking.

pub mod grad;
pub mod linking;
pub mod nms;

pub use grad::{edge_magnitude, gradient_map, GradientMap};
pub use linking::{double_threshold, hysteresis};
pub use nms::suppress;
