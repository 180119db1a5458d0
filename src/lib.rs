#![doc = include_str!("../README.md")]

pub mod detector;
pub mod diagnostics;
pub mod edges;
pub mod error;
pub mod hough;
pub mod image;
pub mod kernel;
pub mod regions;
pub mod smooth;
pub mod threshold;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::{PoleDetector, PoleParams, PoleReport};
pub use crate::diagnostics::PipelineTrace;
pub use crate::error::PipelineError;

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pole_detector::prelude::*;
///
/// let gray = GrayBuffer::new(64, 64);
/// let detector = PoleDetector::new(PoleParams::default()).unwrap();
/// let report = detector.process(&gray).unwrap();
/// println!("pairs={}", report.pairs.len());
/// ```
pub mod prelude {
    pub use crate::image::GrayBuffer;
    pub use crate::{PoleDetector, PoleParams, PoleReport};
}
