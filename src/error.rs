//! Stage-tagged error type shared by the whole pipeline.
//!
//! The pipeline is exception-light: errors exist for malformed configuration
//! and for invariant violations discovered mid-run. There is no retry policy;
//! the first error aborts the run.
use thiserror::Error;

/// Maximum number of simultaneous components one labeling pass may produce.
pub const MAX_COMPONENTS: usize = 255;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Kernels must be square with an odd, positive side length.
    #[error("convolution: kernel size must be odd and positive, got {size}")]
    InvalidKernelSize { size: usize },

    /// The intensity clamp bound must be positive.
    #[error("convolution: clamp bound must be positive, got {bound}")]
    InvalidClampBound { bound: f32 },

    /// The image does not cover a single kernel placement.
    #[error("{stage}: image {width}x{height} is smaller than the {kernel}x{kernel} kernel")]
    ImageTooSmall {
        stage: &'static str,
        width: usize,
        height: usize,
        kernel: usize,
    },

    /// A tunable parameter failed validation; `name` identifies it.
    #[error("{stage}: parameter `{name}` is out of range ({value})")]
    InvalidParameter {
        stage: &'static str,
        name: &'static str,
        value: f64,
    },

    /// The labeling pass ran out of 8-bit labels.
    #[error("labeling: more than {MAX_COMPONENTS} connected components")]
    TooManyComponents,

    /// A raw buffer did not match the declared dimensions.
    #[error("image buffer: {width}x{height} needs {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
