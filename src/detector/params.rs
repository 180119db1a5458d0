//! Parameter types configuring the detector stages.
//!
//! Defaults reproduce the reference composition: both hysteresis thresholds
//! derived from the Otsu selector, a 0.4 vote fraction over a 21×21
//! suppression window, and a shape filter tuned to tall narrow regions.
use crate::error::PipelineError;
use crate::hough::HoughParams;
use crate::regions::ShapeFilterParams;
use serde::{Deserialize, Serialize};

/// Hysteresis thresholds for edge linking. `None` derives the value from the
/// Otsu threshold of the smoothed image.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HysteresisParams {
    pub high: Option<u8>,
    pub low: Option<u8>,
}

/// Detector-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoleParams {
    pub hysteresis: HysteresisParams,
    pub hough: HoughParams,
    pub shape: ShapeFilterParams,
    /// Upper clamp applied to convolution outputs.
    pub clamp_bound: f32,
}

impl Default for PoleParams {
    fn default() -> Self {
        Self {
            hysteresis: HysteresisParams::default(),
            hough: HoughParams::default(),
            shape: ShapeFilterParams::default(),
            clamp_bound: 255.0,
        }
    }
}

impl PoleParams {
    /// Fail fast on malformed configuration, identifying the parameter.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.clamp_bound > 0.0) {
            return Err(PipelineError::InvalidClampBound {
                bound: self.clamp_bound,
            });
        }
        self.hough.validate()?;
        self.shape.validate()?;
        Ok(())
    }
}
