//! Serializable run reports: per-stage counts and timings.
use serde::{Deserialize, Serialize};

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one detector run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Shape of the input handed to the detector.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub has_mask: bool,
}

/// Thresholds selected or derived during the run.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdReport {
    /// Otsu threshold of the smoothed image in the line phase.
    pub line_phase_otsu: u8,
    pub hysteresis_high: u8,
    pub hysteresis_low: u8,
    /// Otsu threshold of the re-smoothed image in the region phase.
    pub region_phase_otsu: u8,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeReport {
    pub width: usize,
    pub height: usize,
    pub edge_pixels: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughReport {
    pub max_votes: u32,
    pub vote_threshold: u32,
    pub lines: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingReport {
    pub pairs_retained: usize,
    pub rough_pairs: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionReport {
    pub components_total: usize,
    pub components_kept: usize,
}

/// Full diagnostic trace of one detector run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub thresholds: ThresholdReport,
    pub edges: EdgeReport,
    pub hough: HoughReport,
    pub pairing: PairingReport,
    pub regions: RegionReport,
    pub timing: TimingBreakdown,
}
