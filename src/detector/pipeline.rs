//! Detector pipeline driving pole detection end-to-end.
//!
//! Two phases run over the same input:
//!
//! 1. **Line detection**: smooth, select an Otsu threshold, extract linked
//!    edges, vote lines in Hough space, convert them to cartesian form and
//!    select the pairs bounding pole candidates (plain pairs for reporting,
//!    padded rough pairs for cropping).
//! 2. **Region extraction**: re-smooth, re-threshold, take the four-kernel
//!    edge magnitude, crop it to the inside of the rough pairs, label the
//!    remaining foreground and keep tall narrow components.
//!
//! Both phases shrink the working buffer by 3 px per side (2 from smoothing,
//! 1 from the 3×3 convolutions), so the line geometry of phase one stays
//! valid on the buffers of phase two.
//!
//! Typical usage:
//! ```no_run
//! use pole_detector::{PoleDetector, PoleParams};
//! use pole_detector::image::GrayBuffer;
//!
//! # fn example(gray: GrayBuffer) {
//! let detector = PoleDetector::new(PoleParams::default()).unwrap();
//! let report = detector.process(&gray).unwrap();
//! println!("candidates: {}", report.components.len());
//! # }
//! ```
use super::params::PoleParams;
use crate::diagnostics::{
    EdgeReport, HoughReport, InputDescriptor, PairingReport, PipelineTrace, RegionReport,
    ThresholdReport, TimingBreakdown,
};
use crate::edges::{double_threshold, edge_magnitude, gradient_map, hysteresis, suppress};
use crate::error::PipelineError;
use crate::hough::{
    crop_to_inside_pairs, find_lines, find_pairs, find_rough_pairs, to_cartesian, CartesianLine,
    LinePair,
};
use crate::image::GrayBuffer;
use crate::kernel::ClampBound;
use crate::regions::{filter_by_shape, label, Component};
use crate::smooth::smooth;
use crate::threshold::{binarize, otsu_threshold};
use log::debug;
use std::time::Instant;

/// Everything one detector run produces.
#[derive(Clone, Debug)]
pub struct PoleReport {
    /// Retained line pairs, one per pole candidate.
    pub pairs: Vec<LinePair>,
    /// Components surviving the shape filter.
    pub components: Vec<Component>,
    /// Label map of the analyzed region (0 = background).
    pub labels: GrayBuffer,
    /// Binary image holding only surviving components' pixels.
    pub filtered: GrayBuffer,
    /// The companion mask, cropped in lockstep with the working image.
    pub mask: Option<GrayBuffer>,
    /// Stage counts and timings.
    pub trace: PipelineTrace,
}

/// Pole detector orchestrating the two-phase pipeline.
pub struct PoleDetector {
    params: PoleParams,
    clamp: ClampBound,
}

impl PoleDetector {
    /// Create a detector, validating the supplied parameters.
    pub fn new(params: PoleParams) -> Result<Self, PipelineError> {
        params.validate()?;
        let clamp = ClampBound::new(params.clamp_bound)?;
        Ok(Self { params, clamp })
    }

    /// Run the detector on a grayscale image.
    pub fn process(&self, gray: &GrayBuffer) -> Result<PoleReport, PipelineError> {
        self.process_with_mask(gray, None)
    }

    /// Run the detector, carrying an auxiliary mask that is cropped in
    /// lockstep with the working image so both stay pixel-aligned.
    pub fn process_with_mask(
        &self,
        gray: &GrayBuffer,
        mask: Option<GrayBuffer>,
    ) -> Result<PoleReport, PipelineError> {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();
        let input = InputDescriptor {
            width: gray.w,
            height: gray.h,
            has_mask: mask.is_some(),
        };
        debug!("detector: start {}x{}", gray.w, gray.h);
        let mut mask = mask;

        // Phase one: line detection.
        let stage_start = Instant::now();
        let smoothed = smooth(gray, mask.as_mut())?;
        timing.push("smooth", ms_since(stage_start));

        let stage_start = Instant::now();
        let line_otsu = otsu_threshold(&smoothed);
        let high = self.params.hysteresis.high.unwrap_or(line_otsu);
        let low = self.params.hysteresis.low.unwrap_or(line_otsu);
        timing.push("threshold", ms_since(stage_start));

        let stage_start = Instant::now();
        let grad = gradient_map(&smoothed, self.clamp, mask.as_mut())?;
        let suppressed = suppress(&grad);
        let (strong, combined) = double_threshold(&suppressed, high, low);
        let edge_map = hysteresis(strong, &combined);
        timing.push("edges", ms_since(stage_start));
        let edge_report = EdgeReport {
            width: edge_map.w,
            height: edge_map.h,
            edge_pixels: edge_map.count_value(255),
        };

        let stage_start = Instant::now();
        let voted = find_lines(&edge_map, &self.params.hough);
        let cartesian: Vec<CartesianLine> = voted
            .lines
            .iter()
            .map(|l| to_cartesian(l, edge_map.w, edge_map.h))
            .collect();
        timing.push("hough", ms_since(stage_start));

        let stage_start = Instant::now();
        let pairs = find_pairs(&cartesian);
        let rough_pairs = find_rough_pairs(&cartesian);
        timing.push("pairing", ms_since(stage_start));
        debug!(
            "detector: {} lines -> {} pairs ({} rough)",
            voted.lines.len(),
            pairs.len(),
            rough_pairs.len()
        );

        // Phase two: region extraction between the rough pairs.
        let stage_start = Instant::now();
        let working = smooth(gray, None)?;
        let region_otsu = otsu_threshold(&working);
        let binary = binarize(&working, region_otsu);
        let edges2 = edge_magnitude(&binary, self.clamp, None)?;
        let cropped = crop_to_inside_pairs(&edges2, &rough_pairs);
        timing.push("region-edges", ms_since(stage_start));

        let stage_start = Instant::now();
        let (labels, components) = label(&cropped)?;
        let (filtered, kept) = filter_by_shape(&labels, &components, &self.params.shape);
        timing.push("regions", ms_since(stage_start));

        timing.total_ms = ms_since(total_start);
        debug!(
            "detector: done components={}/{} total_ms={:.3}",
            kept.len(),
            components.len(),
            timing.total_ms
        );

        let trace = PipelineTrace {
            input,
            thresholds: ThresholdReport {
                line_phase_otsu: line_otsu,
                hysteresis_high: high,
                hysteresis_low: low,
                region_phase_otsu: region_otsu,
            },
            edges: edge_report,
            hough: HoughReport {
                max_votes: voted.max_votes,
                vote_threshold: voted.vote_threshold,
                lines: voted.lines.len(),
            },
            pairing: PairingReport {
                pairs_retained: pairs.len(),
                rough_pairs: rough_pairs.len(),
            },
            regions: RegionReport {
                components_total: components.len(),
                components_kept: kept.len(),
            },
            timing,
        };

        Ok(PoleReport {
            pairs,
            components: kept,
            labels,
            filtered,
            mask,
            trace,
        })
    }
}

#[inline]
fn ms_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
