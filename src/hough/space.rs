//! Line voting in (angle, offset) parameter space.
//!
//! Every edge pixel votes across a restricted angular window tuned to
//! near-vertical lines: 180 steps sweeping half a turn starting at 0.85π.
//! The accumulator is suppressed in place (a cell dies when any neighbor in
//! a 21×21 window holds strictly more votes), thresholded at a fraction of
//! the global maximum, and surviving cells become polar lines, deduplicated
//! by offset in angle-major order.
use crate::error::PipelineError;
use crate::image::{GrayBuffer, ImageView};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Start of the angular sweep.
const ANGLE_OFFSET: f64 = 0.85 * std::f64::consts::PI;
/// Extent of the angular sweep.
const ANGLE_SWEEP: f64 = 0.5 * std::f64::consts::PI;

/// A line in polar form, as voted by the accumulator.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PolarLine {
    /// Angle in radians, inside the sweep window.
    pub theta: f64,
    /// Offset index into the accumulator (already shifted by the Hough height).
    pub rho: f64,
    /// Vote count of the winning cell.
    pub votes: u32,
}

/// Voting parameters. The angular window itself is fixed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoughParams {
    /// Number of discrete angles across the sweep.
    pub angle_steps: usize,
    /// Fraction of the vote maximum used as the extraction threshold.
    pub vote_fraction: f32,
    /// Side length of the square suppression window (odd).
    pub suppress_window: usize,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            angle_steps: 180,
            vote_fraction: 0.4,
            suppress_window: 21,
        }
    }
}

impl HoughParams {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.angle_steps == 0 {
            return Err(PipelineError::InvalidParameter {
                stage: "hough",
                name: "angle_steps",
                value: self.angle_steps as f64,
            });
        }
        if !(self.vote_fraction > 0.0 && self.vote_fraction <= 1.0) {
            return Err(PipelineError::InvalidParameter {
                stage: "hough",
                name: "vote_fraction",
                value: f64::from(self.vote_fraction),
            });
        }
        if self.suppress_window == 0 || self.suppress_window % 2 == 0 {
            return Err(PipelineError::InvalidParameter {
                stage: "hough",
                name: "suppress_window",
                value: self.suppress_window as f64,
            });
        }
        Ok(())
    }
}

/// Extraction result with the vote statistics used downstream for reporting.
#[derive(Clone, Debug)]
pub struct HoughLines {
    pub lines: Vec<PolarLine>,
    pub max_votes: u32,
    pub vote_threshold: u32,
}

/// Vote, suppress, threshold and extract polar lines from a binary edge map.
pub fn find_lines(edges: &GrayBuffer, params: &HoughParams) -> HoughLines {
    let empty = HoughLines {
        lines: Vec::new(),
        max_votes: 0,
        vote_threshold: 0,
    };
    let (w, h) = (edges.w, edges.h);
    if w == 0 || h == 0 {
        return empty;
    }

    let steps = params.angle_steps;
    let rho_bins = 2 * h;
    let hough_height = (std::f64::consts::SQRT_2 * w.max(h) as f64 / 2.0).round() as i64;
    let cx = (w / 2) as f64;
    let cy = (h / 2) as f64;
    let theta_step = ANGLE_SWEEP / steps as f64;

    let trig: Vec<(f64, f64)> = (0..steps)
        .map(|t| (t as f64 * theta_step + ANGLE_OFFSET).sin_cos())
        .collect();

    let mut acc = vec![0u32; steps * rho_bins];
    for y in 0..h {
        let row = edges.row(y);
        for (x, &px) in row.iter().enumerate() {
            if px != 255 {
                continue;
            }
            for (t, &(sin_t, cos_t)) in trig.iter().enumerate() {
                let r = ((x as f64 - cx) * cos_t + (y as f64 - cy) * sin_t).round() as i64
                    + hough_height;
                if r < 0 || r >= rho_bins as i64 {
                    continue;
                }
                acc[t * rho_bins + r as usize] += 1;
            }
        }
    }

    let max_votes = acc.iter().copied().max().unwrap_or(0);
    if max_votes == 0 {
        debug!("hough: no votes, returning no lines");
        return empty;
    }
    let vote_threshold = (max_votes as f32 * params.vote_fraction) as u32;

    suppress_in_place(&mut acc, steps, rho_bins, params.suppress_window);

    let mut lines = Vec::new();
    let mut seen_rho: HashSet<usize> = HashSet::new();
    for t in 0..steps {
        for r in 0..rho_bins {
            let votes = acc[t * rho_bins + r];
            if votes < vote_threshold {
                continue;
            }
            if !seen_rho.insert(r) {
                continue;
            }
            lines.push(PolarLine {
                theta: t as f64 * theta_step + ANGLE_OFFSET,
                rho: r as f64,
                votes,
            });
        }
    }
    debug!(
        "hough: max_votes={max_votes} threshold={vote_threshold} lines={}",
        lines.len()
    );
    HoughLines {
        lines,
        max_votes,
        vote_threshold,
    }
}

/// Zero every cell dominated by a strictly larger neighbor in the window.
/// Runs in place in angle-major order, so a cell zeroed early no longer
/// suppresses cells visited later.
fn suppress_in_place(acc: &mut [u32], steps: usize, rho_bins: usize, window: usize) {
    let half = window / 2;
    if steps <= 2 * half || rho_bins <= 2 * half {
        return;
    }
    for t in half..steps - half {
        for r in half..rho_bins - half {
            let center = acc[t * rho_bins + r];
            if center == 0 {
                continue;
            }
            'window: for nt in t - half..=t + half {
                for nr in r - half..=r + half {
                    if acc[nt * rho_bins + nr] > center {
                        acc[t * rho_bins + r] = 0;
                        break 'window;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_line_image(w: usize, h: usize, col: usize) -> GrayBuffer {
        let mut img = GrayBuffer::new(w, h);
        for y in 0..h {
            img.set(col, y, 255);
        }
        img
    }

    #[test]
    fn empty_edge_map_yields_no_lines() {
        let img = GrayBuffer::new(32, 32);
        let out = find_lines(&img, &HoughParams::default());
        assert!(out.lines.is_empty());
        assert_eq!(out.max_votes, 0);
    }

    #[test]
    fn vertical_line_collects_full_column_votes() {
        let img = vertical_line_image(64, 64, 20);
        let out = find_lines(&img, &HoughParams::default());
        // The sweep passes through pi, where every pixel of the column votes
        // the same offset.
        assert_eq!(out.max_votes, 64);
        assert!(!out.lines.is_empty());
    }

    #[test]
    fn extracted_offsets_are_unique() {
        let img = vertical_line_image(64, 64, 20);
        let out = find_lines(&img, &HoughParams::default());
        let mut rhos: Vec<i64> = out.lines.iter().map(|l| l.rho as i64).collect();
        rhos.sort_unstable();
        rhos.dedup();
        assert_eq!(rhos.len(), out.lines.len());
    }

    #[test]
    fn params_are_validated() {
        let bad = HoughParams {
            suppress_window: 20,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = HoughParams {
            vote_fraction: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
