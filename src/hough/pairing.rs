//! Pairing detected lines into pole candidates.
//!
//! Two boundary lines of one pole converge above the frame, so every ordered
//! pair of distinct lines is kept only when its intersection has y < 0.
//! Candidates are deduplicated by rounded intersection-y, sorted by
//! intersection-y descending, and passed through a uniqueness filter: when
//! two pairs share a line, the wider pair (larger separation at the top of
//! the frame) is marked illegal and dropped.
//!
//! The rough variant pads each intercept away from the pole so the
//! subsequent crop keeps a margin around the candidate.
use crate::hough::lines::{intersection, CartesianLine, DisplayTag};
use crate::image::GrayBuffer;
use log::debug;
use nalgebra::Point2;
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Intercept padding applied by the rough variant.
pub const ROUGH_PAD: f64 = 100.0;

/// Two boundary lines and their intersection above the frame.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LinePair {
    pub l1: CartesianLine,
    pub l2: CartesianLine,
    pub intersection: Point2<f64>,
}

/// Select pole-candidate pairs from the detected lines.
pub fn find_pairs(lines: &[CartesianLine]) -> Vec<LinePair> {
    select_pairs(lines, 0.0)
}

/// Like [`find_pairs`] but widens each pair by [`ROUGH_PAD`] for cropping.
pub fn find_rough_pairs(lines: &[CartesianLine]) -> Vec<LinePair> {
    select_pairs(lines, ROUGH_PAD)
}

fn select_pairs(lines: &[CartesianLine], pad: f64) -> Vec<LinePair> {
    let mut candidates = Vec::new();
    for li in lines {
        for lj in lines {
            if li.rounded_eq(lj) {
                continue;
            }
            let p = intersection(li, lj);
            // Boundary lines of a pole converge above the frame.
            if p.y >= 0.0 {
                continue;
            }
            candidates.push(LinePair {
                l1: pad_intercept(li, pad, true),
                l2: pad_intercept(lj, pad, false),
                intersection: p,
            });
        }
    }

    let mut seen: HashSet<i64> = HashSet::new();
    candidates.retain(|p| seen.insert(p.intersection.y.round() as i64));
    candidates.sort_by(|p, q| {
        q.intersection
            .y
            .partial_cmp(&p.intersection.y)
            .unwrap_or(Ordering::Equal)
    });
    let retained = unique_filter(candidates);
    debug!("pairing: pad={pad} retained={}", retained.len());
    retained
}

/// Shift the intercept away from the pole. The two lines of a pair are
/// padded in opposite directions relative to their slope signs.
fn pad_intercept(line: &CartesianLine, pad: f64, first: bool) -> CartesianLine {
    let sign = if (line.a < 0.0) == first { 1.0 } else { -1.0 };
    CartesianLine {
        b: line.b + sign * pad,
        ..*line
    }
}

/// Distance between the two line abscissae at the top of the frame.
fn separation_at_top(pair: &LinePair) -> f64 {
    (pair.l1.x_at(0.0) - pair.l2.x_at(0.0)).abs()
}

fn shares_line(p: &LinePair, q: &LinePair) -> bool {
    p.l1.rounded_eq(&q.l1)
        || p.l1.rounded_eq(&q.l2)
        || p.l2.rounded_eq(&q.l1)
        || p.l2.rounded_eq(&q.l2)
}

/// Of any two pairs sharing a line, mark the wider one illegal; a pair
/// marked illegal in any comparison is dropped no matter how many other
/// comparisons it survived.
fn unique_filter(pairs: Vec<LinePair>) -> Vec<LinePair> {
    let separations: Vec<f64> = pairs.iter().map(separation_at_top).collect();
    let mut illegal = vec![false; pairs.len()];
    for i in 0..pairs.len() {
        for j in 0..pairs.len() {
            if i == j || !shares_line(&pairs[i], &pairs[j]) {
                continue;
            }
            if separations[i] < separations[j] {
                illegal[j] = true;
            } else {
                illegal[i] = true;
            }
        }
    }
    pairs
        .into_iter()
        .zip(illegal)
        .filter_map(|(p, bad)| (!bad).then_some(p))
        .collect()
}

/// Zero every pixel that does not lie between the lines of at least one
/// pair at its row (inclusive on both edges).
pub fn crop_to_inside_pairs(image: &GrayBuffer, pairs: &[LinePair]) -> GrayBuffer {
    let mut out = GrayBuffer::new(image.w, image.h);
    for y in 0..image.h {
        let yf = y as f64;
        let bounds: Vec<(f64, f64)> = pairs
            .iter()
            .map(|p| {
                let xa = p.l1.x_at(yf);
                let xb = p.l2.x_at(yf);
                (xa.min(xb), xa.max(xb))
            })
            .collect();
        for x in 0..image.w {
            let xf = x as f64;
            if bounds.iter().any(|&(lo, hi)| xf >= lo && xf <= hi) {
                out.set(x, y, image.get(x, y));
            }
        }
    }
    out
}

/// Assign a random RGB tag to each retained pair, both lines sharing one
/// color. Purely cosmetic; runs after selection so it can never influence
/// which pairs are retained.
pub fn assign_display_tags<R: Rng>(pairs: &mut [LinePair], rng: &mut R) {
    for pair in pairs {
        let tag = DisplayTag([
            rng.gen_range(0..250),
            rng.gen_range(0..250),
            rng.gen_range(0..250),
        ]);
        pair.l1.tag = tag;
        pair.l2.tag = tag;
    }
}
