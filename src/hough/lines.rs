//! Cartesian line form and the geometry shared by pairing and cropping.
//!
//! A detected line is stored as `x = (y - b) / a`. The slope can get very
//! large for near-vertical lines, so every division guards its denominator
//! with a signed epsilon: degenerate geometry produces large finite values
//! with the correct sign instead of NaN or infinity. Line equality is
//! integer-truncation based on (a, b) and is the only comparison used
//! anywhere.
use crate::hough::space::PolarLine;
use nalgebra::Point2;
use serde::Serialize;

const GEOM_EPS: f64 = 1e-9;

/// Clamp a denominator away from zero, keeping its sign.
#[inline]
fn guard_denominator(d: f64) -> f64 {
    if d.abs() < GEOM_EPS {
        GEOM_EPS.copysign(d)
    } else {
        d
    }
}

/// Cosmetic RGB tag used when rendering lines; never part of selection.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DisplayTag(pub [u8; 3]);

impl Default for DisplayTag {
    fn default() -> Self {
        // Lime, the rendering default before tags are assigned.
        Self([0, 255, 0])
    }
}

/// A line in slope/intercept form `x = (y - b) / a`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CartesianLine {
    pub a: f64,
    pub b: f64,
    pub tag: DisplayTag,
}

impl CartesianLine {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            a,
            b,
            tag: DisplayTag::default(),
        }
    }

    /// Rounding-based equality: integer-truncated slope and intercept match.
    #[inline]
    pub fn rounded_eq(&self, other: &CartesianLine) -> bool {
        self.a as i64 == other.a as i64 && self.b as i64 == other.b as i64
    }

    /// Abscissa of the line at a given row.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        -((self.b - y) / guard_denominator(self.a))
    }
}

/// Convert a polar line to cartesian form by sampling the inverse polar
/// mapping at the top and bottom of the frame.
pub fn to_cartesian(line: &PolarLine, width: usize, height: usize) -> CartesianLine {
    let w = width as f64;
    let h = height as f64;
    let hough_height = std::f64::consts::SQRT_2 * w.max(h) / 2.0;
    let cx = w / 2.0;
    let cy = h / 2.0;
    let (sin_t, cos_t) = line.theta.sin_cos();
    let cos_t = guard_denominator(cos_t);

    let y1 = 0.0;
    let y2 = h;
    let x1 = (line.rho - hough_height - (y1 - cy) * sin_t) / cos_t + cx;
    let x2 = (line.rho - hough_height - (y2 - cy) * sin_t) / cos_t + cx;

    let a = (y2 - y1) / guard_denominator(x2 - x1);
    let b = y1 - x1 * a;
    CartesianLine::new(a, b)
}

/// Intersection of two lines. Near-parallel slopes resolve to a large finite
/// point whose sign matches the limit behavior.
pub fn intersection(l1: &CartesianLine, l2: &CartesianLine) -> Point2<f64> {
    let x = (l2.b - l1.b) / guard_denominator(l1.a - l2.a);
    let y = l1.a * x + l1.b;
    Point2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_equality_ignores_fractions() {
        let a = CartesianLine::new(2.3, -10.7);
        let b = CartesianLine::new(2.9, -10.1);
        assert!(a.rounded_eq(&b));
        let c = CartesianLine::new(3.1, -10.1);
        assert!(!a.rounded_eq(&c));
    }

    #[test]
    fn intersection_of_crossing_lines() {
        let l1 = CartesianLine::new(2.0, -10.0);
        let l2 = CartesianLine::new(-2.0, -30.0);
        let p = intersection(&l1, &l2);
        assert!((p.x - (-5.0)).abs() < 1e-12);
        assert!((p.y - (-20.0)).abs() < 1e-12);
    }

    #[test]
    fn parallel_lines_stay_finite() {
        let l1 = CartesianLine::new(3.0, 5.0);
        let l2 = CartesianLine::new(3.0, -40.0);
        let p = intersection(&l1, &l2);
        assert!(p.x.is_finite() && p.y.is_finite());
        // The intercept gap is negative, so the limit point lies far below.
        assert!(p.y < 0.0);
    }

    #[test]
    fn x_at_handles_near_zero_slope() {
        let l = CartesianLine::new(0.0, 7.0);
        assert!(l.x_at(3.0).is_finite());
    }

    #[test]
    fn vertical_polar_line_converts_to_steep_slope() {
        // Angle pi: the inverse mapping samples the same abscissa at both
        // frame edges, so the slope is clamped to a very large value.
        let polar = PolarLine {
            theta: std::f64::consts::PI,
            rho: 57.0,
            votes: 64,
        };
        let line = to_cartesian(&polar, 64, 64);
        assert!(line.a.abs() > 1e6);
        let x = line.x_at(32.0);
        assert!((x - 20.25).abs() < 0.5, "x_at(32)={x}");
    }
}
