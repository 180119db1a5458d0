//! Directional gradients from two Prewitt-style kernel pairs.
//!
//! Four 3×3 kernels are convolved over the input: a horizontal/vertical pair
//! and its sign-inverted counterpart. Each pair is combined by Euclidean
//! magnitude into a byte map; the two combined maps feed either the summed
//! magnitude used by the suppression/linking chain ([`gradient_map`]) or the
//! Euclidean magnitude used as a standalone edge detector
//! ([`edge_magnitude`]).
//!
//! The direction bucket feeds the second combined magnitude into both
//! arguments of `atan2`, which collapses the bucket range to {0, 1}. This
//! mirrors the reference behavior and is deliberately left as-is.
use crate::error::PipelineError;
use crate::image::{GrayBuffer, ImageF32, ImageView, ImageViewMut};
use crate::kernel::{convolve, ClampBound, Kernel};

type Kernel3 = [[f32; 3]; 3];

const PREWITT_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
const PREWITT_KERNEL_Y: Kernel3 = [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

const PREWITT_KERNEL_X_INV: Kernel3 = [[1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 0.0, -1.0]];
const PREWITT_KERNEL_Y_INV: Kernel3 = [[1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -1.0, -1.0]];

/// Summed gradient magnitude plus a coarse direction bucket per pixel.
#[derive(Clone, Debug)]
pub struct GradientMap {
    /// Magnitude map; one 3×3 convolution smaller than the input per side.
    pub mag: ImageF32,
    /// Direction bucket (0..5) per pixel, row-major.
    pub dir5: Vec<u8>,
}

impl GradientMap {
    #[inline]
    pub fn bucket(&self, x: usize, y: usize) -> u8 {
        self.dir5[self.mag.idx(x, y)]
    }
}

/// Convolve one kernel pair and combine the responses by Euclidean magnitude.
fn combined_magnitude(
    input: &GrayBuffer,
    kernel_x: Kernel3,
    kernel_y: Kernel3,
    clamp: ClampBound,
    mask: Option<&mut GrayBuffer>,
) -> Result<GrayBuffer, PipelineError> {
    let gx = convolve(input, &Kernel::from_rows(kernel_x)?, 1, clamp, mask)?;
    let gy = convolve(input, &Kernel::from_rows(kernel_y)?, 1, clamp, None)?;
    let mut out = GrayBuffer::new(gx.w, gx.h);
    for y in 0..out.h {
        for x in 0..out.w {
            let a = f32::from(gx.get(x, y));
            let b = f32::from(gy.get(x, y));
            let magnitude = (a * a + b * b).sqrt();
            out.set(x, y, clamp.apply(magnitude.round()) as u8);
        }
    }
    Ok(out)
}

/// Build the summed magnitude map and direction buckets for the
/// suppression/linking chain. The companion `mask` is cropped once, in step
/// with the 3×3 convolutions.
pub fn gradient_map(
    input: &GrayBuffer,
    clamp: ClampBound,
    mask: Option<&mut GrayBuffer>,
) -> Result<GradientMap, PipelineError> {
    let major = combined_magnitude(input, PREWITT_KERNEL_X, PREWITT_KERNEL_Y, clamp, mask)?;
    let minor = combined_magnitude(input, PREWITT_KERNEL_X_INV, PREWITT_KERNEL_Y_INV, clamp, None)?;

    let mut mag = ImageF32::new(major.w, major.h);
    let mut dir5 = vec![0u8; major.w * major.h];
    for y in 0..major.h {
        let major_row = major.row(y);
        let minor_row = minor.row(y);
        let out_row = mag.row_mut(y);
        for x in 0..major.w {
            let summed = f32::from(major_row[x]) + f32::from(minor_row[x]);
            out_row[x] = clamp.apply(summed.round());
            let m = f64::from(minor_row[x]);
            let bucket = (m.atan2(m) * (5.0 / std::f64::consts::PI) + 5.0).round() as i64 % 5;
            dir5[y * major.w + x] = bucket as u8;
        }
    }
    Ok(GradientMap { mag, dir5 })
}

/// Standalone four-kernel edge detector: the two combined maps merged by
/// Euclidean magnitude, no suppression or linking. Used on the re-thresholded
/// image in the region-extraction phase.
pub fn edge_magnitude(
    input: &GrayBuffer,
    clamp: ClampBound,
    mask: Option<&mut GrayBuffer>,
) -> Result<GrayBuffer, PipelineError> {
    let major = combined_magnitude(input, PREWITT_KERNEL_X, PREWITT_KERNEL_Y, clamp, mask)?;
    let minor = combined_magnitude(input, PREWITT_KERNEL_X_INV, PREWITT_KERNEL_Y_INV, clamp, None)?;
    let mut out = GrayBuffer::new(major.w, major.h);
    for y in 0..out.h {
        for x in 0..out.w {
            let a = f32::from(major.get(x, y));
            let b = f32::from(minor.get(x, y));
            let magnitude = (a * a + b * b).sqrt();
            out.set(x, y, clamp.apply(magnitude.round()) as u8);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(w: usize, h: usize) -> GrayBuffer {
        let mut img = GrayBuffer::new(w, h);
        for y in 0..h {
            for x in w / 2..w {
                img.set(x, y, 200);
            }
        }
        img
    }

    #[test]
    fn step_edge_produces_strong_magnitude() {
        let img = vertical_step(12, 12);
        let grad = gradient_map(&img, ClampBound::default(), None).unwrap();
        assert_eq!((grad.mag.w, grad.mag.h), (10, 10));
        // Columns adjacent to the step carry the response; flat areas are zero.
        let mid = grad.mag.w / 2;
        assert!(grad.mag.get(mid, 5) > 100.0);
        assert_eq!(grad.mag.get(0, 5), 0.0);
    }

    #[test]
    fn direction_buckets_collapse_to_two_values() {
        let img = vertical_step(12, 12);
        let grad = gradient_map(&img, ClampBound::default(), None).unwrap();
        assert!(grad.dir5.iter().all(|&b| b == 0 || b == 1));
    }

    #[test]
    fn edge_magnitude_matches_dimensions() {
        let img = vertical_step(9, 7);
        let edges = edge_magnitude(&img, ClampBound::default(), None).unwrap();
        assert_eq!((edges.w, edges.h), (7, 5));
    }
}
