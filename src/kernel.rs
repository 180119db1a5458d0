//! Square convolution kernels and the convolution engine.
//!
//! Convolution computes every output pixel whose full neighborhood is
//! in-bounds and crops the result by the kernel radius on all four sides, so
//! each iteration shrinks the image by `2 * radius` in both dimensions. An
//! optional companion mask is cropped in lockstep to keep the two buffers
//! pixel-aligned for callers that carry one; the pipeline itself never reads
//! the mask back.
use crate::error::PipelineError;
use crate::image::{GrayBuffer, ImageView};

/// Square, odd-sized matrix of f32 weights.
#[derive(Clone, Debug)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from a square array literal. Fails on even or zero size.
    pub fn from_rows<const N: usize>(rows: [[f32; N]; N]) -> Result<Self, PipelineError> {
        if N == 0 || N % 2 == 0 {
            return Err(PipelineError::InvalidKernelSize { size: N });
        }
        let mut weights = Vec::with_capacity(N * N);
        for row in rows {
            weights.extend_from_slice(&row);
        }
        Ok(Self { size: N, weights })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    #[inline]
    fn at(&self, ky: usize, kx: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }
}

/// Upper bound applied to convolution output before byte rounding.
#[derive(Clone, Copy, Debug)]
pub struct ClampBound(f32);

impl ClampBound {
    /// The bound must be positive.
    pub fn new(bound: f32) -> Result<Self, PipelineError> {
        if !(bound > 0.0) {
            return Err(PipelineError::InvalidClampBound { bound });
        }
        Ok(Self(bound))
    }

    #[inline]
    pub fn apply(&self, v: f32) -> f32 {
        v.clamp(0.0, self.0)
    }
}

impl Default for ClampBound {
    fn default() -> Self {
        Self(255.0)
    }
}

/// Apply `kernel` to `input` `iterations` times, cropping by the kernel
/// radius each pass. The companion `mask`, when present, is cropped by the
/// same margin per pass.
pub fn convolve(
    input: &GrayBuffer,
    kernel: &Kernel,
    iterations: usize,
    clamp: ClampBound,
    mut mask: Option<&mut GrayBuffer>,
) -> Result<GrayBuffer, PipelineError> {
    if iterations == 0 {
        return Err(PipelineError::InvalidParameter {
            stage: "convolution",
            name: "iterations",
            value: 0.0,
        });
    }
    let radius = kernel.radius();
    let size = kernel.size();

    let mut current = input.clone();
    for _ in 0..iterations {
        if current.w < size || current.h < size {
            return Err(PipelineError::ImageTooSmall {
                stage: "convolution",
                width: current.w,
                height: current.h,
                kernel: size,
            });
        }
        let (out_w, out_h) = (current.w - 2 * radius, current.h - 2 * radius);
        let mut out = GrayBuffer::new(out_w, out_h);
        for y in 0..out_h {
            for x in 0..out_w {
                let mut total = 0.0f32;
                for ky in 0..size {
                    let row = current.row(y + ky);
                    for kx in 0..size {
                        total += kernel.at(ky, kx) * f32::from(row[x + kx]);
                    }
                }
                out.set(x, y, clamp.apply(total).round() as u8);
            }
        }
        current = out;
        if let Some(m) = mask.as_mut() {
            let cropped = m.crop(radius);
            **m = cropped;
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_3x3() -> Kernel {
        Kernel::from_rows([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]).unwrap()
    }

    #[test]
    fn even_kernel_is_rejected() {
        let err = Kernel::from_rows([[1.0, 0.0], [0.0, 1.0]]).unwrap_err();
        assert_eq!(err, PipelineError::InvalidKernelSize { size: 2 });
    }

    #[test]
    fn clamp_bound_must_be_positive() {
        assert!(ClampBound::new(0.0).is_err());
        assert!(ClampBound::new(-1.0).is_err());
        assert!(ClampBound::new(255.0).is_ok());
    }

    #[test]
    fn identity_kernel_crops_but_preserves_values() {
        let mut img = GrayBuffer::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                img.set(x, y, (10 * x + y) as u8);
            }
        }
        let out = convolve(&img, &identity_3x3(), 1, ClampBound::default(), None).unwrap();
        assert_eq!((out.w, out.h), (3, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(out.get(x, y), img.get(x + 1, y + 1));
            }
        }
    }

    #[test]
    fn repeated_convolution_shrinks_per_iteration() {
        let img = GrayBuffer::new(7, 7);
        let out = convolve(&img, &identity_3x3(), 2, ClampBound::default(), None).unwrap();
        assert_eq!((out.w, out.h), (3, 3));
    }

    #[test]
    fn mask_is_cropped_in_lockstep() {
        let img = GrayBuffer::new(7, 7);
        let mut mask = GrayBuffer::new(7, 7);
        convolve(
            &img,
            &identity_3x3(),
            2,
            ClampBound::default(),
            Some(&mut mask),
        )
        .unwrap();
        assert_eq!((mask.w, mask.h), (3, 3));
    }

    #[test]
    fn output_is_clamped_and_rounded() {
        let mut img = GrayBuffer::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                img.set(x, y, 200);
            }
        }
        let sum =
            Kernel::from_rows([[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]).unwrap();
        let out = convolve(&img, &sum, 1, ClampBound::default(), None).unwrap();
        assert_eq!(out.get(0, 0), 255);
    }

    #[test]
    fn too_small_image_errors() {
        let img = GrayBuffer::new(2, 2);
        let err = convolve(&img, &identity_3x3(), 1, ClampBound::default(), None).unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooSmall { .. }));
    }
}
