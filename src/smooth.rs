//! Edge-preserving bilateral smoothing.
//!
//! A weighted average over a 5×5 window where each neighbor's weight is the
//! product of a fixed Gaussian spatial kernel and a range weight
//! `exp(-d^2 / (2 * sigma^2))` on the intensity difference `d`. Neighbors
//! close in brightness dominate the average, so edges survive where a plain
//! blur would wash them out.
//!
//! The 2-pixel border where the window leaves the image is cropped from the
//! output, not replicated.
use crate::error::PipelineError;
use crate::image::GrayBuffer;
use log::debug;

/// Sigma of the intensity range weight.
const RANGE_SIGMA: f32 = 80.0;
/// Window radius; the output shrinks by this margin on all four sides.
const RADIUS: usize = 2;

const SPATIAL_KERNEL: [[f32; 5]; 5] = [
    [1.0, 4.0, 7.0, 4.0, 1.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [7.0, 26.0, 41.0, 26.0, 7.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [1.0, 4.0, 7.0, 4.0, 1.0],
];

/// Smooth `input`, producing a buffer cropped by 2 px per side. The companion
/// `mask` is cropped by the same margin to stay pixel-aligned.
pub fn smooth(
    input: &GrayBuffer,
    mask: Option<&mut GrayBuffer>,
) -> Result<GrayBuffer, PipelineError> {
    let size = 2 * RADIUS + 1;
    if input.w < size || input.h < size {
        return Err(PipelineError::ImageTooSmall {
            stage: "smoothing",
            width: input.w,
            height: input.h,
            kernel: size,
        });
    }

    // Range weights for every possible intensity difference.
    let mut range_kernel = [0.0f32; 256];
    for (d, w) in range_kernel.iter_mut().enumerate() {
        let val = (d * d) as f32 / (2.0 * RANGE_SIGMA * RANGE_SIGMA);
        *w = (-val).exp();
    }

    let mut out = GrayBuffer::new(input.w - 2 * RADIUS, input.h - 2 * RADIUS);
    for y in RADIUS..input.h - RADIUS {
        for x in RADIUS..input.w - RADIUS {
            let target = i32::from(input.get(x, y));
            let mut result = 0.0f32;
            let mut weight_sum = 0.0f32;
            for dy in 0..size {
                for dx in 0..size {
                    let cur = i32::from(input.get(x + dx - RADIUS, y + dy - RADIUS));
                    let weight =
                        SPATIAL_KERNEL[dy][dx] * range_kernel[(cur - target).unsigned_abs() as usize];
                    result += cur as f32 * weight;
                    weight_sum += weight;
                }
            }
            let value = (result / weight_sum).round().clamp(0.0, 255.0);
            out.set(x - RADIUS, y - RADIUS, value as u8);
        }
    }
    if let Some(m) = mask {
        let cropped = m.crop(RADIUS);
        *m = cropped;
    }
    debug!(
        "smooth: {}x{} -> {}x{} sigma={RANGE_SIGMA}",
        input.w, input.h, out.w, out.h
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_stays_constant() {
        let mut img = GrayBuffer::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, 120);
            }
        }
        let out = smooth(&img, None).unwrap();
        assert_eq!((out.w, out.h), (4, 4));
        for y in 0..out.h {
            for x in 0..out.w {
                assert_eq!(out.get(x, y), 120);
            }
        }
    }

    #[test]
    fn intensity_step_is_preserved() {
        // Left half 0, right half 200; the range weight keeps the two sides
        // from bleeding into each other.
        let mut img = GrayBuffer::new(12, 8);
        for y in 0..8 {
            for x in 0..12 {
                img.set(x, y, if x < 6 { 0 } else { 200 });
            }
        }
        let out = smooth(&img, None).unwrap();
        for y in 0..out.h {
            assert!(out.get(0, y) < 10, "dark side drifted: {}", out.get(0, y));
            assert!(
                out.get(out.w - 1, y) > 190,
                "bright side drifted: {}",
                out.get(out.w - 1, y)
            );
        }
    }

    #[test]
    fn mask_is_cropped_in_lockstep() {
        let img = GrayBuffer::new(9, 9);
        let mut mask = GrayBuffer::new(9, 9);
        smooth(&img, Some(&mut mask)).unwrap();
        assert_eq!((mask.w, mask.h), (5, 5));
    }

    #[test]
    fn too_small_image_errors() {
        let img = GrayBuffer::new(4, 4);
        assert!(matches!(
            smooth(&img, None),
            Err(PipelineError::ImageTooSmall { .. })
        ));
    }
}
