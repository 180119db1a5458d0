//! Global thresholding: Otsu's method and binarization.
//!
//! The selector scans all 256 candidate thresholds while incrementally
//! maintaining the foreground count and foreground weighted sum, maximizing
//! the between-class variance `n_fg * n_bg * (mean_bg - mean_fg)^2`. Class
//! means use truncating integer division. The first candidate that strictly
//! improves the running maximum wins, so ties keep the earlier threshold.
use crate::image::{GrayBuffer, ImageView};
use log::debug;

/// 256-bin intensity histogram of a grayscale buffer.
pub fn histogram(image: &GrayBuffer) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for row in image.rows() {
        for &px in row {
            hist[px as usize] += 1;
        }
    }
    hist
}

/// Sum of `intensity * count` over all bins.
fn weighted_sum(hist: &[u32; 256]) -> u64 {
    hist.iter()
        .enumerate()
        .map(|(i, &n)| i as u64 * u64::from(n))
        .sum()
}

/// Select a global threshold by Otsu's method. Returns 0 for an empty image.
pub fn otsu_threshold(image: &GrayBuffer) -> u8 {
    let pixel_count = (image.w * image.h) as u64;
    let hist = histogram(image);
    let mean_total = weighted_sum(&hist);

    let mut fg_count = 0u64;
    let mut fg_sum = 0u64;
    let mut max_var = 0.0f32;
    let mut q = 0u8;

    for candidate in 0..hist.len() {
        fg_count += u64::from(hist[candidate]);
        if fg_count == 0 {
            continue;
        }
        let bg_count = pixel_count - fg_count;
        if bg_count == 0 {
            break;
        }
        fg_sum += candidate as u64 * u64::from(hist[candidate]);
        let mean_fg = (fg_sum / fg_count) as f32;
        let mean_bg = ((mean_total - fg_sum) / bg_count) as f32;
        let var_between =
            (mean_bg - mean_fg) * (mean_bg - mean_fg) * fg_count as f32 * bg_count as f32;
        if var_between > max_var {
            max_var = var_between;
            q = candidate as u8;
        }
    }
    debug!("otsu: selected q={q}");
    q
}

/// Map every pixel strictly above `q` to 255, the rest to 0.
pub fn binarize(image: &GrayBuffer, q: u8) -> GrayBuffer {
    let mut out = GrayBuffer::new(image.w, image.h);
    for y in 0..image.h {
        for x in 0..image.w {
            if image.get(x, y) > q {
                out.set(x, y, 255);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bimodal_image() -> GrayBuffer {
        // Two clusters spread around 50 and 200.
        let (w, h) = (64usize, 64usize);
        let mut data = Vec::with_capacity(w * h);
        for i in 0..w * h {
            let spread = (i % 5) as u8 * 2; // 0, 2, 4, 6, 8
            if i % 2 == 0 {
                data.push(46 + spread);
            } else {
                data.push(196 + spread);
            }
        }
        GrayBuffer::from_raw(w, h, data).unwrap()
    }

    #[test]
    fn bimodal_threshold_lies_between_peaks() {
        let img = bimodal_image();
        let q = otsu_threshold(&img);
        assert!(q > 50 && q < 200, "q={q} not between the peaks");
    }

    #[test]
    fn threshold_is_deterministic() {
        let img = bimodal_image();
        assert_eq!(otsu_threshold(&img), otsu_threshold(&img));
    }

    #[test]
    fn empty_image_yields_zero() {
        let img = GrayBuffer::new(0, 0);
        assert_eq!(otsu_threshold(&img), 0);
    }

    #[test]
    fn uniform_image_yields_zero() {
        let mut img = GrayBuffer::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                img.set(x, y, 77);
            }
        }
        // Background count reaches zero at the single occupied bin.
        assert_eq!(otsu_threshold(&img), 0);
    }

    #[test]
    fn binarize_is_strictly_greater() {
        let mut img = GrayBuffer::new(3, 1);
        img.set(0, 0, 99);
        img.set(1, 0, 100);
        img.set(2, 0, 101);
        let bin = binarize(&img, 100);
        assert_eq!(bin.get(0, 0), 0);
        assert_eq!(bin.get(1, 0), 0);
        assert_eq!(bin.get(2, 0), 255);
    }
}
