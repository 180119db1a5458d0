//! Non-maximum suppression on the summed gradient magnitude.
//!
//! The direction bucket modulo 4 selects one of four neighbor axes; a pixel
//! survives only if its magnitude is strictly greater than both neighbors on
//! that axis. Comparisons read the pre-suppression map so that every survivor
//! dominates its original neighbors; results go to a fresh buffer. All border
//! pixels are zeroed.
use crate::edges::grad::GradientMap;
use crate::image::{ImageF32, ImageView, ImageViewMut};

pub fn suppress(grad: &GradientMap) -> ImageF32 {
    let (w, h) = (grad.mag.w, grad.mag.h);
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let prev = grad.mag.row(y - 1);
        let row = grad.mag.row(y);
        let next = grad.mag.row(y + 1);
        let out_row = out.row_mut(y);
        for x in 1..w - 1 {
            let mag = row[x];
            let (n1, n2) = match grad.bucket(x, y) % 4 {
                0 => (next[x], prev[x]),
                1 => (prev[x + 1], next[x - 1]),
                2 => (row[x + 1], row[x - 1]),
                _ => (prev[x - 1], next[x + 1]),
            };
            if mag > n1 && mag > n2 {
                out_row[x] = mag;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_from(w: usize, h: usize, values: &[f32], buckets: &[u8]) -> GradientMap {
        let mut mag = ImageF32::new(w, h);
        mag.data.copy_from_slice(values);
        GradientMap {
            mag,
            dir5: buckets.to_vec(),
        }
    }

    #[test]
    fn borders_are_zeroed() {
        let grad = map_from(3, 3, &[9.0; 9], &[0; 9]);
        let out = suppress(&grad);
        for y in 0..3 {
            for x in 0..3 {
                if x == 1 && y == 1 {
                    continue;
                }
                assert_eq!(out.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn plateau_is_fully_suppressed() {
        // Equal neighbors along the axis: neither strictly dominates.
        let grad = map_from(3, 3, &[0.0, 5.0, 0.0, 0.0, 5.0, 0.0, 0.0, 5.0, 0.0], &[0; 9]);
        let out = suppress(&grad);
        assert_eq!(out.get(1, 1), 0.0);
    }

    #[test]
    fn survivors_dominate_both_axis_neighbors() {
        let values: Vec<f32> = (0..25).map(|i| ((i * 7) % 13) as f32).collect();
        let buckets: Vec<u8> = (0..25).map(|i| (i % 5) as u8).collect();
        let grad = map_from(5, 5, &values, &buckets);
        let out = suppress(&grad);
        for y in 1..4 {
            for x in 1..4 {
                let v = out.get(x, y);
                if v == 0.0 {
                    continue;
                }
                let (n1, n2) = match grad.bucket(x, y) % 4 {
                    0 => (grad.mag.get(x, y + 1), grad.mag.get(x, y - 1)),
                    1 => (grad.mag.get(x + 1, y - 1), grad.mag.get(x - 1, y + 1)),
                    2 => (grad.mag.get(x + 1, y), grad.mag.get(x - 1, y)),
                    _ => (grad.mag.get(x - 1, y - 1), grad.mag.get(x + 1, y + 1)),
                };
                assert!(v > n1 && v > n2, "survivor at ({x},{y}) does not dominate");
            }
        }
    }
}
