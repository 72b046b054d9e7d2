//! Non-maximum suppression on gradient magnitude with direction alignment.
//!
//! Each pixel is compared with its two neighbours along the gradient
//! direction, quantized to 0°, 45°, 90° or 135°. A pixel survives when it is
//! strictly greater than the neighbour before it and not smaller than the one
//! after it; on a two-pixel plateau (a step edge between pixels) exactly the
//! first pixel is kept.
//!
//! The outermost 1-pixel frame is always suppressed.
use crate::edges::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_56;

/// Return a copy of `grad.mag` with every non-maximal pixel (and every pixel
/// below `mag_thresh`) set to zero.
pub fn suppress_non_maxima(grad: &Grad, mag_thresh: f32) -> ImageF32 {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let dst = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < mag_thresh || mag <= 0.0 {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // (before, after) along the gradient direction
            let (before, after) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > before && mag >= after {
                dst[x] = mag;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::grad::sobel_gradients;

    #[test]
    fn step_edge_keeps_single_column() {
        let mut img = ImageF32::new(12, 8);
        for y in 0..8 {
            for x in 6..12 {
                img.set(x, y, 50.0);
            }
        }
        let nms = suppress_non_maxima(&sobel_gradients(&img), 1.0);
        for y in 1..7 {
            let kept: Vec<usize> = (0..12).filter(|&x| nms.get(x, y) > 0.0).collect();
            assert_eq!(kept, vec![5], "row {y}");
        }
    }

    #[test]
    fn flat_image_has_no_maxima() {
        let img = ImageF32::new(10, 10);
        let nms = suppress_non_maxima(&sobel_gradients(&img), 0.0);
        assert!(nms.data.iter().all(|&v| v == 0.0));
    }
}
