//! Rotation about the image centre with bicubic resampling.
//!
//! Content is mapped by `p' = c + R(angle)(p - c)` where `R` is the usual
//! rotation matrix in image coordinates (x right, y down) and `c` the image
//! centre. Output size equals input size; samples falling outside the source
//! are black. Interior taps near the border replicate the edge pixel.
//!
//! The cubic kernel is the Keys kernel with `a = -0.5` (Catmull-Rom).
use super::rgb::{ImageRgb8, Rgb};

const CUBIC_A: f32 = -0.5;

#[inline]
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn sample_bicubic(img: &ImageRgb8, fx: f32, fy: f32) -> Rgb {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let wx = [
        cubic_weight(1.0 + tx),
        cubic_weight(tx),
        cubic_weight(1.0 - tx),
        cubic_weight(2.0 - tx),
    ];
    let wy = [
        cubic_weight(1.0 + ty),
        cubic_weight(ty),
        cubic_weight(1.0 - ty),
        cubic_weight(2.0 - ty),
    ];
    let max_x = img.w as isize - 1;
    let max_y = img.h as isize - 1;
    let mut acc = [0.0f32; 3];
    for (j, wyj) in wy.iter().enumerate() {
        let sy = (y0 as isize - 1 + j as isize).clamp(0, max_y) as usize;
        for (i, wxi) in wx.iter().enumerate() {
            let sx = (x0 as isize - 1 + i as isize).clamp(0, max_x) as usize;
            let px = img.get(sx, sy);
            let w = wxi * wyj;
            acc[0] += w * px[0] as f32;
            acc[1] += w * px[1] as f32;
            acc[2] += w * px[2] as f32;
        }
    }
    [
        acc[0].round().clamp(0.0, 255.0) as u8,
        acc[1].round().clamp(0.0, 255.0) as u8,
        acc[2].round().clamp(0.0, 255.0) as u8,
    ]
}

/// Rotate `img` by `angle_rad` (see module docs for the sign convention).
pub fn rotate_bicubic(img: &ImageRgb8, angle_rad: f32) -> ImageRgb8 {
    if img.w == 0 || img.h == 0 || angle_rad == 0.0 {
        return img.clone();
    }
    let cx = img.w as f32 * 0.5;
    let cy = img.h as f32 * 0.5;
    // Inverse map: source = c + R(-angle)(dest - c)
    let (s, c) = (-angle_rad).sin_cos();
    let w = img.w as f32;
    let h = img.h as f32;
    ImageRgb8::from_fn(img.w, img.h, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let sx = cx + c * dx - s * dy;
        let sy = cy + s * dx + c * dy;
        if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
            return [0, 0, 0];
        }
        sample_bicubic(img, sx - 0.5, sy - 0.5)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_kernel_interpolates() {
        assert!((cubic_weight(0.0) - 1.0).abs() < 1e-6);
        assert!(cubic_weight(1.0).abs() < 1e-6);
        assert!(cubic_weight(2.0).abs() < 1e-6);
        let sum: f32 = [1.3f32, 0.3, 0.7, 1.7].iter().map(|&t| cubic_weight(t)).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_angle_is_identity() {
        let img = ImageRgb8::from_fn(7, 5, |x, y| [(x * 30) as u8, (y * 40) as u8, 7]);
        assert_eq!(rotate_bicubic(&img, 0.0), img);
    }

    #[test]
    fn quarter_turn_moves_pixels_clockwise_on_screen() {
        // A bright pixel right of centre ends up below centre after +90°.
        let mut img = ImageRgb8::new(9, 9);
        img.set(7, 4, [255, 255, 255]);
        let rot = rotate_bicubic(&img, std::f32::consts::FRAC_PI_2);
        assert!(rot.get(4, 7)[0] > 200, "got {:?}", rot.get(4, 7));
        assert!(rot.get(7, 4)[0] < 50);
    }
}
