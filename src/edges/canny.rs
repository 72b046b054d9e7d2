//! Canny edge detection: Sobel gradients, non-maximum suppression and
//! hysteresis thresholding into a binary edge map.
use super::grad::sobel_gradients;
use super::nms::suppress_non_maxima;
use crate::image::traits::dense_row;
use crate::image::{ImageF32, ImageView};
use serde::Deserialize;

/// Hysteresis thresholds in gradient-magnitude units (8-bit Sobel scale).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low: f32,
    pub high: f32,
}

impl CannyParams {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

impl Default for CannyParams {
    fn default() -> Self {
        Self::new(50.0, 150.0)
    }
}

/// Binary edge raster; edge pixels hold 255, everything else 0.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    /// Number of edge pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Number of edge pixels in every column `x`.
    pub fn column_sums(&self) -> Vec<u32> {
        let mut sums = vec![0u32; self.w];
        for row in self.rows() {
            for (s, &v) in sums.iter_mut().zip(row) {
                if v != 0 {
                    *s += 1;
                }
            }
        }
        sums
    }

    /// Number of edge pixels in every row `y`.
    pub fn row_sums(&self) -> Vec<u32> {
        self.rows()
            .map(|row| row.iter().filter(|&&v| v != 0).count() as u32)
            .collect()
    }
}

impl ImageView for EdgeMap {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn row(&self, y: usize) -> &[u8] {
        dense_row(&self.data, self.w, y)
    }
}

/// Run Canny on an 8-bit-scaled grayscale image.
///
/// Pixels at or above `high` seed edges; pixels at or above `low` join an
/// edge when 8-connected to a seed through other such pixels.
pub fn canny(gray: &ImageF32, params: &CannyParams) -> EdgeMap {
    let w = gray.w;
    let h = gray.h;
    let mut data = vec![0u8; w * h];
    if w == 0 || h == 0 {
        return EdgeMap { w, h, data };
    }

    let grad = sobel_gradients(gray);
    let thin = suppress_non_maxima(&grad, params.low);
    hysteresis(&thin, params, &mut data);

    EdgeMap { w, h, data }
}

/// Mark strong pixels of `thin` and grow them through 8-connected weak ones.
fn hysteresis(thin: &ImageF32, params: &CannyParams, out: &mut [u8]) {
    let w = thin.w;
    let h = thin.h;
    let is_weak = |x: usize, y: usize| {
        let m = thin.get(x, y);
        m > 0.0 && m >= params.low
    };

    let mut stack: Vec<(usize, usize)> = Vec::new();
    for y in 0..h {
        for (x, &m) in thin.row(y).iter().enumerate() {
            if m > 0.0 && m >= params.high {
                out[y * w + x] = 255;
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let i = ny * w + nx;
                if out[i] == 0 && is_weak(nx, ny) {
                    out[i] = 255;
                    stack.push((nx, ny));
                }
            }
        }
    }
}
