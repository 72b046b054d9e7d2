//! Owned single-channel f32 image in row-major layout.
//!
//! Grayscale derived from a colour photograph keeps 8-bit intensity units
//! (0..=255) so that edge thresholds read the same as on the source pixels.
use super::traits::{dense_row, dense_row_mut, ImageView, ImageViewMut};

#[derive(Clone, Debug)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    /// `w * h` samples, row by row.
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Zero-filled `w × h` image.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.w + x] = v;
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        dense_row(&self.data, self.w, y)
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        dense_row_mut(&mut self.data, self.w, y)
    }
}
