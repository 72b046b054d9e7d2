//! Owned 8-bit RGB raster, the input/output currency of the capture pipeline.
//!
//! - `to_gray`: luminance-weighted grayscale in 8-bit units for edge work.
//! - `crop`: copy a half-open rectangle, clipped to the image.
//! - `mean_rgb`: per-channel mean over a clipped rectangle (cell statistics).
//! - Rotation lives in [`crate::image::rotate`].
use super::traits::{dense_row, dense_row_mut};
use super::{ImageF32, ImageView, ImageViewMut};
use crate::types::Rect;

pub type Rgb = [u8; 3];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRgb8 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb>,
}

impl ImageRgb8 {
    /// Black image of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, [0, 0, 0])
    }

    pub fn filled(w: usize, h: usize, px: Rgb) -> Self {
        Self {
            w,
            h,
            data: vec![px; w * h],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                data.push(f(x, y));
            }
        }
        Self { w, h, data }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let i = y * self.w + x;
        self.data[i] = px;
    }

    /// Full-image rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    /// Luminance (ITU-R BT.601) in 0..=255.
    pub fn to_gray(&self) -> ImageF32 {
        let mut out = ImageF32::new(self.w, self.h);
        for y in 0..self.h {
            let src = self.row(y);
            let dst = out.row_mut(y);
            for (d, px) in dst.iter_mut().zip(src) {
                *d = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            }
        }
        out
    }

    /// Copy of `rect` clipped to the image.
    pub fn crop(&self, rect: Rect) -> ImageRgb8 {
        let r = rect.clip(self.w, self.h);
        let mut data = Vec::with_capacity(r.area());
        for y in r.y0..r.y1 {
            data.extend_from_slice(&self.row(y)[r.x0..r.x1]);
        }
        ImageRgb8 {
            w: r.width(),
            h: r.height(),
            data,
        }
    }

    /// Per-channel mean over `rect` clipped to the image; `None` when the
    /// clipped rectangle is empty.
    pub fn mean_rgb(&self, rect: Rect) -> Option<[f32; 3]> {
        let r = rect.clip(self.w, self.h);
        if r.area() == 0 {
            return None;
        }
        let mut sums = [0u64; 3];
        for y in r.y0..r.y1 {
            for px in &self.row(y)[r.x0..r.x1] {
                sums[0] += px[0] as u64;
                sums[1] += px[1] as u64;
                sums[2] += px[2] as u64;
            }
        }
        let n = r.area() as f32;
        Some([
            sums[0] as f32 / n,
            sums[1] as f32 / n,
            sums[2] as f32 / n,
        ])
    }

    /// Fill `rect` (clipped) with a solid colour.
    pub fn fill_rect(&mut self, rect: Rect, px: Rgb) {
        let r = rect.clip(self.w, self.h);
        for y in r.y0..r.y1 {
            self.row_mut(y)[r.x0..r.x1].fill(px);
        }
    }
}

impl ImageView for ImageRgb8 {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        dense_row(&self.data, self.w, y)
    }
}

impl ImageViewMut for ImageRgb8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        dense_row_mut(&mut self.data, self.w, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rgb_clips_to_image() {
        let img = ImageRgb8::from_fn(4, 4, |x, _| if x < 2 { [0, 0, 0] } else { [90, 120, 150] });
        let inside = img.mean_rgb(Rect::new(2, 0, 4, 4)).unwrap();
        assert_eq!(inside, [90.0, 120.0, 150.0]);
        // Rectangle hanging off the right edge only averages the visible part.
        let clipped = img.mean_rgb(Rect::new(2, 0, 10, 4)).unwrap();
        assert_eq!(clipped, [90.0, 120.0, 150.0]);
        assert!(img.mean_rgb(Rect::new(4, 0, 8, 4)).is_none());
    }

    #[test]
    fn crop_copies_rows() {
        let img = ImageRgb8::from_fn(5, 3, |x, y| [x as u8, y as u8, 0]);
        let c = img.crop(Rect::new(1, 1, 4, 3));
        assert_eq!((c.w, c.h), (3, 2));
        assert_eq!(c.get(0, 0), [1, 1, 0]);
        assert_eq!(c.get(2, 1), [3, 2, 0]);
    }

    #[test]
    fn gray_of_white_is_255() {
        let img = ImageRgb8::filled(2, 2, [255, 255, 255]);
        let g = img.to_gray();
        assert!((g.get(1, 1) - 255.0).abs() < 1e-3);
    }
}
