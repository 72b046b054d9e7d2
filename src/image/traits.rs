//! Row access shared by the pipeline's rasters.
//!
//! Every raster here is dense and row-major, so a row is always one
//! contiguous slice of `width()` pixels.

/// Read-only, row-addressable raster.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> Self::Pixel {
        self.row(y)[x]
    }

    /// Rows from top to bottom.
    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let image: &'a I = self.image;
        let row = image.row(self.y);
        self.y += 1;
        Some(row)
    }
}

/// Row slice `y` of a dense row-major buffer `w` pixels wide.
#[inline]
pub(crate) fn dense_row<P>(data: &[P], w: usize, y: usize) -> &[P] {
    &data[y * w..(y + 1) * w]
}

#[inline]
pub(crate) fn dense_row_mut<P>(data: &mut [P], w: usize, y: usize) -> &mut [P] {
    &mut data[y * w..(y + 1) * w]
}
