//! Output raster and debug overlays.
//!
//! [`render_labels`] is the product of a run: one pixel per cell. The
//! overlays are for inspection only and paint onto a copy of the deskewed
//! image.
use crate::classify::LabelMap;
use crate::image::{ImageRgb8, Rgb};
use crate::types::{CellLabel, GridModel, Rect};

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const ORANGE: Rgb = [255, 165, 0];
pub const GRID_LINE: Rgb = [255, 0, 0];

/// Output colour of a label.
pub fn label_colour(label: CellLabel) -> Rgb {
    match label {
        CellLabel::Void => WHITE,
        CellLabel::Metal => BLUE,
        CellLabel::Unknown => ORANGE,
    }
}

/// `(cols + 1) × (rows + 1)` raster, pixel `(c, r)` coloured by the label of
/// cell `(c, r)`.
pub fn render_labels(labels: &LabelMap) -> ImageRgb8 {
    let (cols, rows) = labels.dims();
    ImageRgb8::from_fn(cols, rows, |c, r| label_colour(*labels.get(c, r)))
}

/// Grid lines of `grid` drawn one pixel wide over a copy of `img`.
pub fn render_grid_overlay(img: &ImageRgb8, grid: &GridModel) -> ImageRgb8 {
    let mut out = img.clone();
    for i in 0..=grid.cols.count {
        let x = grid.cols.span(i).0;
        out.fill_rect(Rect::new(x, 0, x + 1, img.h), GRID_LINE);
    }
    for i in 0..=grid.rows.count {
        let y = grid.rows.span(i).0;
        out.fill_rect(Rect::new(0, y, img.w, y + 1), GRID_LINE);
    }
    out
}

/// Every cell's box painted with its label (Void black instead of white so
/// the lattice stays visible against the background).
pub fn render_label_overlay(img: &ImageRgb8, grid: &GridModel, labels: &LabelMap) -> ImageRgb8 {
    let mut out = img.clone();
    for ((c, r), &label) in labels.iter() {
        let colour = match label {
            CellLabel::Void => BLACK,
            other => label_colour(other),
        };
        out.fill_rect(grid.cell_rect(c, r), colour);
    }
    out
}
