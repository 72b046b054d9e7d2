//! Core value types shared by the pipeline stages.
use crate::error::CalibrationError;
use serde::{Deserialize, Serialize};

/// Half-open pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Intersection with `[0, w) × [0, h)`.
    pub fn clip(&self, w: usize, h: usize) -> Rect {
        let x0 = self.x0.min(w);
        let y0 = self.y0.min(h);
        Rect {
            x0,
            y0,
            x1: self.x1.min(w).max(x0),
            y1: self.y1.min(h).max(y0),
        }
    }
}

/// One of the two grid axes.
///
/// `Columns` are delimited by vertical lines and indexed along x; `Rows` by
/// horizontal lines along y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    /// Image extent along this axis.
    pub fn extent(self, width: usize, height: usize) -> usize {
        match self {
            Axis::Columns => width,
            Axis::Rows => height,
        }
    }

    pub fn other(self) -> Axis {
        match self {
            Axis::Columns => Axis::Rows,
            Axis::Rows => Axis::Columns,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Columns => f.write_str("columns"),
            Axis::Rows => f.write_str("rows"),
        }
    }
}

/// Linear map `index → pixel = m·index + b` along one axis.
///
/// Constructed through [`AxisModel::normalized`], which guarantees `m > 0`
/// and `0 ≤ b < m`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisModel {
    /// Pitch in pixels.
    pub m: f64,
    /// Offset of the first grid line in pixels.
    pub b: f64,
    /// Cell count `⌊(extent − b) / m⌋`; valid indices are `0..=count`.
    pub count: usize,
}

/// Pixel tolerance for cell boundaries, see [`AxisModel::span`].
pub const SPAN_SNAP: f64 = 1e-6;

impl AxisModel {
    /// Normalize `b` into `[0, m)` and derive the cell count for `extent`.
    /// Returns `None` unless `m` is finite and positive.
    pub fn normalized(m: f64, b: f64, extent: usize) -> Option<Self> {
        if !m.is_finite() || m <= 0.0 || !b.is_finite() {
            return None;
        }
        let mut b = b.rem_euclid(m);
        if b >= m {
            b = 0.0;
        }
        let count = ((extent as f64 - b) / m).floor().max(0.0) as usize;
        Some(Self { m, b, count })
    }

    /// Pixel position of grid line `index`.
    #[inline]
    pub fn position(&self, index: usize) -> f64 {
        self.m * index as f64 + self.b
    }

    /// Pixel span `[start, end)` of cell `index`.
    ///
    /// Boundaries less than [`SPAN_SNAP`] below an integer land on it, so
    /// regression noise cannot shift a cell edge by a whole pixel.
    pub fn span(&self, index: usize) -> (usize, usize) {
        let start = (self.position(index) + SPAN_SNAP).floor().max(0.0);
        let end = (start + self.m + SPAN_SNAP).floor();
        (start as usize, end as usize)
    }

    /// Number of cells including the trailing partial one (`count + 1`).
    pub fn cells(&self) -> usize {
        self.count + 1
    }
}

/// Column and row models; fully determines the cell lattice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridModel {
    pub cols: AxisModel,
    pub rows: AxisModel,
}

impl GridModel {
    pub fn axis(&self, axis: Axis) -> &AxisModel {
        match axis {
            Axis::Columns => &self.cols,
            Axis::Rows => &self.rows,
        }
    }

    /// `(cols + 1, rows + 1)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.cols.cells(), self.rows.cells())
    }

    /// Bounding box of cell `(col, row)`, unclipped.
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        let (x0, x1) = self.cols.span(col);
        let (y0, y1) = self.rows.span(row);
        Rect { x0, y0, x1, y1 }
    }
}

/// Material state of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellLabel {
    Metal,
    Void,
    Unknown,
}

impl CellLabel {
    pub const ALL: [CellLabel; 3] = [CellLabel::Metal, CellLabel::Void, CellLabel::Unknown];
}

/// Classification thresholds with `low < high`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ThresholdPair {
    low: f32,
    high: f32,
}

impl ThresholdPair {
    pub fn new(low: f32, high: f32) -> Result<Self, CalibrationError> {
        if low.is_finite() && high.is_finite() && low < high {
            Ok(Self { low, high })
        } else {
            Err(CalibrationError::AmbiguousThresholds { low, high })
        }
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    /// Same high threshold with the low one lowered by `margin`.
    pub fn lowered(&self, margin: f32) -> ThresholdPair {
        ThresholdPair {
            low: self.low - margin.max(0.0),
            high: self.high,
        }
    }

    /// Initial three-state assignment for one brightness value.
    pub fn label(&self, brightness: f32) -> CellLabel {
        if brightness <= self.low {
            CellLabel::Void
        } else if brightness >= self.high {
            CellLabel::Metal
        } else {
            CellLabel::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_model_normalizes_offset() {
        let a = AxisModel::normalized(40.0, -3.0, 200).unwrap();
        assert!((a.b - 37.0).abs() < 1e-9);
        assert_eq!(a.count, 4);
        let b = AxisModel::normalized(40.0, 95.0, 200).unwrap();
        assert!((b.b - 15.0).abs() < 1e-9);
        assert_eq!(b.count, 4);
        assert!(AxisModel::normalized(0.0, 1.0, 10).is_none());
        assert!(AxisModel::normalized(-4.0, 1.0, 10).is_none());
    }

    #[test]
    fn cell_rect_follows_models() {
        let grid = GridModel {
            cols: AxisModel::normalized(10.5, 2.0, 100).unwrap(),
            rows: AxisModel::normalized(8.0, 1.0, 50).unwrap(),
        };
        let r = grid.cell_rect(2, 3);
        assert_eq!(r, Rect::new(23, 25, 33, 33));
        assert_eq!(grid.dims(), (10, 7));
    }

    #[test]
    fn spans_ignore_solver_noise() {
        let noisy = AxisModel::normalized(39.999_999_999_8, 19.000_000_000_5, 210).unwrap();
        let exact = AxisModel::normalized(40.0, 19.0, 210).unwrap();
        for i in 0..noisy.cells() {
            assert_eq!(noisy.span(i), exact.span(i), "cell {i}");
        }
        assert_eq!(noisy.span(4), (179, 219));

        let fractional = AxisModel::normalized(10.5, 2.0, 100).unwrap();
        assert_eq!(fractional.span(1), (12, 22));
    }

    #[test]
    fn thresholds_require_order() {
        assert!(ThresholdPair::new(10.0, 20.0).is_ok());
        assert!(matches!(
            ThresholdPair::new(20.0, 20.0),
            Err(CalibrationError::AmbiguousThresholds { .. })
        ));
        let t = ThresholdPair::new(10.0, 20.0).unwrap();
        assert_eq!(t.label(10.0), CellLabel::Void);
        assert_eq!(t.label(15.0), CellLabel::Unknown);
        assert_eq!(t.label(20.0), CellLabel::Metal);
        assert_eq!(t.lowered(9.0).low(), 1.0);
    }
}
