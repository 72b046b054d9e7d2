//! Dense per-cell storage over the `(cols + 1) × (rows + 1)` lattice.
use serde::Serialize;

/// Column-major 2-D array indexed by `(col, row)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellGrid<T> {
    cols: usize,
    rows: usize,
    data: Vec<T>,
}

impl<T: Clone> CellGrid<T> {
    pub fn filled(cols: usize, rows: usize, value: T) -> Self {
        Self {
            cols,
            rows,
            data: vec![value; cols * rows],
        }
    }
}

impl<T> CellGrid<T> {
    pub fn from_fn(cols: usize, rows: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(cols * rows);
        for c in 0..cols {
            for r in 0..rows {
                data.push(f(c, r));
            }
        }
        Self { cols, rows, data }
    }

    /// `(cols, rows)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn idx(&self, col: usize, row: usize) -> usize {
        debug_assert!(col < self.cols && row < self.rows);
        col * self.rows + row
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> &T {
        &self.data[self.idx(col, row)]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        let i = self.idx(col, row);
        self.data[i] = value;
    }

    /// Cells in `(col, row)` order, column-major.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let rows = self.rows;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| ((i / rows, i % rows), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> CellGrid<U> {
        CellGrid {
            cols: self.cols,
            rows: self.rows,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// The four 4-connected neighbours (left, right, up, down); `None` marks
    /// positions outside the lattice.
    pub fn neighbours4(&self, col: usize, row: usize) -> [Option<&T>; 4] {
        let left = col.checked_sub(1).map(|c| self.get(c, row));
        let right = (col + 1 < self.cols).then(|| self.get(col + 1, row));
        let up = row.checked_sub(1).map(|r| self.get(col, r));
        let down = (row + 1 < self.rows).then(|| self.get(col, row + 1));
        [left, right, up, down]
    }
}
