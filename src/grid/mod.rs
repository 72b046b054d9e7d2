//! Grid geometry from a deskewed image.
//!
//! - [`pitch`]: pairwise line distances and model-selection clustering.
//! - [`offset`]: incremental periodic regression for `(m, b)`.
//! - [`contrast`]: offset search for an axis without line candidates.
//!
//! [`GridDetector`] runs Canny + Hough on the image, bins candidates by axis
//! and fits each axis. Exactly one axis must carry line candidates; the other
//! is recovered by contrast maximization at the same pitch.

pub mod contrast;
pub mod offset;
pub mod pitch;

pub use contrast::{search_offset, ContrastSearch};
pub use offset::regress_axis;
pub use pitch::{estimate_pitch, pairwise_distances, PitchEstimate};

use crate::edges::{canny, CannyParams, EdgeMap};
use crate::error::GeometryError;
use crate::image::ImageF32;
use crate::lines::{axis_candidates, AxisCandidates, LineParams};
use crate::solver::{Clusterer, LeastSquaresSolver};
use crate::types::{Axis, AxisModel, GridModel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Edge thresholds for line detection.
    pub canny: CannyParams,
    pub lines: LineParams,
    /// Smallest and largest cluster count tried for pitch selection.
    pub k_min: usize,
    pub k_max: usize,
    /// Number of smallest positions in the first regression.
    pub regression_seed_len: usize,
    /// Edge thresholds for the contrast search.
    pub contrast_canny: CannyParams,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            canny: CannyParams::new(50.0, 150.0),
            lines: LineParams::default(),
            k_min: 3,
            k_max: 19,
            regression_seed_len: 5,
            contrast_canny: CannyParams::new(125.0, 250.0),
        }
    }
}

/// How an axis model was obtained.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "method")]
pub enum AxisFit {
    Lines {
        lines: usize,
        distances: usize,
        pitch: PitchEstimate,
    },
    Contrast {
        search: ContrastSearch,
    },
}

/// Output of grid detection.
#[derive(Clone, Debug)]
pub struct GridDetection {
    pub grid: GridModel,
    pub candidates: AxisCandidates,
    pub cols_fit: AxisFit,
    pub rows_fit: AxisFit,
    /// Edge map the line candidates came from.
    pub edges: EdgeMap,
}

pub struct GridDetector<'a, C: ?Sized, S: ?Sized> {
    params: GridParams,
    proximity_threshold_px: f64,
    clusterer: &'a C,
    solver: &'a S,
}

impl<'a, C, S> GridDetector<'a, C, S>
where
    C: Clusterer + ?Sized,
    S: LeastSquaresSolver + ?Sized,
{
    pub fn new(
        params: GridParams,
        proximity_threshold_px: f64,
        clusterer: &'a C,
        solver: &'a S,
    ) -> Self {
        Self {
            params,
            proximity_threshold_px,
            clusterer,
            solver,
        }
    }

    /// Detect the grid on a grayscale image in 8-bit units.
    pub fn detect(&self, gray: &ImageF32) -> Result<GridDetection, GeometryError> {
        let edges = canny(gray, &self.params.canny);
        let candidates = axis_candidates(&edges, &self.params.lines);
        let (vertical, horizontal) = (candidates.vertical.len(), candidates.horizontal.len());
        log::info!(
            "grid: {} edge px, {vertical} vertical / {horizontal} horizontal candidates",
            edges.count()
        );

        let found = match (vertical > 0, horizontal > 0) {
            (false, false) => return Err(GeometryError::GridNotFound),
            (true, true) => {
                return Err(GeometryError::UnsupportedGrid {
                    vertical,
                    horizontal,
                })
            }
            (true, false) => Axis::Columns,
            (false, true) => Axis::Rows,
        };

        let extent = found.extent(gray.w, gray.h);
        let (found_model, found_fit) =
            self.fit_from_lines(found, &candidates.positions(found), extent)?;

        let missing = found.other();
        let (missing_model, missing_fit) = self.fit_from_contrast(missing, found_model.m, gray)?;

        let (grid, cols_fit, rows_fit) = match found {
            Axis::Columns => (
                GridModel {
                    cols: found_model,
                    rows: missing_model,
                },
                found_fit,
                missing_fit,
            ),
            Axis::Rows => (
                GridModel {
                    cols: missing_model,
                    rows: found_model,
                },
                missing_fit,
                found_fit,
            ),
        };
        log::info!(
            "grid: cols m={:.3} b={:.3} n={} | rows m={:.3} b={:.3} n={}",
            grid.cols.m,
            grid.cols.b,
            grid.cols.count,
            grid.rows.m,
            grid.rows.b,
            grid.rows.count
        );

        Ok(GridDetection {
            grid,
            candidates,
            cols_fit,
            rows_fit,
            edges,
        })
    }

    /// Pitch, offset and count of `axis` from its line positions.
    pub fn fit_from_lines(
        &self,
        axis: Axis,
        positions: &[f64],
        extent: usize,
    ) -> Result<(AxisModel, AxisFit), GeometryError> {
        let distances = pairwise_distances(positions, self.proximity_threshold_px);
        let pitch = estimate_pitch(
            self.clusterer,
            &distances,
            self.params.k_min..=self.params.k_max,
            axis,
        )?;
        let model = regress_axis(
            self.solver,
            positions,
            pitch.pitch,
            self.params.regression_seed_len,
            extent,
            axis,
        )?;
        Ok((
            model,
            AxisFit::Lines {
                lines: positions.len(),
                distances: distances.len(),
                pitch,
            },
        ))
    }

    /// Offset of `axis` at a known pitch by contrast maximization.
    pub fn fit_from_contrast(
        &self,
        axis: Axis,
        pitch: f64,
        gray: &ImageF32,
    ) -> Result<(AxisModel, AxisFit), GeometryError> {
        let edges = canny(gray, &self.params.contrast_canny);
        let sums = match axis {
            Axis::Columns => edges.column_sums(),
            Axis::Rows => edges.row_sums(),
        };
        let search = search_offset(&sums, pitch, axis)?;
        let extent = axis.extent(gray.w, gray.h);
        let model = AxisModel::normalized(pitch, search.offset, extent)
            .ok_or(GeometryError::DegeneratePitch { axis, pitch })?;
        Ok((model, AxisFit::Contrast { search }))
    }
}
