#![doc = include_str!("../README.md")]

// Pipeline stages, in run order.
pub mod calibrate;
pub mod classify;
pub mod deskew;
pub mod grid;
pub mod pipeline;
pub mod render;

// Shared data model and reporting.
pub mod cells;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Building blocks used by the stages; public for tools and tests.
pub mod angle;
pub mod edges;
pub mod lines;
pub mod solver;

// --- High-level re-exports -------------------------------------------------

pub use crate::pipeline::{CaptureOutput, CaptureParams, GridCapture};
pub use crate::types::{Axis, AxisModel, CellLabel, GridModel, Rect, ThresholdPair};

pub use crate::classify::LabelMap;
pub use crate::diagnostics::CaptureReport;
pub use crate::error::{CalibrationError, CaptureError, GeometryError, NumericError};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use grid_capture::prelude::*;
///
/// # fn main() {
/// let img = ImageRgb8::filled(400, 400, [128, 128, 128]);
/// let params = CaptureParams {
///     explicit_skew_angle_deg: Some(0.0),
///     ..Default::default()
/// };
/// match GridCapture::new(params).process(&img) {
///     Ok(out) => println!("{} unknown cells", out.report.classification.unknown_cells.len()),
///     Err(e) => eprintln!("capture failed: {e}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageRgb8;
    pub use crate::{CaptureError, CaptureParams, CellLabel, GridCapture, GridModel};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::calibrate::{cell_stats, Calibration, CalibrationParams, ThresholdCalibrator};
    pub use crate::classify::{CellClassifier, Classification, ClassifierPass, PassSummary};
    pub use crate::deskew::{Deskewed, Deskewer, DeskewParams};
    pub use crate::grid::{AxisFit, GridDetection, GridDetector, GridParams};
    pub use crate::solver::{Clusterer, KMeans, LeastSquaresSolver, LevenbergMarquardt};
}
