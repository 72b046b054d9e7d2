//! End-to-end capture run.
//!
//! [`GridCapture`] drives Deskewer → GridDetector → ThresholdCalibrator →
//! CellClassifier → Renderer in strict sequence. Each stage consumes the
//! previous stage's output in full; the first failure aborts the run and no
//! raster is produced.
//!
//! ```no_run
//! use grid_capture::{CaptureParams, GridCapture};
//! use grid_capture::image::io::load_rgb_image;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let img = load_rgb_image(std::path::Path::new("die.png"))?;
//! let out = GridCapture::new(CaptureParams::default()).process(&img)?;
//! println!("{}x{} cells", out.raster.w, out.raster.h);
//! # Ok(())
//! # }
//! ```

pub mod params;

pub use params::CaptureParams;

use crate::calibrate::{Calibration, ThresholdCalibrator};
use crate::classify::{CellClassifier, Classification, LabelMap};
use crate::deskew::{Deskewed, Deskewer};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    CalibrationStage, CaptureReport, ClassificationStage, DeskewStage, GridStage, InputDescriptor,
    TimingBreakdown,
};
use crate::error::CaptureError;
use crate::grid::{GridDetection, GridDetector};
use crate::image::ImageRgb8;
use crate::render::render_labels;
use crate::solver::{Clusterer, KMeans, LeastSquaresSolver, LevenbergMarquardt};
use crate::types::{GridModel, ThresholdPair};
use log::{debug, info};
use std::time::Instant;

/// Everything a successful run produced.
#[derive(Clone, Debug)]
pub struct CaptureOutput {
    /// `(cols + 1) × (rows + 1)` colour-coded label raster.
    pub raster: ImageRgb8,
    pub deskewed: Deskewed,
    pub detection: GridDetection,
    pub calibration: Calibration,
    pub classification: Classification,
    pub report: CaptureReport,
}

impl CaptureOutput {
    pub fn grid(&self) -> &GridModel {
        &self.detection.grid
    }

    pub fn labels(&self) -> &LabelMap {
        &self.classification.labels
    }

    pub fn thresholds(&self) -> ThresholdPair {
        self.calibration.thresholds
    }
}

pub struct GridCapture<C = KMeans, S = LevenbergMarquardt> {
    params: CaptureParams,
    clusterer: C,
    solver: S,
}

impl GridCapture {
    /// Capture with the default numerics configured from `params`.
    pub fn new(params: CaptureParams) -> Self {
        let clusterer = params.kmeans;
        let solver = LevenbergMarquardt::new(params.solver);
        Self {
            params,
            clusterer,
            solver,
        }
    }
}

impl<C: Clusterer, S: LeastSquaresSolver> GridCapture<C, S> {
    /// Capture with caller-supplied clustering and least-squares backends.
    pub fn with_numerics(params: CaptureParams, clusterer: C, solver: S) -> Self {
        Self {
            params,
            clusterer,
            solver,
        }
    }

    pub fn params(&self) -> &CaptureParams {
        &self.params
    }

    /// Run the full pipeline on `img`.
    pub fn process(&self, img: &ImageRgb8) -> Result<CaptureOutput, CaptureError> {
        let p = &self.params;
        info!(
            "capture: {}x{} input, deskew {}",
            img.w,
            img.h,
            if p.enable_deskew { "on" } else { "off" }
        );
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let start = Instant::now();
        let deskewed = if p.enable_deskew {
            Deskewer::new(p.deskew).run(img, p.explicit_skew_angle_deg)?
        } else {
            Deskewer::passthrough(img)
        };
        timings.record("deskew", start);

        let start = Instant::now();
        let gray = deskewed.image.to_gray();
        let detector = GridDetector::new(
            p.grid,
            p.cluster_proximity_threshold_px as f64,
            &self.clusterer,
            &self.solver,
        );
        let detection = detector.detect(&gray)?;
        timings.record("grid", start);

        let start = Instant::now();
        let calibrator = ThresholdCalibrator::new(p.calibration, &self.clusterer, &self.solver);
        let calibration = calibrator.calibrate(&deskewed.image, &detection.grid)?;
        timings.record("calibrate", start);

        let start = Instant::now();
        let classification = CellClassifier::new(p.aggressive_margin as f32)
            .classify(&calibration.brightness(), &calibration.thresholds);
        timings.record("classify", start);

        let start = Instant::now();
        let raster = render_labels(&classification.labels);
        timings.record("render", start);
        timings.total_ms = elapsed_ms(total_start);
        debug!("capture: timings {timings:?}");

        let report = CaptureReport {
            input: InputDescriptor {
                width: img.w,
                height: img.h,
            },
            deskew: DeskewStage::from_deskewed(&deskewed),
            grid: GridStage::from_detection(&detection),
            calibration: CalibrationStage::from_calibration(&calibration),
            classification: ClassificationStage::new(&calibration, &classification),
            timings,
        };
        info!(
            "capture: {}x{} cells in {:.1} ms, {} unknown",
            raster.w,
            raster.h,
            report.timings.total_ms,
            report.classification.unknown_cells.len()
        );

        Ok(CaptureOutput {
            raster,
            deskewed,
            detection,
            calibration,
            classification,
            report,
        })
    }
}
