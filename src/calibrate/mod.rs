//! Per-cell brightness and bimodal threshold calibration.
//!
//! Every cell of the grid is reduced to its mean colour; the scalar
//! brightness (mean of the three channel means) is histogrammed and a
//! two-component mixture is fitted to it. The dark component's upper tail
//! and the bright component's lower tail give the `(low, high)` pair.

pub mod histogram;
pub mod mixture;

pub use histogram::Histogram;
pub use mixture::{fit_mixture, Mixture, MixtureFit};

use crate::cells::CellGrid;
use crate::error::CalibrationError;
use crate::image::ImageRgb8;
use crate::solver::{Clusterer, LeastSquaresSolver};
use crate::types::{GridModel, Rect, ThresholdPair};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    pub bins: usize,
    /// Height of the tallest histogram bin after normalization.
    pub peak_height: f64,
    /// Initial σ of both components.
    pub sigma_seed: f64,
    /// Initial weight of the bright component.
    pub weight_seed: f64,
    /// Thresholds sit this many σ inside each component.
    pub sigma_factor: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            bins: 50,
            peak_height: 0.03,
            sigma_seed: 15.0,
            weight_seed: 1.0,
            sigma_factor: 3.0,
        }
    }
}

/// Colour statistics of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStat {
    /// Bounding box clipped to the image.
    pub rect: Rect,
    pub mean_rgb: [f32; 3],
    pub brightness: f32,
}

/// Mean colour of every cell of `grid`; a box clipped to nothing reads as
/// black.
pub fn cell_stats(img: &ImageRgb8, grid: &GridModel) -> CellGrid<CellStat> {
    let (cols, rows) = grid.dims();
    CellGrid::from_fn(cols, rows, |c, r| {
        let rect = grid.cell_rect(c, r).clip(img.w, img.h);
        let mean_rgb = img.mean_rgb(rect).unwrap_or([0.0; 3]);
        CellStat {
            rect,
            mean_rgb,
            brightness: (mean_rgb[0] + mean_rgb[1] + mean_rgb[2]) / 3.0,
        }
    })
}

/// Everything the calibration derived, kept for reporting.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub stats: CellGrid<CellStat>,
    pub histogram: Histogram,
    pub fit: MixtureFit,
    pub thresholds: ThresholdPair,
}

impl Calibration {
    pub fn brightness(&self) -> CellGrid<f32> {
        self.stats.map(|s| s.brightness)
    }
}

pub struct ThresholdCalibrator<'a, C: ?Sized, S: ?Sized> {
    params: CalibrationParams,
    clusterer: &'a C,
    solver: &'a S,
}

impl<'a, C, S> ThresholdCalibrator<'a, C, S>
where
    C: Clusterer + ?Sized,
    S: LeastSquaresSolver + ?Sized,
{
    pub fn new(params: CalibrationParams, clusterer: &'a C, solver: &'a S) -> Self {
        Self {
            params,
            clusterer,
            solver,
        }
    }

    /// Calibrate thresholds for the cells `grid` lays over `img`.
    pub fn calibrate(
        &self,
        img: &ImageRgb8,
        grid: &GridModel,
    ) -> Result<Calibration, CalibrationError> {
        let stats = cell_stats(img, grid);
        let values: Vec<f64> = stats.values().map(|s| s.brightness as f64).collect();
        let (histogram, fit, thresholds) = self.fit_values(&values)?;
        Ok(Calibration {
            stats,
            histogram,
            fit,
            thresholds,
        })
    }

    /// Histogram, mixture fit and thresholds for raw brightness values.
    pub fn fit_values(
        &self,
        values: &[f64],
    ) -> Result<(Histogram, MixtureFit, ThresholdPair), CalibrationError> {
        let p = &self.params;
        let histogram =
            Histogram::build(values, p.bins, p.peak_height).ok_or(CalibrationError::NoCells)?;

        let centres = self.clusterer.cluster(values, 2)?;
        let (dark, bright) = match centres.as_slice() {
            [] => return Err(CalibrationError::NoCells),
            [only] => (*only, *only),
            [first, .., last] => (*first, *last),
        };
        let seed = Mixture {
            mean_low: dark,
            delta: bright - dark,
            sigma_low: p.sigma_seed,
            sigma_high: p.sigma_seed,
            weight: p.weight_seed,
        };

        let fit = fit_mixture(self.solver, &histogram, seed)?;
        let (low, high) = fit.mixture.thresholds(p.sigma_factor);
        log::info!(
            "calibrate: {} cells, seeds ({dark:.1}, {bright:.1}) -> mu=({:.1}, {:.1}) sigma=({:.1}, {:.1}) w={:.3}; low={low:.2} high={high:.2}",
            values.len(),
            fit.mixture.mean_low,
            fit.mixture.mean_high(),
            fit.mixture.sigma_low,
            fit.mixture.sigma_high,
            fit.mixture.weight,
        );
        let thresholds = ThresholdPair::new(low as f32, high as f32)?;
        Ok((histogram, fit, thresholds))
    }
}
