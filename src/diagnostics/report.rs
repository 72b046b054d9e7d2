use crate::calibrate::{Calibration, Histogram, MixtureFit};
use crate::classify::{Classification, LabelCounts, PassSummary};
use crate::deskew::{AngleSource, Deskewed};
use crate::diagnostics::TimingBreakdown;
use crate::grid::{AxisFit, GridDetection};
use crate::lines::LineSample;
use crate::types::{CellLabel, GridModel, Rect};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureReport {
    pub input: InputDescriptor,
    pub deskew: DeskewStage,
    pub grid: GridStage,
    pub calibration: CalibrationStage,
    pub classification: ClassificationStage,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskewStage {
    pub angle_deg: f32,
    pub source: AngleSource,
    pub lines_total: usize,
    pub lines_used: usize,
    pub crop: Rect,
}

impl DeskewStage {
    pub fn from_deskewed(d: &Deskewed) -> Self {
        Self {
            angle_deg: d.angle_deg,
            source: d.source,
            lines_total: d.lines_total,
            lines_used: d.lines_used,
            crop: d.crop,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStage {
    pub model: GridModel,
    pub cols: usize,
    pub rows: usize,
    pub vertical_lines: Vec<LineSample>,
    pub horizontal_lines: Vec<LineSample>,
    pub discarded_lines: usize,
    pub edge_pixels: usize,
    pub cols_fit: AxisFit,
    pub rows_fit: AxisFit,
}

impl GridStage {
    pub fn from_detection(d: &GridDetection) -> Self {
        let (cols, rows) = d.grid.dims();
        Self {
            model: d.grid,
            cols,
            rows,
            vertical_lines: d.candidates.vertical.clone(),
            horizontal_lines: d.candidates.horizontal.clone(),
            discarded_lines: d.candidates.discarded,
            edge_pixels: d.edges.count(),
            cols_fit: d.cols_fit.clone(),
            rows_fit: d.rows_fit.clone(),
        }
    }
}

/// Final state of one cell.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellReport {
    pub col: usize,
    pub row: usize,
    pub rect: Rect,
    pub mean_rgb: [f32; 3],
    pub brightness: f32,
    pub label: CellLabel,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationStage {
    pub low: f32,
    pub high: f32,
    pub histogram: Histogram,
    pub fit: MixtureFit,
}

impl CalibrationStage {
    pub fn from_calibration(c: &Calibration) -> Self {
        Self {
            low: c.thresholds.low(),
            high: c.thresholds.high(),
            histogram: c.histogram.clone(),
            fit: c.fit,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationStage {
    pub passes: Vec<PassSummary>,
    pub counts: LabelCounts,
    pub unknown_cells: Vec<(usize, usize)>,
    pub cells: Vec<CellReport>,
}

impl ClassificationStage {
    pub fn new(calibration: &Calibration, classification: &Classification) -> Self {
        let cells = calibration
            .stats
            .iter()
            .map(|((col, row), s)| CellReport {
                col,
                row,
                rect: s.rect,
                mean_rgb: s.mean_rgb,
                brightness: s.brightness,
                label: *classification.labels.get(col, row),
            })
            .collect();
        Self {
            passes: classification.passes.clone(),
            counts: LabelCounts::of(&classification.labels),
            unknown_cells: classification.unknown_cells(),
            cells,
        }
    }
}
