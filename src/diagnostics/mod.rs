//! Serializable account of a capture run.
//!
//! [`CaptureReport`] collects one summary per stage plus the timing trace; the
//! host binary writes it as JSON next to the output raster.

pub mod report;
pub mod timing;

pub use report::{
    CalibrationStage, CaptureReport, CellReport, ClassificationStage, DeskewStage, GridStage,
    InputDescriptor,
};
pub use timing::{StageTiming, TimingBreakdown};
