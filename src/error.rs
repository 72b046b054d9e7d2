//! Error taxonomy of the capture pipeline.
//!
//! Every error is fatal for the run except [`GeometryError::NeedsManualAngle`],
//! which a caller can recover from by re-running with an explicit angle.
use crate::types::Axis;

/// Failure inside a numeric primitive (clustering, least squares).
#[derive(Clone, Debug, PartialEq)]
pub enum NumericError {
    /// The solver exhausted its iteration budget without meeting a
    /// convergence criterion.
    NonConvergence { iterations: usize, cost: f64 },
    /// Residuals or parameters became NaN/inf.
    NonFinite,
    /// The problem has no data to work on.
    EmptyInput,
}

impl std::fmt::Display for NumericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericError::NonConvergence { iterations, cost } => write!(
                f,
                "least-squares fit did not converge after {iterations} iterations (cost {cost:.3e})"
            ),
            NumericError::NonFinite => write!(f, "non-finite residuals or parameters"),
            NumericError::EmptyInput => write!(f, "no input data"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Failures of the deskew and grid detection stages.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// No line candidates on either axis.
    GridNotFound,
    /// Line candidates on both axes at once; joint detection is not supported.
    UnsupportedGrid { vertical: usize, horizontal: usize },
    /// Deskew found no line within tolerance of the axes.
    NeedsManualAngle { candidates: usize, tolerance_deg: f32 },
    /// No usable cluster count for the pairwise distances of an axis.
    PitchNotFound { axis: Axis, distances: usize },
    /// Offset regression collapsed the pitch.
    DegeneratePitch { axis: Axis, pitch: f64 },
    /// Contrast search along an axis had no edge signal to work with.
    NoContrast { axis: Axis },
    /// Deskew crop would leave nothing of the image.
    DegenerateCrop { angle_deg: f32, width: usize, height: usize },
    Numeric(NumericError),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::GridNotFound => {
                write!(f, "failed to detect grid lines on either axis")
            }
            GeometryError::UnsupportedGrid {
                vertical,
                horizontal,
            } => write!(
                f,
                "lines detected on both axes (vertical={vertical}, horizontal={horizontal}); joint detection is unsupported"
            ),
            GeometryError::NeedsManualAngle {
                candidates,
                tolerance_deg,
            } => write!(
                f,
                "no line within {tolerance_deg:.1}° of the axes ({candidates} candidates); supply an explicit angle"
            ),
            GeometryError::PitchNotFound { axis, distances } => write!(
                f,
                "could not estimate {axis} pitch from {distances} pairwise distances"
            ),
            GeometryError::DegeneratePitch { axis, pitch } => {
                write!(f, "{axis} pitch regressed to {pitch:.4}")
            }
            GeometryError::NoContrast { axis } => {
                write!(f, "no edge contrast to locate {axis} offset")
            }
            GeometryError::DegenerateCrop {
                angle_deg,
                width,
                height,
            } => write!(
                f,
                "rotation by {angle_deg:.3}° leaves nothing of a {width}x{height} image after crop"
            ),
            GeometryError::Numeric(e) => write!(f, "grid fit failed: {e}"),
        }
    }
}

impl std::error::Error for GeometryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeometryError::Numeric(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NumericError> for GeometryError {
    fn from(e: NumericError) -> Self {
        GeometryError::Numeric(e)
    }
}

/// Failures of the threshold calibration stage.
#[derive(Clone, Debug, PartialEq)]
pub enum CalibrationError {
    /// Fitted `low >= high`: the two-population assumption failed.
    AmbiguousThresholds { low: f32, high: f32 },
    /// The grid implied no cells.
    NoCells,
    Numeric(NumericError),
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationError::AmbiguousThresholds { low, high } => write!(
                f,
                "ambiguous thresholds (low {low:.2} >= high {high:.2}); brightness is not bimodal"
            ),
            CalibrationError::NoCells => write!(f, "grid contains no cells"),
            CalibrationError::Numeric(e) => write!(f, "mixture fit failed: {e}"),
        }
    }
}

impl std::error::Error for CalibrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalibrationError::Numeric(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NumericError> for CalibrationError {
    fn from(e: NumericError) -> Self {
        CalibrationError::Numeric(e)
    }
}

/// Any failure of a capture run.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureError {
    Geometry(GeometryError),
    Calibration(CalibrationError),
}

impl CaptureError {
    /// True when re-running with an explicit skew angle may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CaptureError::Geometry(GeometryError::NeedsManualAngle { .. })
        )
    }
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Geometry(e) => write!(f, "geometry: {e}"),
            CaptureError::Calibration(e) => write!(f, "calibration: {e}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Geometry(e) => Some(e),
            CaptureError::Calibration(e) => Some(e),
        }
    }
}

impl From<GeometryError> for CaptureError {
    fn from(e: GeometryError) -> Self {
        CaptureError::Geometry(e)
    }
}

impl From<CalibrationError> for CaptureError {
    fn from(e: CalibrationError) -> Self {
        CaptureError::Calibration(e)
    }
}
