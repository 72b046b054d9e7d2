//! Run options threaded through every stage.
//!
//! One immutable [`CaptureParams`] value configures a whole run. The four
//! top-level knobs are the ones an operator usually touches; the nested
//! sections hold per-stage tuning and all default to working values.
use crate::calibrate::CalibrationParams;
use crate::deskew::DeskewParams;
use crate::grid::GridParams;
use crate::solver::{KMeans, LmParams};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureParams {
    /// Skew angle in degrees; skips angle detection when set.
    pub explicit_skew_angle_deg: Option<f32>,
    pub enable_deskew: bool,
    /// Pairwise line distances at or above this are ignored for pitch
    /// estimation.
    pub cluster_proximity_threshold_px: u32,
    /// Brightness margin below `low` for the aggressive bridging pass.
    pub aggressive_margin: u32,
    pub deskew: DeskewParams,
    pub grid: GridParams,
    pub calibration: CalibrationParams,
    pub solver: LmParams,
    pub kmeans: KMeans,
}

impl Default for CaptureParams {
    fn default() -> Self {
        Self {
            explicit_skew_angle_deg: None,
            enable_deskew: true,
            cluster_proximity_threshold_px: 100,
            aggressive_margin: 9,
            deskew: DeskewParams::default(),
            grid: GridParams::default(),
            calibration: CalibrationParams::default(),
            solver: LmParams::default(),
            kmeans: KMeans::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let p: CaptureParams = serde_json::from_str(
            r#"{
                "explicit_skew_angle_deg": 1.25,
                "aggressive_margin": 12,
                "grid": { "k_max": 9, "lines": { "hough": { "threshold": 150 } } },
                "calibration": { "bins": 12 }
            }"#,
        )
        .unwrap();
        assert_eq!(p.explicit_skew_angle_deg, Some(1.25));
        assert!(p.enable_deskew);
        assert_eq!(p.cluster_proximity_threshold_px, 100);
        assert_eq!(p.aggressive_margin, 12);
        assert_eq!(p.grid.k_min, 3);
        assert_eq!(p.grid.k_max, 9);
        assert_eq!(p.grid.lines.hough.threshold, 150);
        assert_eq!(p.grid.lines.axis_tolerance_rad, 0.1);
        assert_eq!(p.calibration.bins, 12);
        assert_eq!(p.calibration.sigma_seed, 15.0);
        assert_eq!(p.deskew.tolerance_deg, 3.0);
    }
}
