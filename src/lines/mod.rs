//! Line candidates for deskew and grid detection.
//!
//! An edge map goes through the Hough transform; peaks are binned into
//! vertical and horizontal candidates by angle and near-duplicate positions
//! are merged.

pub mod candidates;
pub mod hough;

pub use candidates::{bin_by_axis, merge_nearby, AxisCandidates, LineSample};
pub use hough::{hough_lines, HoughLine, HoughParams};

use crate::edges::EdgeMap;
use serde::Deserialize;

/// Line finding and axis binning parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineParams {
    pub hough: HoughParams,
    /// Angular tolerance in radians around 0 and π/2.
    pub axis_tolerance_rad: f32,
    /// Same-axis candidates closer than this (px) are merged.
    pub merge_distance_px: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            hough: HoughParams::default(),
            axis_tolerance_rad: 0.1,
            merge_distance_px: 2.0,
        }
    }
}

/// Detect, bin and merge axis-aligned line candidates.
pub fn axis_candidates(edges: &EdgeMap, params: &LineParams) -> AxisCandidates {
    let lines = hough_lines(edges, &params.hough);
    let binned = bin_by_axis(&lines, params.axis_tolerance_rad);
    let vertical_raw = binned.vertical.len();
    let horizontal_raw = binned.horizontal.len();
    let out = AxisCandidates {
        vertical: merge_nearby(binned.vertical, params.merge_distance_px),
        horizontal: merge_nearby(binned.horizontal, params.merge_distance_px),
        discarded: binned.discarded,
    };
    log::debug!(
        "lines: vertical {}->{} horizontal {}->{} discarded {}",
        vertical_raw,
        out.vertical.len(),
        horizontal_raw,
        out.horizontal.len(),
        out.discarded
    );
    out
}
