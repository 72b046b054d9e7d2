//! Axis binning and de-duplication of Hough line candidates.
use super::hough::HoughLine;
use crate::angle::angular_difference;
use crate::types::Axis;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// A line candidate reduced to its position along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineSample {
    /// Pixel coordinate across the line (x for vertical lines, y for
    /// horizontal ones).
    pub position: f64,
    pub rho: f32,
    pub theta: f32,
    pub votes: u32,
}

impl LineSample {
    pub fn from_line(line: &HoughLine) -> Self {
        Self {
            position: line.rho.abs() as f64,
            rho: line.rho,
            theta: line.theta,
            votes: line.votes,
        }
    }
}

/// Line candidates split by axis.
///
/// `vertical` lines delimit columns and `horizontal` lines delimit rows.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AxisCandidates {
    pub vertical: Vec<LineSample>,
    pub horizontal: Vec<LineSample>,
    /// Lines whose angle matched neither axis.
    pub discarded: usize,
}

impl AxisCandidates {
    pub fn for_axis(&self, axis: Axis) -> &[LineSample] {
        match axis {
            Axis::Columns => &self.vertical,
            Axis::Rows => &self.horizontal,
        }
    }

    /// Positions along `axis`, sorted ascending.
    pub fn positions(&self, axis: Axis) -> Vec<f64> {
        let mut p: Vec<f64> = self.for_axis(axis).iter().map(|s| s.position).collect();
        p.sort_by(f64::total_cmp);
        p
    }
}

/// Split lines into vertical (θ near 0 or π) and horizontal (θ near π/2)
/// within `tolerance_rad`; anything else is discarded.
pub fn bin_by_axis(lines: &[HoughLine], tolerance_rad: f32) -> AxisCandidates {
    let mut out = AxisCandidates::default();
    for line in lines {
        if angular_difference(line.theta, 0.0) < tolerance_rad {
            out.vertical.push(LineSample::from_line(line));
        } else if angular_difference(line.theta, FRAC_PI_2) < tolerance_rad {
            out.horizontal.push(LineSample::from_line(line));
        } else {
            out.discarded += 1;
        }
    }
    out
}

/// Collapse chains of samples whose consecutive positions are within
/// `max_gap` into one sample at the vote-weighted mean position.
///
/// The merged sample keeps the angle of its strongest member. Output is
/// sorted by position.
pub fn merge_nearby(mut samples: Vec<LineSample>, max_gap: f64) -> Vec<LineSample> {
    if samples.is_empty() || max_gap <= 0.0 {
        samples.sort_by(|a, b| a.position.total_cmp(&b.position));
        return samples;
    }
    samples.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut merged: Vec<LineSample> = Vec::with_capacity(samples.len());
    let mut group: Vec<LineSample> = Vec::new();
    for s in samples {
        if let Some(last) = group.last() {
            if s.position - last.position > max_gap {
                merged.push(collapse(&group));
                group.clear();
            }
        }
        group.push(s);
    }
    if !group.is_empty() {
        merged.push(collapse(&group));
    }
    merged
}

fn collapse(group: &[LineSample]) -> LineSample {
    let total: u64 = group.iter().map(|s| s.votes as u64).sum();
    let position = if total == 0 {
        group.iter().map(|s| s.position).sum::<f64>() / group.len() as f64
    } else {
        group
            .iter()
            .map(|s| s.position * s.votes as f64)
            .sum::<f64>()
            / total as f64
    };
    let strongest = group
        .iter()
        .max_by(|a, b| a.votes.cmp(&b.votes).then(b.position.total_cmp(&a.position)))
        .copied()
        .unwrap_or(group[0]);
    LineSample {
        position,
        votes: total.min(u32::MAX as u64) as u32,
        ..strongest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(rho: f32, theta_deg: f32, votes: u32) -> HoughLine {
        HoughLine {
            rho,
            theta: theta_deg.to_radians(),
            votes,
        }
    }

    #[test]
    fn binning_uses_both_ends_of_theta_range() {
        let lines = [
            line(20.0, 0.0, 500),
            line(-60.0, 179.5, 500),
            line(35.0, 90.3, 500),
            line(10.0, 45.0, 500),
        ];
        let c = bin_by_axis(&lines, 0.1);
        assert_eq!(c.positions(Axis::Columns), vec![20.0, 60.0]);
        assert_eq!(c.positions(Axis::Rows), vec![35.0]);
        assert_eq!(c.discarded, 1);
    }

    #[test]
    fn nearby_samples_merge_by_votes() {
        let s = |p: f64, v: u32| LineSample {
            position: p,
            rho: p as f32,
            theta: 0.0,
            votes: v,
        };
        let merged = merge_nearby(vec![s(41.0, 100), s(10.0, 50), s(40.0, 300), s(80.0, 10)], 2.0);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].position, 10.0);
        assert!((merged[1].position - 40.25).abs() < 1e-9);
        assert_eq!(merged[1].votes, 400);
        assert_eq!(merged[1].rho, 40.0);
        assert_eq!(merged[2].position, 80.0);
    }
}
