//! Pitch estimation from pairwise line distances.
//!
//! True pitch appears among the short pairwise distances; longer ones are
//! multiples of it. Distances below the proximity threshold are clustered for
//! every `k` in the configured range and the `k` whose sorted centroids are
//! most evenly spaced wins.
use crate::error::{GeometryError, NumericError};
use crate::solver::Clusterer;
use crate::types::Axis;
use serde::Serialize;

/// All pairwise `|a − b|` strictly below `threshold`.
pub fn pairwise_distances(positions: &[f64], threshold: f64) -> Vec<f64> {
    let mut out = Vec::new();
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[..i] {
            let d = (a - b).abs();
            if d < threshold {
                out.push(d);
            }
        }
    }
    out
}

/// Chosen cluster count and the pitch it implies.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchEstimate {
    pub pitch: f64,
    pub k: usize,
    pub centroids: Vec<f64>,
    pub gap_variance: f64,
}

fn gaps(centroids: &[f64]) -> Vec<f64> {
    centroids.windows(2).map(|w| w[1] - w[0]).collect()
}

fn variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Pick the pitch for `axis` from its retained pairwise distances.
///
/// Ties in gap variance keep the smallest `k`.
pub fn estimate_pitch<C: Clusterer + ?Sized>(
    clusterer: &C,
    distances: &[f64],
    k_range: std::ops::RangeInclusive<usize>,
    axis: Axis,
) -> Result<PitchEstimate, GeometryError> {
    let not_found = || GeometryError::PitchNotFound {
        axis,
        distances: distances.len(),
    };
    if distances.is_empty() {
        return Err(not_found());
    }

    let mut best: Option<PitchEstimate> = None;
    for k in k_range {
        let centroids = match clusterer.cluster(distances, k) {
            Ok(c) => c,
            Err(NumericError::EmptyInput) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        if centroids.len() < 2 {
            continue;
        }
        let g = gaps(&centroids);
        let gap_variance = variance(&g);
        let pitch = g.iter().sum::<f64>() / g.len() as f64;
        log::trace!("{axis} pitch k={k}: {} centroids, mean gap {pitch:.3}, var {gap_variance:.4}", centroids.len());
        if best
            .as_ref()
            .map_or(true, |b| gap_variance < b.gap_variance)
        {
            best = Some(PitchEstimate {
                pitch,
                k,
                centroids,
                gap_variance,
            });
        }
    }

    let best = best.ok_or_else(not_found)?;
    log::debug!(
        "{axis} pitch {:.3} px (k={}, gap variance {:.4})",
        best.pitch,
        best.k,
        best.gap_variance
    );
    Ok(best)
}
