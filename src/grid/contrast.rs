//! Offset search along an axis without detected lines.
//!
//! With the pitch known, every integer offset `b ∈ [0, m)` partitions the axis
//! into bands of width `m`. Edge counts per pixel line are normalized to
//! `[0, 1]`; a band aligned with the cells is uniformly busy or uniformly
//! quiet, so its mean sits near 0 or 1. The offset minimizing the RMS of
//! `min(mean, 1 − mean)` over all bands wins; ties keep the smaller offset.
use crate::error::GeometryError;
use crate::types::Axis;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastSearch {
    pub offset: f64,
    pub score: f64,
    /// Score of every integer offset, index = offset.
    pub scores: Vec<f64>,
}

/// Min-max normalize per-line edge counts; `None` when they are all equal.
pub fn normalize_profile(sums: &[u32]) -> Option<Vec<f64>> {
    let lo = *sums.iter().min()?;
    let hi = *sums.iter().max()?;
    if hi == lo {
        return None;
    }
    let span = (hi - lo) as f64;
    Some(sums.iter().map(|&s| (s - lo) as f64 / span).collect())
}

/// RMS band error of one offset; `None` if no band is non-empty.
pub fn band_score(profile: &[f64], pitch: f64, offset: f64) -> Option<f64> {
    let extent = profile.len();
    let bands = (extent as f64 / pitch).floor() as usize;
    let bands = bands.saturating_sub(1);
    let mut sum_sq = 0.0;
    let mut used = 0usize;
    for i in 0..bands {
        let start = (pitch * i as f64 + offset).floor().max(0.0) as usize;
        let end = ((pitch * (i + 1) as f64 + offset).floor().max(0.0) as usize).min(extent);
        if end <= start {
            continue;
        }
        let band = &profile[start..end];
        let mean = band.iter().sum::<f64>() / band.len() as f64;
        let err = mean.min(1.0 - mean);
        sum_sq += err * err;
        used += 1;
    }
    (used > 0).then(|| (sum_sq / used as f64).sqrt())
}

/// Exhaustive integer offset search for `axis` given its edge-count profile.
pub fn search_offset(
    sums: &[u32],
    pitch: f64,
    axis: Axis,
) -> Result<ContrastSearch, GeometryError> {
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(GeometryError::DegeneratePitch { axis, pitch });
    }
    let profile = normalize_profile(sums).ok_or(GeometryError::NoContrast { axis })?;

    let candidates = pitch.floor().max(1.0) as usize;
    let mut scores = Vec::with_capacity(candidates);
    let mut best: Option<(usize, f64)> = None;
    for b in 0..candidates {
        let Some(score) = band_score(&profile, pitch, b as f64) else {
            scores.push(f64::INFINITY);
            continue;
        };
        scores.push(score);
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((b, score));
        }
    }

    let (offset, score) = best.ok_or(GeometryError::NoContrast { axis })?;
    log::debug!("{axis}: contrast offset {offset} (rms {score:.4}) at pitch {pitch:.3}");
    Ok(ContrastSearch {
        offset: offset as f64,
        score,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Busy lines in every other band of width `pitch` starting at `offset`.
    fn striped(len: usize, pitch: usize, offset: usize) -> Vec<u32> {
        (0..len)
            .map(|i| {
                if i < offset {
                    2
                } else if ((i - offset) / pitch) % 2 == 0 {
                    12
                } else {
                    2
                }
            })
            .collect()
    }

    #[test]
    fn finds_stripe_phase() {
        let sums = striped(410, 40, 13);
        let res = search_offset(&sums, 40.0, Axis::Rows).unwrap();
        assert_eq!(res.offset, 13.0);
        assert!(res.score < 1e-12);
        assert_eq!(res.scores.len(), 40);
    }

    #[test]
    fn flat_profile_has_no_contrast() {
        let sums = vec![5u32; 200];
        assert_eq!(
            search_offset(&sums, 40.0, Axis::Columns),
            Err(GeometryError::NoContrast {
                axis: Axis::Columns
            })
        );
    }

    #[test]
    fn normalization_spans_unit_range() {
        let p = normalize_profile(&[3, 7, 5]).unwrap();
        assert_eq!(p, vec![0.0, 1.0, 0.5]);
        assert!(normalize_profile(&[]).is_none());
    }
}
