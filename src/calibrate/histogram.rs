//! Fixed-bin brightness histogram, height-normalized for the mixture fit.
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// Left edge of the first bin.
    pub min: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
    /// Bin centres, the abscissae of the fit.
    pub centres: Vec<f64>,
    /// Counts scaled so the tallest bin equals the requested peak height.
    pub heights: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal bins over `[min, max]`; the maximum
    /// lands in the last bin. A constant input is spread over
    /// `[v − 0.5, v + 0.5]`. Returns `None` for empty input or zero bins.
    pub fn build(values: &[f64], bins: usize, peak_height: f64) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let bin_width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let i = (((v - lo) / bin_width) as usize).min(bins - 1);
            counts[i] += 1;
        }
        let centres = (0..bins)
            .map(|i| lo + bin_width * (i as f64 + 0.5))
            .collect();
        let tallest = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
        let heights = counts
            .iter()
            .map(|&c| peak_height * c as f64 / tallest)
            .collect();
        Some(Self {
            min: lo,
            bin_width,
            counts,
            centres,
            heights,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_falls_in_last_bin() {
        let h = Histogram::build(&[0.0, 1.0, 2.0, 10.0], 5, 0.03).unwrap();
        assert_eq!(h.counts, vec![2, 1, 0, 0, 1]);
        assert!((h.centres[0] - 1.0).abs() < 1e-12);
        assert!((h.centres[4] - 9.0).abs() < 1e-12);
        assert!((h.heights[0] - 0.03).abs() < 1e-12);
        assert!((h.heights[1] - 0.015).abs() < 1e-12);
    }

    #[test]
    fn constant_input_is_centred() {
        let h = Histogram::build(&[7.0; 4], 2, 1.0).unwrap();
        assert_eq!(h.counts, vec![0, 4]);
        assert!((h.min - 6.5).abs() < 1e-12);
        assert!(Histogram::build(&[], 10, 1.0).is_none());
    }
}
