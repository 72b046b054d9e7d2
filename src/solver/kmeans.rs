//! Deterministic Lloyd k-means on scalars.
//!
//! Seeding is maximin: the first centre is the smallest value, each next one
//! the value farthest from every centre chosen so far. Seeding stops early
//! once every value coincides with a centre.
use super::Clusterer;
use crate::error::NumericError;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KMeans {
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

fn nearest(centres: &[f64], v: f64) -> (usize, f64) {
    let mut best = (0usize, f64::INFINITY);
    for (i, &c) in centres.iter().enumerate() {
        let d = (v - c).abs();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn seed_maximin(values: &[f64], k: usize) -> Vec<f64> {
    let first = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut centres = vec![first];
    while centres.len() < k {
        let mut far = (0.0f64, first);
        for &v in values {
            let (_, d) = nearest(&centres, v);
            if d > far.0 {
                far = (d, v);
            }
        }
        if far.0 <= 0.0 {
            break;
        }
        centres.push(far.1);
    }
    centres
}

impl Clusterer for KMeans {
    fn cluster(&self, values: &[f64], k: usize) -> Result<Vec<f64>, NumericError> {
        if values.is_empty() || k == 0 {
            return Err(NumericError::EmptyInput);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(NumericError::NonFinite);
        }

        let mut centres = seed_maximin(values, k);
        let mut assignment = vec![usize::MAX; values.len()];
        for _ in 0..self.max_iterations.max(1) {
            let mut changed = false;
            for (a, &v) in assignment.iter_mut().zip(values) {
                let (i, _) = nearest(&centres, v);
                if *a != i {
                    *a = i;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![0.0f64; centres.len()];
            let mut counts = vec![0usize; centres.len()];
            for (&a, &v) in assignment.iter().zip(values) {
                sums[a] += v;
                counts[a] += 1;
            }
            let mut next = Vec::with_capacity(centres.len());
            for (s, c) in sums.iter().zip(&counts) {
                if *c > 0 {
                    next.push(s / *c as f64);
                }
            }
            if next.len() != centres.len() {
                // an emptied cluster renumbers the rest
                assignment.fill(usize::MAX);
            }
            centres = next;
        }

        centres.sort_by(f64::total_cmp);
        centres.dedup();
        Ok(centres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_groups_get_their_means() {
        let values = [1.0, 1.2, 0.8, 10.0, 10.4, 9.6, 20.0, 21.0, 19.0];
        let c = KMeans::default().cluster(&values, 3).unwrap();
        assert_eq!(c.len(), 3);
        assert!((c[0] - 1.0).abs() < 1e-9);
        assert!((c[1] - 10.0).abs() < 1e-9);
        assert!((c[2] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fewer_distinct_values_than_k() {
        let values = [40.0, 40.0, 80.0, 80.0, 40.0];
        let c = KMeans::default().cluster(&values, 7).unwrap();
        assert_eq!(c, vec![40.0, 80.0]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            KMeans::default().cluster(&[], 3),
            Err(NumericError::EmptyInput)
        );
    }

    #[test]
    fn result_is_deterministic_and_sorted() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 23) as f64 * 1.7).collect();
        let a = KMeans::default().cluster(&values, 5).unwrap();
        let b = KMeans::default().cluster(&values, 5).unwrap();
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
    }
}
