//! Two-component normal mixture fitted to a histogram.
//!
//! Model: `N(x; μ1, σ1) + w·N(x; μ1 + Δ, σ2)` with parameter vector
//! `(μ1, Δ, σ1, σ2, w)`. The first component has unit weight; the histogram
//! heights are scaled beforehand so the two are comparable.
use super::histogram::Histogram;
use crate::error::NumericError;
use crate::solver::{LeastSquaresProblem, LeastSquaresSolver};
use nalgebra::DVector;
use serde::Serialize;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

#[inline]
fn normal_pdf(x: f64, mean: f64, sigma: f64) -> f64 {
    let z = (x - mean) / sigma;
    INV_SQRT_2PI / sigma * (-0.5 * z * z).exp()
}

/// Fitted mixture parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mixture {
    pub mean_low: f64,
    /// Separation of the second mean from the first.
    pub delta: f64,
    pub sigma_low: f64,
    pub sigma_high: f64,
    pub weight: f64,
}

impl Mixture {
    pub fn mean_high(&self) -> f64 {
        self.mean_low + self.delta
    }

    pub fn eval(&self, x: f64) -> f64 {
        normal_pdf(x, self.mean_low, self.sigma_low)
            + self.weight * normal_pdf(x, self.mean_high(), self.sigma_high)
    }

    /// `(μ1 + k|σ1|, μ2 − k|σ2|)`.
    pub fn thresholds(&self, sigma_factor: f64) -> (f64, f64) {
        (
            self.mean_low + sigma_factor * self.sigma_low.abs(),
            self.mean_high() - sigma_factor * self.sigma_high.abs(),
        )
    }

    fn to_vector(self) -> DVector<f64> {
        DVector::from_vec(vec![
            self.mean_low,
            self.delta,
            self.sigma_low,
            self.sigma_high,
            self.weight,
        ])
    }

    fn from_slice(p: &[f64]) -> Self {
        Self {
            mean_low: p[0],
            delta: p[1],
            sigma_low: p[2],
            sigma_high: p[3],
            weight: p[4],
        }
    }
}

/// Result of a mixture fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixtureFit {
    pub seed: Mixture,
    pub mixture: Mixture,
    pub cost: f64,
    pub iterations: usize,
}

struct MixtureProblem<'a> {
    centres: &'a [f64],
    heights: &'a [f64],
}

impl LeastSquaresProblem for MixtureProblem<'_> {
    fn num_params(&self) -> usize {
        5
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        let model = Mixture::from_slice(params.as_slice());
        DVector::from_iterator(
            self.centres.len(),
            self.centres
                .iter()
                .zip(self.heights)
                .map(|(&x, &h)| model.eval(x) - h),
        )
    }
}

/// Least-squares fit of the mixture to `hist`, starting from `seed`.
pub fn fit_mixture<S: LeastSquaresSolver + ?Sized>(
    solver: &S,
    hist: &Histogram,
    seed: Mixture,
) -> Result<MixtureFit, NumericError> {
    let problem = MixtureProblem {
        centres: &hist.centres,
        heights: &hist.heights,
    };
    let fit = solver.minimize(&problem, seed.to_vector())?;
    Ok(MixtureFit {
        seed,
        mixture: Mixture::from_slice(fit.params.as_slice()),
        cost: fit.cost,
        iterations: fit.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::LevenbergMarquardt;

    #[test]
    fn pdf_peak_matches_unit_normal() {
        assert!((normal_pdf(0.0, 0.0, 1.0) - 0.398_942_28).abs() < 1e-8);
        let m = Mixture {
            mean_low: 10.0,
            delta: 100.0,
            sigma_low: 2.0,
            sigma_high: 4.0,
            weight: 2.0,
        };
        assert!((m.eval(110.0) - 2.0 * normal_pdf(0.0, 0.0, 4.0)).abs() < 1e-12);
        assert_eq!(m.thresholds(3.0), (16.0, 98.0));
    }

    #[test]
    fn recovers_exact_mixture_samples() {
        let truth = Mixture {
            mean_low: 60.0,
            delta: 110.0,
            sigma_low: 10.0,
            sigma_high: 12.0,
            weight: 0.8,
        };
        let centres: Vec<f64> = (0..50).map(|i| 20.0 + 4.0 * i as f64 + 2.0).collect();
        let heights: Vec<f64> = centres.iter().map(|&x| truth.eval(x)).collect();
        let hist = Histogram {
            min: 20.0,
            bin_width: 4.0,
            counts: vec![0; 50],
            centres,
            heights,
        };
        let seed = Mixture {
            mean_low: 55.0,
            delta: 120.0,
            sigma_low: 15.0,
            sigma_high: 15.0,
            weight: 1.0,
        };
        let fit = fit_mixture(&LevenbergMarquardt::default(), &hist, seed).unwrap();
        let m = fit.mixture;
        assert!((m.mean_low - 60.0).abs() < 1e-3, "{m:?}");
        assert!((m.mean_high() - 170.0).abs() < 1e-3, "{m:?}");
        assert!((m.sigma_low.abs() - 10.0).abs() < 1e-3, "{m:?}");
        assert!((m.weight - 0.8).abs() < 1e-3, "{m:?}");
        assert_eq!(fit.seed, seed);
    }
}
