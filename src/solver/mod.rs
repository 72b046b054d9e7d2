//! Numeric primitives behind narrow interfaces.
//!
//! Grid detection and threshold calibration only talk to [`Clusterer`] and
//! [`LeastSquaresSolver`]; the default implementations are a deterministic
//! 1-D k-means ([`KMeans`]) and a Levenberg–Marquardt solver on `nalgebra`
//! ([`LevenbergMarquardt`]). Tests substitute stubs where a stage's logic
//! must be checked independently of the numerics.

pub mod kmeans;
pub mod levenberg;

pub use kmeans::KMeans;
pub use levenberg::{LevenbergMarquardt, LmParams};

use crate::error::NumericError;
use nalgebra::{DMatrix, DVector};

/// Partition scalar values into at most `k` clusters.
pub trait Clusterer {
    /// Sorted, distinct centroids of the non-empty clusters. May return fewer
    /// than `k` when the data has fewer distinct values.
    fn cluster(&self, values: &[f64], k: usize) -> Result<Vec<f64>, NumericError>;
}

/// A nonlinear least-squares objective `½‖r(p)‖²`.
pub trait LeastSquaresProblem {
    fn num_params(&self) -> usize;

    /// Residual vector at `params`.
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;

    /// Analytic Jacobian `∂r/∂p` (rows = residuals). `None` selects forward
    /// differences.
    fn jacobian(&self, _params: &DVector<f64>) -> Option<DMatrix<f64>> {
        None
    }
}

/// Outcome of a converged fit.
#[derive(Clone, Debug, PartialEq)]
pub struct LeastSquaresFit {
    pub params: DVector<f64>,
    /// Final `½‖r‖²`.
    pub cost: f64,
    pub iterations: usize,
}

pub trait LeastSquaresSolver {
    fn minimize(
        &self,
        problem: &dyn LeastSquaresProblem,
        initial: DVector<f64>,
    ) -> Result<LeastSquaresFit, NumericError>;
}
