//! Levenberg–Marquardt on dense normal equations.
//!
//! Each step solves `(JᵀJ + λ·D) δ = −Jᵀr` with `D = diag(JᵀJ)` (floored),
//! raising `λ` tenfold on a rejected step and lowering it on an accepted one.
//!
//! Termination:
//! - `‖Jᵀr‖∞ ≤ gtol`, relative cost reduction `≤ ftol`, or step
//!   `‖δ‖ ≤ xtol·(‖p‖ + xtol)`: converged.
//! - `λ` exceeding `max_lambda`: no descent direction is left, the current
//!   point is stationary and returned as converged.
//! - iteration budget exhausted: [`NumericError::NonConvergence`].
use super::{LeastSquaresFit, LeastSquaresProblem, LeastSquaresSolver};
use crate::error::NumericError;
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LmParams {
    /// Iteration budget; `None` uses `200·(n + 1)` for `n` parameters.
    pub max_iterations: Option<usize>,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    pub initial_lambda: f64,
    pub max_lambda: f64,
}

impl Default for LmParams {
    fn default() -> Self {
        Self {
            max_iterations: None,
            ftol: 1.49e-8,
            xtol: 1.49e-8,
            gtol: 1e-12,
            initial_lambda: 1e-3,
            max_lambda: 1e16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevenbergMarquardt {
    pub params: LmParams,
}

impl LevenbergMarquardt {
    pub fn new(params: LmParams) -> Self {
        Self { params }
    }
}

#[inline]
fn half_norm_sq(r: &DVector<f64>) -> f64 {
    0.5 * r.norm_squared()
}

fn all_finite(v: &DVector<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn forward_difference(
    problem: &dyn LeastSquaresProblem,
    p: &DVector<f64>,
    r0: &DVector<f64>,
) -> DMatrix<f64> {
    let n = p.len();
    let mut jac = DMatrix::<f64>::zeros(r0.len(), n);
    let eps = f64::EPSILON.sqrt();
    for j in 0..n {
        let h = eps * p[j].abs().max(1.0);
        let mut shifted = p.clone();
        shifted[j] += h;
        let r1 = problem.residuals(&shifted);
        jac.set_column(j, &((r1 - r0) / h));
    }
    jac
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn minimize(
        &self,
        problem: &dyn LeastSquaresProblem,
        initial: DVector<f64>,
    ) -> Result<LeastSquaresFit, NumericError> {
        let n = problem.num_params();
        if n == 0 || initial.len() != n {
            return Err(NumericError::EmptyInput);
        }
        let cfg = &self.params;
        let max_iterations = cfg.max_iterations.unwrap_or(200 * (n + 1));

        let mut p = initial;
        let mut r = problem.residuals(&p);
        if r.is_empty() {
            return Err(NumericError::EmptyInput);
        }
        if !all_finite(&p) || !all_finite(&r) {
            return Err(NumericError::NonFinite);
        }
        let mut cost = half_norm_sq(&r);
        let mut lambda = cfg.initial_lambda;

        for iteration in 0..max_iterations {
            let jac = problem
                .jacobian(&p)
                .unwrap_or_else(|| forward_difference(problem, &p, &r));
            let jt = jac.transpose();
            let grad = &jt * &r;
            if !all_finite(&grad) {
                return Err(NumericError::NonFinite);
            }
            if grad.amax() <= cfg.gtol {
                return Ok(LeastSquaresFit {
                    params: p,
                    cost,
                    iterations: iteration,
                });
            }
            let normal = &jt * &jac;

            loop {
                let mut damped = normal.clone();
                for i in 0..n {
                    damped[(i, i)] += lambda * normal[(i, i)].max(1e-12);
                }
                let step = damped
                    .clone()
                    .cholesky()
                    .map(|c| c.solve(&(-&grad)))
                    .or_else(|| damped.lu().solve(&(-&grad)));

                let Some(step) = step.filter(all_finite) else {
                    lambda *= 10.0;
                    if lambda > cfg.max_lambda {
                        return Ok(LeastSquaresFit {
                            params: p,
                            cost,
                            iterations: iteration,
                        });
                    }
                    continue;
                };

                if step.norm() <= cfg.xtol * (p.norm() + cfg.xtol) {
                    return Ok(LeastSquaresFit {
                        params: p,
                        cost,
                        iterations: iteration,
                    });
                }

                let candidate = &p + &step;
                let r_new = problem.residuals(&candidate);
                let cost_new = half_norm_sq(&r_new);
                if all_finite(&r_new) && cost_new < cost {
                    let reduction = (cost - cost_new) / cost.max(f64::MIN_POSITIVE);
                    p = candidate;
                    r = r_new;
                    cost = cost_new;
                    lambda = (lambda / 10.0).max(1e-15);
                    if reduction <= cfg.ftol {
                        return Ok(LeastSquaresFit {
                            params: p,
                            cost,
                            iterations: iteration + 1,
                        });
                    }
                    break;
                }

                lambda *= 10.0;
                if lambda > cfg.max_lambda {
                    return Ok(LeastSquaresFit {
                        params: p,
                        cost,
                        iterations: iteration,
                    });
                }
            }
        }

        log::warn!("levenberg-marquardt: budget of {max_iterations} iterations exhausted (cost {cost:.3e})");
        Err(NumericError::NonConvergence {
            iterations: max_iterations,
            cost,
        })
    }
}
