//! Periodic offset regression.
//!
//! Fits `(m, b)` so that every observed line position `x` lies close to some
//! grid line `b + k·m`, without knowing `k`. The residual is the wrapped
//! distance `min(f, 1 − f)` with `f = frac((x − b) / m)`.
use crate::error::GeometryError;
use crate::solver::{LeastSquaresProblem, LeastSquaresSolver};
use crate::types::{Axis, AxisModel};
use nalgebra::{DMatrix, DVector};

struct PeriodicResidual<'a> {
    xs: &'a [f64],
}

impl PeriodicResidual<'_> {
    #[inline]
    fn phase(x: f64, m: f64, b: f64) -> f64 {
        ((x - b) / m).rem_euclid(1.0)
    }
}

impl LeastSquaresProblem for PeriodicResidual<'_> {
    fn num_params(&self) -> usize {
        2
    }

    fn residuals(&self, p: &DVector<f64>) -> DVector<f64> {
        let (m, b) = (p[0], p[1]);
        DVector::from_iterator(
            self.xs.len(),
            self.xs.iter().map(|&x| {
                let f = Self::phase(x, m, b);
                f.min(1.0 - f)
            }),
        )
    }

    fn jacobian(&self, p: &DVector<f64>) -> Option<DMatrix<f64>> {
        let (m, b) = (p[0], p[1]);
        let mut jac = DMatrix::zeros(self.xs.len(), 2);
        for (i, &x) in self.xs.iter().enumerate() {
            // d/dm of (x - b)/m and d/db, sign flips on the 1 - f branch
            let sign = if Self::phase(x, m, b) < 0.5 { 1.0 } else { -1.0 };
            jac[(i, 0)] = -sign * (x - b) / (m * m);
            jac[(i, 1)] = -sign / m;
        }
        Some(jac)
    }
}

/// Raw `(m, b)` of one least-squares fit over `positions`.
pub fn fit_periodic<S: LeastSquaresSolver + ?Sized>(
    solver: &S,
    positions: &[f64],
    m: f64,
    b: f64,
) -> Result<(f64, f64), GeometryError> {
    let problem = PeriodicResidual { xs: positions };
    let fit = solver.minimize(&problem, DVector::from_vec(vec![m, b]))?;
    Ok((fit.params[0], fit.params[1]))
}

/// Incremental periodic regression over sorted `positions`.
///
/// The first fit uses the `seed_len` smallest positions starting from
/// `(pitch, 0)`; each following fit adds the next position and starts from
/// the previous result. Fewer than `seed_len` positions get a single fit.
/// The result is normalized against `extent`.
pub fn regress_axis<S: LeastSquaresSolver + ?Sized>(
    solver: &S,
    positions: &[f64],
    pitch: f64,
    seed_len: usize,
    extent: usize,
    axis: Axis,
) -> Result<AxisModel, GeometryError> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.is_empty() {
        return Err(GeometryError::GridNotFound);
    }

    let first = seed_len.max(1).min(sorted.len());
    let (mut m, mut b) = (pitch, 0.0);
    for end in first..=sorted.len() {
        (m, b) = fit_periodic(solver, &sorted[..end], m, b)?;
        log::trace!("{axis} regression over {end} lines: m={m:.4} b={b:.4}");
    }

    let model = AxisModel::normalized(m, b, extent)
        .ok_or(GeometryError::DegeneratePitch { axis, pitch: m })?;
    log::debug!(
        "{axis}: m={:.4} b={:.4} count={} from {} lines",
        model.m,
        model.b,
        model.count,
        sorted.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumericError;
    use crate::solver::{LeastSquaresFit, LevenbergMarquardt};

    fn lattice(m: f64, b: f64, n: usize, amp: f64) -> Vec<f64> {
        (0..n)
            .map(|k| {
                let jitter = (((k * 7919) % 13) as f64 / 12.0 - 0.5) * 2.0 * amp;
                b + k as f64 * m + jitter
            })
            .collect()
    }

    #[test]
    fn recovers_offset_and_refines_pitch() {
        let xs = lattice(17.3, 5.2, 30, 0.3);
        let model = regress_axis(&LevenbergMarquardt::default(), &xs, 17.25, 5, 600, Axis::Columns)
            .unwrap();
        assert!((model.m - 17.3).abs() < 0.02, "m={}", model.m);
        assert!((model.b - 5.2).abs() < 0.3, "b={}", model.b);
        assert!(model.m > 0.0 && model.b >= 0.0 && model.b < model.m);
        assert_eq!(model.count, ((600.0 - model.b) / model.m).floor() as usize);
    }

    #[test]
    fn offset_is_normalized_into_pitch() {
        let xs = lattice(23.7, 20.0, 12, 0.0);
        let model =
            regress_axis(&LevenbergMarquardt::default(), &xs, 23.7, 5, 400, Axis::Rows).unwrap();
        assert!(model.b >= 0.0 && model.b < model.m);
        assert!((model.b - 20.0).abs() < 1e-3, "b={}", model.b);
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let xs = lattice(31.0, 11.0, 15, 0.4);
        let lm = LevenbergMarquardt::default();
        let expected = regress_axis(&lm, &xs, 30.5, 5, 500, Axis::Columns).unwrap();

        let mut reversed = xs.clone();
        reversed.reverse();
        assert_eq!(
            regress_axis(&lm, &reversed, 30.5, 5, 500, Axis::Columns).unwrap(),
            expected
        );

        for seed in [1u64, 7, 42, 1234, 0xdead_beef] {
            let mut state = seed;
            let mut shuffled = xs.clone();
            // Fisher-Yates driven by a 64-bit LCG.
            for i in (1..shuffled.len()).rev() {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let j = ((state >> 33) as usize) % (i + 1);
                shuffled.swap(i, j);
            }
            let model = regress_axis(&lm, &shuffled, 30.5, 5, 500, Axis::Columns).unwrap();
            assert_eq!(model, expected, "seed {seed}");
        }
    }

    #[test]
    fn few_lines_get_a_single_fit() {
        let model = regress_axis(
            &LevenbergMarquardt::default(),
            &[19.0, 99.0, 139.0],
            40.0,
            5,
            210,
            Axis::Rows,
        )
        .unwrap();
        assert!((model.m - 40.0).abs() < 1e-6);
        assert!((model.b - 19.0).abs() < 1e-6);
        assert_eq!(model.count, 4);
    }

    struct Collapse;

    impl LeastSquaresSolver for Collapse {
        fn minimize(
            &self,
            _problem: &dyn LeastSquaresProblem,
            _initial: DVector<f64>,
        ) -> Result<LeastSquaresFit, NumericError> {
            Ok(LeastSquaresFit {
                params: DVector::from_vec(vec![-1.0, 0.0]),
                cost: 0.0,
                iterations: 1,
            })
        }
    }

    #[test]
    fn non_positive_pitch_is_degenerate() {
        let err = regress_axis(&Collapse, &[1.0, 2.0, 3.0], 1.0, 5, 10, Axis::Rows).unwrap_err();
        assert_eq!(
            err,
            GeometryError::DegeneratePitch {
                axis: Axis::Rows,
                pitch: -1.0
            }
        );
    }

    #[test]
    fn residual_wraps_around_the_period() {
        let xs = [9.0, 11.0, 30.0];
        let p = PeriodicResidual { xs: &xs };
        let r = p.residuals(&DVector::from_vec(vec![10.0, 0.0]));
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] - 0.1).abs() < 1e-12);
        assert!(r[2].abs() < 1e-12);
    }
}
