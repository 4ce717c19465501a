//! Latin hypercube sampling followed by a Nelder-Mead simplex search.
//!
//! Candidates outside the box are clamped onto it before evaluation. Failed
//! evaluations are fed to the simplex as `f64::MAX`.

use std::cell::RefCell;

use argmin::core::{CostFunction, Executor, State};
use argmin::solver::neldermead::NelderMead;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::blackbox::{BlackboxOptimizer, BlackboxProblem, BlackboxResult, EvalOutcome};
use crate::error::CalibrateError;

/// Two-phase bound-constrained minimizer.
///
/// 1. Evaluate `x0`.
/// 2. Spend `lhs_fraction` of the budget on a seeded Latin hypercube over
///    the free parameters.
/// 3. Run Nelder-Mead from the best point so far until the budget is spent
///    or the simplex collapses.
///
/// # Example
///
/// ```
/// use catdist_calibrate::{
///     BlackboxOptimizer, BlackboxProblem, CalibrateError, EvalOutcome, HybridSearch,
/// };
///
/// let f = |x: &[f64]| -> Result<EvalOutcome, CalibrateError> {
///     Ok(EvalOutcome::Success((x[0] - 0.3).powi(2)))
/// };
/// let problem = BlackboxProblem::new(&f, vec![1.0], vec![0.0], vec![1.0])
///     .unwrap()
///     .with_budget(60);
/// let result = HybridSearch::default().minimize(&problem).unwrap();
/// assert!((result.best[0] - 0.3).abs() < 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HybridSearch {
    lhs_fraction: f64,
    initial_step: f64,
    sd_tolerance: f64,
}

impl HybridSearch {
    /// Creates a search spending `lhs_fraction` of the budget on sampling.
    ///
    /// Defaults: `initial_step = 0.25` of each parameter range,
    /// `sd_tolerance = 1e-8`.
    pub fn new(lhs_fraction: f64) -> Self {
        Self {
            lhs_fraction: lhs_fraction.clamp(0.0, 1.0),
            initial_step: 0.25,
            sd_tolerance: 1e-8,
        }
    }

    /// Sets the initial simplex edge as a fraction of each parameter range.
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }

    /// Sets the simplex standard-deviation stopping tolerance.
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Returns the sampling share of the budget.
    pub fn lhs_fraction(&self) -> f64 {
        self.lhs_fraction
    }
}

impl Default for HybridSearch {
    fn default() -> Self {
        Self::new(0.33)
    }
}

impl BlackboxOptimizer for HybridSearch {
    #[tracing::instrument(skip_all, fields(dim = problem.dim(), budget = problem.budget()))]
    fn minimize(&self, problem: &BlackboxProblem<'_>) -> Result<BlackboxResult, CalibrateError> {
        let tracker = Tracker::new(problem);
        tracker.evaluate(problem.x0().to_vec());

        let free = tracker.free.clone();
        if free.is_empty() {
            return tracker.finish();
        }
        let lower: Vec<f64> = free.iter().map(|&i| problem.lower()[i]).collect();
        let upper: Vec<f64> = free.iter().map(|&i| problem.upper()[i]).collect();

        // 1. Space-filling phase
        let n_lhs = ((problem.budget() as f64 * self.lhs_fraction) as usize).min(tracker.remaining());
        let mut rng = StdRng::seed_from_u64(problem.seed());
        for sample in latin_hypercube(n_lhs, &lower, &upper, &mut rng) {
            if let Step::Stop = tracker.evaluate(tracker.full_point(&sample)) {
                break;
            }
        }
        debug!(samples = n_lhs, best = ?tracker.best_value(), "latin hypercube done");

        // 2. Local simplex phase
        let remaining = tracker.remaining();
        if remaining > free.len() {
            let start = tracker.best_free_coords();
            let simplex = initial_simplex(&start, &lower, &upper, self.initial_step);
            let solver = NelderMead::new(simplex)
                .with_sd_tolerance(self.sd_tolerance)
                .map_err(|e| CalibrateError::OptimizationFailed {
                    reason: e.to_string(),
                })?;
            let cost = SimplexCost { tracker: &tracker };
            match Executor::new(cost, solver)
                .configure(|state| state.max_iters(remaining as u64))
                .run()
            {
                Ok(result) => debug!(iterations = result.state().get_iter(), "simplex converged"),
                Err(e) => debug!(error = %e, "simplex stopped"),
            }
        }

        tracker.finish()
    }
}

/// Outcome of a tracked evaluation.
enum Step {
    Value(f64),
    Failed,
    /// Budget exhausted or the objective aborted the run.
    Stop,
}

#[derive(Default)]
struct TrackerState {
    evaluations: usize,
    failed: usize,
    best: Option<(Vec<f64>, f64)>,
    fatal: Option<CalibrateError>,
}

/// Counts evaluations, enforces the budget and keeps the best point.
struct Tracker<'p, 'a> {
    problem: &'p BlackboxProblem<'a>,
    free: Vec<usize>,
    state: RefCell<TrackerState>,
}

impl<'p, 'a> Tracker<'p, 'a> {
    fn new(problem: &'p BlackboxProblem<'a>) -> Self {
        Self {
            problem,
            free: problem.free_indices(),
            state: RefCell::new(TrackerState::default()),
        }
    }

    fn remaining(&self) -> usize {
        let state = self.state.borrow();
        if state.fatal.is_some() {
            return 0;
        }
        self.problem.budget().saturating_sub(state.evaluations)
    }

    fn best_value(&self) -> Option<f64> {
        self.state.borrow().best.as_ref().map(|(_, v)| *v)
    }

    /// Free coordinates of the best point, or of `x0` if nothing succeeded.
    fn best_free_coords(&self) -> Vec<f64> {
        let state = self.state.borrow();
        let x = state
            .best
            .as_ref()
            .map_or(self.problem.x0(), |(x, _)| x.as_slice());
        self.free.iter().map(|&i| x[i]).collect()
    }

    /// Expands free coordinates into a full, clamped parameter vector.
    fn full_point(&self, free_x: &[f64]) -> Vec<f64> {
        let mut x = self.problem.x0().to_vec();
        for (&i, &v) in self.free.iter().zip(free_x) {
            x[i] = v.clamp(self.problem.lower()[i], self.problem.upper()[i]);
        }
        x
    }

    fn evaluate(&self, x: Vec<f64>) -> Step {
        if self.remaining() == 0 {
            return Step::Stop;
        }
        let outcome = self.problem.evaluate(&x);

        let mut state = self.state.borrow_mut();
        state.evaluations += 1;
        match outcome {
            Ok(EvalOutcome::Success(value)) if value.is_finite() => {
                if state.best.as_ref().is_none_or(|(_, best)| value < *best) {
                    state.best = Some((x, value));
                }
                Step::Value(value)
            }
            Ok(_) => {
                state.failed += 1;
                Step::Failed
            }
            Err(e) => {
                state.fatal = Some(e);
                Step::Stop
            }
        }
    }

    fn finish(self) -> Result<BlackboxResult, CalibrateError> {
        let state = self.state.into_inner();
        if let Some(e) = state.fatal {
            return Err(e);
        }
        match state.best {
            Some((best, best_value)) => Ok(BlackboxResult {
                best,
                best_value,
                evaluations: state.evaluations,
                failed: state.failed,
            }),
            None => Err(CalibrateError::AllEvaluationsFailed {
                evaluations: state.evaluations,
            }),
        }
    }
}

/// Cost function for argmin over the free parameters.
struct SimplexCost<'t, 'p, 'a> {
    tracker: &'t Tracker<'p, 'a>,
}

impl CostFunction for SimplexCost<'_, '_, '_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        match self.tracker.evaluate(self.tracker.full_point(params)) {
            Step::Value(v) => Ok(v),
            Step::Failed => Ok(f64::MAX),
            Step::Stop => Err(argmin::core::Error::msg("evaluation budget exhausted")),
        }
    }
}

/// `n` samples with exactly one sample in each of `n` equal strata per
/// dimension.
fn latin_hypercube(n: usize, lower: &[f64], upper: &[f64], rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut samples = vec![vec![0.0; lower.len()]; n];
    for (d, (&lo, &hi)) in lower.iter().zip(upper).enumerate() {
        let mut strata: Vec<usize> = (0..n).collect();
        strata.shuffle(rng);
        let width = (hi - lo) / n as f64;
        for (sample, &stratum) in samples.iter_mut().zip(&strata) {
            let u: f64 = rng.random();
            sample[d] = lo + (stratum as f64 + u) * width;
        }
    }
    samples
}

fn initial_simplex(start: &[f64], lower: &[f64], upper: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        let h = step * (upper[i] - lower[i]);
        // Step inward when the start sits on the upper face.
        vertex[i] = if start[i] + h <= upper[i] {
            start[i] + h
        } else {
            start[i] - h
        };
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Outcome = Result<EvalOutcome, CalibrateError>;

    fn sphere(x: &[f64]) -> Outcome {
        Ok(EvalOutcome::Success(x.iter().map(|v| v * v).sum()))
    }

    #[test]
    fn minimizes_sphere() {
        let f = sphere;
        let problem = BlackboxProblem::new(&f, vec![0.9; 3], vec![-1.0; 3], vec![1.0; 3])
            .unwrap()
            .with_budget(400)
            .with_seed(3);
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert!(result.best_value < 1e-2, "best = {}", result.best_value);
        assert_eq!(result.failed, 0);
    }

    #[test]
    fn respects_budget() {
        let calls = Cell::new(0usize);
        let f = |x: &[f64]| {
            calls.set(calls.get() + 1);
            sphere(x)
        };
        let problem = BlackboxProblem::new(&f, vec![0.5; 4], vec![-1.0; 4], vec![1.0; 4])
            .unwrap()
            .with_budget(37);
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert!(calls.get() <= 37);
        assert_eq!(result.evaluations, calls.get());
    }

    #[test]
    fn fixed_parameters_stay_put() {
        let f = sphere;
        let problem = BlackboxProblem::new(&f, vec![0.8, 0.6], vec![-1.0; 2], vec![1.0; 2])
            .unwrap()
            .with_fixed(vec![true, false])
            .unwrap()
            .with_budget(80);
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert_eq!(result.best[0], 0.8);
        assert!(result.best[1].abs() < 0.1, "best = {:?}", result.best);
    }

    #[test]
    fn candidates_stay_in_bounds() {
        let f = |x: &[f64]| -> Outcome {
            assert!(x.iter().all(|v| (0.0..=1.0).contains(v)), "{x:?}");
            Ok(EvalOutcome::Success(-x[0] - x[1]))
        };
        let problem = BlackboxProblem::new(&f, vec![0.5; 2], vec![0.0; 2], vec![1.0; 2])
            .unwrap()
            .with_budget(100);
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert!(result.best_value < -1.5);
    }

    #[test]
    fn failed_region_never_selected() {
        let f = |x: &[f64]| -> Outcome {
            if x[0] < 0.0 {
                Ok(EvalOutcome::Failed)
            } else {
                Ok(EvalOutcome::Success(x[0] * x[0] + 1.0))
            }
        };
        let problem = BlackboxProblem::new(&f, vec![0.5], vec![-1.0], vec![1.0])
            .unwrap()
            .with_budget(60);
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert!(result.best[0] >= 0.0);
        assert!(result.failed > 0);
    }

    #[test]
    fn all_failed_is_an_error() {
        let f = |_: &[f64]| -> Outcome { Ok(EvalOutcome::Failed) };
        let problem = BlackboxProblem::new(&f, vec![0.0], vec![-1.0], vec![1.0])
            .unwrap()
            .with_budget(10);
        let err = HybridSearch::default().minimize(&problem).unwrap_err();
        // The simplex collapses immediately on a flat failure surface.
        assert!(matches!(
            err,
            CalibrateError::AllEvaluationsFailed { evaluations } if evaluations <= 10
        ));
    }

    #[test]
    fn fatal_error_aborts() {
        let calls = Cell::new(0usize);
        let f = |x: &[f64]| -> Outcome {
            calls.set(calls.get() + 1);
            if calls.get() == 5 {
                Err(CalibrateError::InvalidFolds { k: 9, n: 1 })
            } else {
                sphere(x)
            }
        };
        let problem = BlackboxProblem::new(&f, vec![0.3; 2], vec![-1.0; 2], vec![1.0; 2])
            .unwrap()
            .with_budget(50);
        let err = HybridSearch::default().minimize(&problem).unwrap_err();
        assert_eq!(err, CalibrateError::InvalidFolds { k: 9, n: 1 });
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn same_seed_same_result() {
        let f = |x: &[f64]| -> Outcome {
            Ok(EvalOutcome::Success((x[0] - 0.2).powi(2) + (x[1] + 0.4).abs()))
        };
        let run = |seed| {
            let problem = BlackboxProblem::new(&f, vec![0.0; 2], vec![-1.0; 2], vec![1.0; 2])
                .unwrap()
                .with_budget(90)
                .with_seed(seed);
            HybridSearch::default().minimize(&problem).unwrap()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn nothing_free_evaluates_x0_once() {
        let f = sphere;
        let problem = BlackboxProblem::new(&f, vec![0.5], vec![0.0], vec![1.0])
            .unwrap()
            .with_fixed(vec![true])
            .unwrap();
        let result = HybridSearch::default().minimize(&problem).unwrap();
        assert_eq!(result.evaluations, 1);
        assert_eq!(result.best, vec![0.5]);
    }

    #[test]
    fn lhs_one_sample_per_stratum() {
        let mut rng = StdRng::seed_from_u64(0);
        let samples = latin_hypercube(5, &[0.0, 10.0], &[1.0, 20.0], &mut rng);
        for d in 0..2 {
            let (lo, width) = if d == 0 { (0.0, 0.2) } else { (10.0, 2.0) };
            let mut strata: Vec<usize> = samples
                .iter()
                .map(|s| ((s[d] - lo) / width).floor() as usize)
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn simplex_steps_inward_at_upper_face() {
        let simplex = initial_simplex(&[1.0, 0.0], &[0.0, 0.0], &[1.0, 1.0], 0.25);
        assert_eq!(simplex, vec![vec![1.0, 0.0], vec![0.75, 0.0], vec![1.0, 0.25]]);
    }
}
