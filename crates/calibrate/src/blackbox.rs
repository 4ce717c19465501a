//! Contract between the calibration objective and a derivative-free
//! optimizer.
//!
//! The optimizer sees a callback, box bounds, a fixed-parameter mask, an
//! evaluation budget and a seed. It knows nothing about metrics or folds.

use crate::error::CalibrateError;

/// Result of one objective evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalOutcome {
    /// The candidate was evaluated.
    Success(f64),
    /// The candidate was inadmissible; it must never be selected as the best.
    Failed,
}

impl EvalOutcome {
    /// Returns the objective value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            EvalOutcome::Success(v) => Some(v),
            EvalOutcome::Failed => None,
        }
    }
}

/// Objective callback. `Err` aborts the whole run.
pub type Objective<'a> = dyn Fn(&[f64]) -> Result<EvalOutcome, CalibrateError> + 'a;

/// A bound-constrained minimization problem.
pub struct BlackboxProblem<'a> {
    objective: &'a Objective<'a>,
    x0: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    fixed: Vec<bool>,
    budget: usize,
    seed: u64,
}

impl std::fmt::Debug for BlackboxProblem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlackboxProblem")
            .field("dim", &self.x0.len())
            .field("free", &self.free_indices().len())
            .field("budget", &self.budget)
            .field("seed", &self.seed)
            .finish()
    }
}

impl<'a> BlackboxProblem<'a> {
    /// Creates a problem starting from `x0` inside `[lower, upper]`.
    ///
    /// Defaults: nothing fixed, `budget = 100`, `seed = 0`. `x0` is clamped
    /// into the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrateError::ProblemShape`] if the bound vectors do not
    /// match `x0` in length, or [`CalibrateError::InvalidBounds`] if a lower
    /// bound exceeds its upper bound.
    pub fn new(
        objective: &'a Objective<'a>,
        x0: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self, CalibrateError> {
        for (what, v) in [("lower bounds", &lower), ("upper bounds", &upper)] {
            if v.len() != x0.len() {
                return Err(CalibrateError::ProblemShape {
                    what,
                    expected: x0.len(),
                    got: v.len(),
                });
            }
        }
        if let Some(index) = lower
            .iter()
            .zip(&upper)
            .position(|(lo, hi)| lo.is_nan() || hi.is_nan() || lo > hi)
        {
            return Err(CalibrateError::InvalidBounds {
                index,
                lower: lower[index],
                upper: upper[index],
            });
        }

        let x0 = x0
            .iter()
            .zip(lower.iter().zip(&upper))
            .map(|(&x, (&lo, &hi))| x.clamp(lo, hi))
            .collect::<Vec<_>>();
        let n = x0.len();
        Ok(Self {
            objective,
            x0,
            lower,
            upper,
            fixed: vec![false; n],
            budget: 100,
            seed: 0,
        })
    }

    /// Marks parameters held at their `x0` value.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrateError::ProblemShape`] if `fixed.len()` differs from
    /// the problem dimension.
    pub fn with_fixed(mut self, fixed: Vec<bool>) -> Result<Self, CalibrateError> {
        if fixed.len() != self.x0.len() {
            return Err(CalibrateError::ProblemShape {
                what: "fixed mask",
                expected: self.x0.len(),
                got: fixed.len(),
            });
        }
        self.fixed = fixed;
        Ok(self)
    }

    /// Sets the maximum number of objective evaluations.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Calls the objective.
    pub fn evaluate(&self, x: &[f64]) -> Result<EvalOutcome, CalibrateError> {
        (self.objective)(x)
    }

    /// Problem dimension.
    pub fn dim(&self) -> usize {
        self.x0.len()
    }

    /// Starting point.
    pub fn x0(&self) -> &[f64] {
        &self.x0
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Fixed-parameter mask.
    pub fn fixed(&self) -> &[bool] {
        &self.fixed
    }

    /// Indices of the parameters the optimizer may move. Parameters with
    /// `lower == upper` are treated as fixed.
    pub fn free_indices(&self) -> Vec<usize> {
        (0..self.x0.len())
            .filter(|&i| !self.fixed[i] && self.lower[i] < self.upper[i])
            .collect()
    }

    /// Maximum number of evaluations.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Random seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Best point found by a [`BlackboxOptimizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlackboxResult {
    /// Best parameter vector, full dimension.
    pub best: Vec<f64>,
    /// Objective value at `best`.
    pub best_value: f64,
    /// Number of objective evaluations performed.
    pub evaluations: usize,
    /// Number of those evaluations that failed.
    pub failed: usize,
}

/// A derivative-free bound-constrained minimizer.
///
/// Implementations must not exceed [`BlackboxProblem::budget`] evaluations,
/// must leave the fixed parameters at their `x0` value and must never
/// return a point whose evaluation failed.
pub trait BlackboxOptimizer {
    /// Minimizes the problem's objective.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrateError::AllEvaluationsFailed`] if no evaluation
    /// succeeded, or the objective's own error if it aborted the run.
    fn minimize(&self, problem: &BlackboxProblem<'_>) -> Result<BlackboxResult, CalibrateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(x: &[f64]) -> Result<EvalOutcome, CalibrateError> {
        Ok(EvalOutcome::Success(x.iter().map(|v| v * v).sum()))
    }

    #[test]
    fn x0_is_clamped() {
        let f = sphere;
        let problem = BlackboxProblem::new(&f, vec![2.0, -3.0], vec![-1.0; 2], vec![1.0; 2]).unwrap();
        assert_eq!(problem.x0(), &[1.0, -1.0]);
    }

    #[test]
    fn bound_lengths_checked() {
        let f = sphere;
        let err = BlackboxProblem::new(&f, vec![0.0; 2], vec![0.0; 3], vec![1.0; 2]).unwrap_err();
        assert_eq!(
            err,
            CalibrateError::ProblemShape {
                what: "lower bounds",
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn fixed_and_degenerate_parameters_not_free() {
        let f = sphere;
        let problem = BlackboxProblem::new(
            &f,
            vec![0.0; 4],
            vec![0.0, 0.0, 0.5, 0.0],
            vec![1.0, 1.0, 0.5, 1.0],
        )
        .unwrap()
        .with_fixed(vec![false, true, false, false])
        .unwrap();
        assert_eq!(problem.free_indices(), vec![0, 3]);
    }

    #[test]
    fn crossed_bounds_rejected() {
        let f = sphere;
        let err = BlackboxProblem::new(&f, vec![0.0; 2], vec![0.0, 1.0], vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(err, CalibrateError::InvalidBounds { index: 1, .. }));
    }

    #[test]
    fn fixed_mask_length_checked() {
        let f = sphere;
        let problem = BlackboxProblem::new(&f, vec![0.0; 2], vec![0.0; 2], vec![1.0; 2]).unwrap();
        assert!(problem.with_fixed(vec![true]).is_err());
    }

    #[test]
    fn outcome_value() {
        assert_eq!(EvalOutcome::Success(1.5).value(), Some(1.5));
        assert_eq!(EvalOutcome::Failed.value(), None);
    }
}
