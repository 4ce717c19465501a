//! End-to-end calibration: dataset + config + optimizer → metric parameters.

use catdist_codec::VariableSpec;
use catdist_metric::{MetricParams, ParamLayout};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::blackbox::{BlackboxOptimizer, BlackboxProblem};
use crate::config::CalibrationConfig;
use crate::dataset::Dataset;
use crate::error::CalibrateError;
use crate::objective::CalibrationObjective;

/// Calibrated parameters together with run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    params: MetricParams,
    objective: f64,
    evaluations: usize,
    failed: usize,
    budget: usize,
}

impl CalibrationOutcome {
    /// Best parameter vector found.
    pub fn params(&self) -> &MetricParams {
        &self.params
    }

    /// Consumes the outcome, returning the parameters.
    pub fn into_params(self) -> MetricParams {
        self.params
    }

    /// Mean held-out RMSE at [`params`](Self::params).
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Number of objective evaluations.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Number of failed objective evaluations.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Evaluation budget granted to the optimizer.
    pub fn budget(&self) -> usize {
        self.budget
    }
}

/// Starting parameters: every weight at `1.0`, embedding coordinates drawn
/// uniformly from `[-1, 1]` with `seed`.
pub fn initial_guess(layout: &ParamLayout, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x0 = vec![1.0; layout.n_variables()];
    x0.extend((0..layout.embedding_range().len()).map(|_| rng.random_range(-1.0..=1.0)));
    x0
}

/// Parameters held fixed during the search: the integer and continuous
/// weights when `fix_quantitative_weights` is set.
pub fn fixed_mask(layout: &ParamLayout, fix_quantitative_weights: bool) -> Vec<bool> {
    let mut fixed = vec![false; layout.len()];
    if fix_quantitative_weights {
        for i in layout.quantitative_weight_range() {
            fixed[i] = true;
        }
    }
    fixed
}

/// Calibrates the metric selected by `config.variant()` on `dataset`.
///
/// The fold permutation, the initial embedding and the optimizer each get
/// their own seed derived from `config.seed()`.
///
/// # Errors
///
/// Configuration and data errors from
/// [`CalibrationObjective::new`], and any error returned by the optimizer.
#[tracing::instrument(skip_all, fields(n = dataset.len(), variant = ?config.variant()))]
pub fn calibrate<O: BlackboxOptimizer + ?Sized>(
    dataset: &Dataset,
    spec: &VariableSpec,
    config: &CalibrationConfig,
    optimizer: &O,
) -> Result<CalibrationOutcome, CalibrateError> {
    let layout = ParamLayout::new(spec, config.variant());
    let objective = CalibrationObjective::new(dataset, layout.clone(), config)?;

    let seed = config.seed();
    let budget = config.budget(layout.len());
    let f = |x: &[f64]| objective.evaluate_outcome(x);
    let problem = BlackboxProblem::new(
        &f,
        initial_guess(&layout, seed.wrapping_add(1)),
        layout.lower_bounds(),
        layout.upper_bounds(),
    )?
    .with_fixed(fixed_mask(&layout, config.fix_quantitative_weights()))?
    .with_budget(budget)
    .with_seed(seed.wrapping_add(2));

    info!(
        params = layout.len(),
        free = problem.free_indices().len(),
        budget,
        "starting calibration"
    );
    let result = optimizer.minimize(&problem)?;
    info!(
        objective = result.best_value,
        evaluations = result.evaluations,
        failed = result.failed,
        "calibration finished"
    );

    Ok(CalibrationOutcome {
        params: MetricParams::new(layout, result.best)?,
        objective: result.best_value,
        evaluations: result.evaluations,
        failed: result.failed,
        budget,
    })
}

/// Returns `true` once `n_evaluations` reaches `stop_fraction` of
/// `budget_per_variable × n_variables`, the point past which the host
/// optimizer stops requesting recalibration.
///
/// A zero total budget counts as reached.
///
/// # Example
///
/// ```
/// use catdist_calibrate::recalibration_budget_reached;
///
/// assert!(!recalibration_budget_reached(19, 100, 1, 0.2));
/// assert!(recalibration_budget_reached(20, 100, 1, 0.2));
/// ```
pub fn recalibration_budget_reached(
    n_evaluations: usize,
    budget_per_variable: usize,
    n_variables: usize,
    stop_fraction: f64,
) -> bool {
    let total = budget_per_variable.saturating_mul(n_variables);
    if total == 0 {
        return true;
    }
    n_evaluations as f64 / total as f64 >= stop_fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::HybridSearch;
    use crate::TrainingSet;
    use catdist_codec::VarKind;
    use catdist_metric::Variant;

    fn spec() -> VariableSpec {
        VariableSpec::new(vec![
            VarKind::Categorical { levels: 3 },
            VarKind::Integer {
                lower: 0.0,
                upper: 4.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn initial_guess_layout() {
        let layout = ParamLayout::new(&spec(), Variant::Embedding);
        let x0 = initial_guess(&layout, 5);
        assert_eq!(x0.len(), 8);
        assert_eq!(&x0[..2], &[1.0, 1.0]);
        assert!(x0[2..].iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(x0, initial_guess(&layout, 5));
    }

    #[test]
    fn fixed_mask_pins_quantitative_weights() {
        let layout = ParamLayout::new(&spec(), Variant::Embedding);
        let mask = fixed_mask(&layout, true);
        assert_eq!(mask, vec![false, true, false, false, false, false, false, false]);
        assert!(fixed_mask(&layout, false).iter().all(|f| !f));
    }

    #[test]
    fn threshold_boundaries() {
        assert!(!recalibration_budget_reached(0, 50, 4, 0.2));
        assert!(recalibration_budget_reached(40, 50, 4, 0.2));
        assert!(recalibration_budget_reached(3, 0, 4, 0.2));
    }

    #[test]
    fn calibrate_small_problem() {
        // Level 2 behaves like level 0; level 1 is far off.
        let training: TrainingSet = (0..15)
            .map(|i| {
                let level = i % 3;
                let int = (i / 3) as f64;
                let y = if level == 1 { 10.0 } else { 0.0 } + int;
                (vec![level as f64, int], y)
            })
            .collect();
        let data = Dataset::from_training(&training, &spec()).unwrap();
        let config = CalibrationConfig::new(Variant::Embedding)
            .with_budget_per_param(10)
            .with_seed(1);
        let outcome = calibrate(&data, &spec(), &config, &HybridSearch::default()).unwrap();

        assert_eq!(outcome.budget(), 80);
        assert!(outcome.evaluations() <= 80);
        assert_eq!(outcome.params().values().len(), 8);
        // Fixed integer weight stays at its initial value.
        assert_eq!(outcome.params().weights()[1], 1.0);
        assert!(outcome.objective().is_finite());
    }
}
