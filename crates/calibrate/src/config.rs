//! Configuration for a calibration run.

use catdist_metric::Variant;

use crate::error::CalibrateError;

/// Configuration for [`calibrate`](crate::calibrate).
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use catdist_calibrate::CalibrationConfig;
/// use catdist_metric::Variant;
///
/// let config = CalibrationConfig::new(Variant::Embedding)
///     .with_folds(5)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    /// Which metric family to calibrate.
    variant: Variant,
    /// Number of cross-validation folds.
    folds: usize,
    /// Exponent of the weighted distance.
    p: f64,
    /// Seed for fold assignment, initial guess and search.
    seed: u64,
    /// Evaluations granted per metric parameter.
    budget_per_param: usize,
    /// Share of the budget spent on Latin hypercube sampling.
    lhs_fraction: f64,
    /// Keep integer and continuous weights at their initial value.
    fix_quantitative_weights: bool,
}

impl CalibrationConfig {
    /// Creates a configuration for `variant`.
    ///
    /// Defaults: `folds = 3`, `p = 2`, `seed = 0`, `budget_per_param = 50`,
    /// `lhs_fraction = 0.33`, `fix_quantitative_weights = true`.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            folds: 3,
            p: 2.0,
            seed: 0,
            budget_per_param: 50,
            lhs_fraction: 0.33,
            fix_quantitative_weights: true,
        }
    }

    /// Sets the number of folds.
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Sets the distance exponent.
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of evaluations per parameter.
    pub fn with_budget_per_param(mut self, budget_per_param: usize) -> Self {
        self.budget_per_param = budget_per_param;
        self
    }

    /// Sets the share of the budget spent on the space-filling phase.
    pub fn with_lhs_fraction(mut self, lhs_fraction: f64) -> Self {
        self.lhs_fraction = lhs_fraction;
        self
    }

    /// Sets whether integer and continuous weights are held fixed.
    pub fn with_fix_quantitative_weights(mut self, fix: bool) -> Self {
        self.fix_quantitative_weights = fix;
        self
    }

    /// Returns the metric variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the number of folds.
    pub fn folds(&self) -> usize {
        self.folds
    }

    /// Returns the distance exponent.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Returns the random seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of evaluations per parameter.
    pub fn budget_per_param(&self) -> usize {
        self.budget_per_param
    }

    /// Returns the share of the budget spent on the space-filling phase.
    pub fn lhs_fraction(&self) -> f64 {
        self.lhs_fraction
    }

    /// Returns whether integer and continuous weights are held fixed.
    pub fn fix_quantitative_weights(&self) -> bool {
        self.fix_quantitative_weights
    }

    /// Total evaluation budget for `n_params` parameters.
    pub fn budget(&self, n_params: usize) -> usize {
        self.budget_per_param.saturating_mul(n_params)
    }

    /// Validates this configuration.
    ///
    /// Requires `folds >= 2`, a finite positive `p`, `budget_per_param >= 1`
    /// and `lhs_fraction` in `[0, 1)`.
    pub fn validate(&self) -> Result<(), CalibrateError> {
        if self.folds < 2 {
            return Err(CalibrateError::InvalidConfig {
                field: "folds",
                value: self.folds.to_string(),
            });
        }
        if !self.p.is_finite() || self.p <= 0.0 {
            return Err(CalibrateError::InvalidConfig {
                field: "p",
                value: self.p.to_string(),
            });
        }
        if self.budget_per_param < 1 {
            return Err(CalibrateError::InvalidConfig {
                field: "budget_per_param",
                value: self.budget_per_param.to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.lhs_fraction) {
            return Err(CalibrateError::InvalidConfig {
                field: "lhs_fraction",
                value: self.lhs_fraction.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self::new(Variant::Embedding)
    }
}
