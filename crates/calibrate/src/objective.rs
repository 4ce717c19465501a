//! K-fold cross-validated IDW error as a function of metric parameters.

use catdist_idw::IdwPredictor;
use catdist_metric::{CalibratedMetric, MetricParams, ParamLayout};
use tracing::debug;

use crate::blackbox::EvalOutcome;
use crate::config::CalibrationConfig;
use crate::dataset::Dataset;
use crate::error::CalibrateError;
use crate::folds::partition;

/// One cross-validation fold, holding its own train and validation indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldObjective {
    fold: usize,
    train: Vec<usize>,
    valid: Vec<usize>,
}

impl FoldObjective {
    /// Fold index.
    pub fn fold(&self) -> usize {
        self.fold
    }

    /// Training indices into the dataset.
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Validation indices into the dataset.
    pub fn valid(&self) -> &[usize] {
        &self.valid
    }

    /// Held-out RMSE of an IDW surrogate fitted on this fold's training
    /// points.
    ///
    /// `encoded` holds every dataset point encoded under `metric`.
    pub fn rmse(
        &self,
        encoded: &[Vec<f64>],
        responses: &[f64],
        metric: &CalibratedMetric,
    ) -> Result<f64, CalibrateError> {
        let gather_points = |idx: &[usize]| idx.iter().map(|&i| encoded[i].clone()).collect::<Vec<_>>();
        let gather_values = |idx: &[usize]| idx.iter().map(|&i| responses[i]).collect::<Vec<_>>();
        let to_fold_err = |source| CalibrateError::Fold {
            fold: self.fold,
            source,
        };

        let model = IdwPredictor::new(
            gather_points(&self.train[..]),
            gather_values(&self.train[..]),
            metric,
        )
        .map_err(to_fold_err)?;
        model
            .rmse(&gather_points(&self.valid[..]), &gather_values(&self.valid[..]))
            .map_err(to_fold_err)
    }
}

/// Mean held-out RMSE over K precomputed folds.
///
/// The folds are fixed at construction, so [`evaluate`](Self::evaluate) is
/// a pure function of the parameter vector.
#[derive(Debug, Clone)]
pub struct CalibrationObjective<'d> {
    dataset: &'d Dataset,
    layout: ParamLayout,
    p: f64,
    folds: Vec<FoldObjective>,
}

impl<'d> CalibrationObjective<'d> {
    /// Partitions `dataset` into `config.folds()` folds seeded by
    /// `config.seed()`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CalibrateError::InvalidConfig`] | see [`CalibrationConfig::validate`] |
    /// | [`CalibrateError::InsufficientData`] | fewer points than folds |
    #[tracing::instrument(skip_all, fields(n = dataset.len(), k = config.folds()))]
    pub fn new(
        dataset: &'d Dataset,
        layout: ParamLayout,
        config: &CalibrationConfig,
    ) -> Result<Self, CalibrateError> {
        config.validate()?;
        let k = config.folds();
        if dataset.len() < k {
            return Err(CalibrateError::InsufficientData {
                n: dataset.len(),
                min: k,
            });
        }

        let assignment = partition(dataset.len(), k, config.seed())?;
        let folds = (0..k)
            .map(|fold| FoldObjective {
                fold,
                train: assignment.training(fold),
                valid: assignment.validation(fold).to_vec(),
            })
            .collect();
        debug!(sizes = ?assignment.sizes(), "folds assigned");

        Ok(Self {
            dataset,
            layout,
            p: config.p(),
            folds,
        })
    }

    /// Parameter layout the objective expects.
    pub fn layout(&self) -> &ParamLayout {
        &self.layout
    }

    /// The precomputed folds.
    pub fn folds(&self) -> &[FoldObjective] {
        &self.folds
    }

    /// Mean of the per-fold RMSEs for `params`.
    ///
    /// # Errors
    ///
    /// Any error from binding the metric or evaluating a fold, and
    /// [`CalibrateError::NonFiniteObjective`] if the mean is not finite.
    /// [`CalibrateError::is_evaluation_failure`] tells which of them are
    /// specific to `params`.
    pub fn evaluate(&self, params: &[f64]) -> Result<f64, CalibrateError> {
        let params = MetricParams::new(self.layout.clone(), params.to_vec())?;
        let metric = params.bind(self.p)?;
        let encoded = self.dataset.encode_all(&metric)?;
        let responses = self.dataset.responses();

        let mut total = 0.0;
        for fold in &self.folds {
            total += fold.rmse(&encoded, responses, &metric)?;
        }
        let mean = total / self.folds.len() as f64;

        if !mean.is_finite() {
            return Err(CalibrateError::NonFiniteObjective { value: mean });
        }
        Ok(mean)
    }

    /// [`evaluate`](Self::evaluate) with candidate-specific failures mapped to
    /// [`EvalOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Errors for which [`CalibrateError::is_evaluation_failure`] is `false`.
    pub fn evaluate_outcome(&self, params: &[f64]) -> Result<EvalOutcome, CalibrateError> {
        match self.evaluate(params) {
            Ok(value) => Ok(EvalOutcome::Success(value)),
            Err(e) if e.is_evaluation_failure() => {
                debug!(error = %e, "failed evaluation");
                Ok(EvalOutcome::Failed)
            }
            Err(e) => Err(e),
        }
    }
}
