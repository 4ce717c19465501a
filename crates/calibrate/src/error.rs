//! Error types for the catdist-calibrate crate.

use catdist_codec::CodecError;
use catdist_idw::IdwError;
use catdist_metric::MetricError;

/// Error type for all fallible operations in the catdist-calibrate crate.
///
/// Errors fall in two classes, see
/// [`is_evaluation_failure`](CalibrateError::is_evaluation_failure): those
/// caused by one inadmissible candidate parameter vector, which the
/// optimizer records as a failed evaluation, and configuration or data
/// errors, which abort the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrateError {
    /// Returned when the fold count is zero.
    #[error("cannot split {n} points into {k} folds")]
    InvalidFolds {
        /// Requested fold count.
        k: usize,
        /// Number of points.
        n: usize,
    },

    /// Returned when a calibration configuration field is out of range.
    #[error("invalid calibration config: {field} = {value}")]
    InvalidConfig {
        /// Name of the field.
        field: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// Returned when too few usable evaluations are available.
    #[error("insufficient data: got {n} usable evaluations, need at least {min}")]
    InsufficientData {
        /// Number of usable evaluations.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when an observed point does not fit the variable specification.
    #[error("training point {index}: {source}")]
    MalformedPoint {
        /// Index of the point in the training set.
        index: usize,
        /// Underlying codec failure.
        source: CodecError,
    },

    /// Returned when integer or continuous bounds cannot be normalized.
    #[error("{kind} bounds: {source}")]
    Bounds {
        /// `"integer"` or `"continuous"`.
        kind: &'static str,
        /// Underlying codec failure.
        source: CodecError,
    },

    /// Returned when a fold's surrogate cannot be evaluated.
    #[error("fold {fold}: {source}")]
    Fold {
        /// Fold index.
        fold: usize,
        /// Underlying predictor failure.
        source: IdwError,
    },

    /// Returned when the averaged RMSE is NaN or infinite.
    #[error("non-finite calibration objective {value}")]
    NonFiniteObjective {
        /// The offending value.
        value: f64,
    },

    /// Returned when blackbox problem vectors do not align.
    #[error("blackbox problem {what}: expected {expected} entries, got {got}")]
    ProblemShape {
        /// Name of the mismatching vector.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a blackbox lower bound exceeds its upper bound.
    #[error("parameter {index}: lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds {
        /// Parameter index.
        index: usize,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// Returned when every evaluation in the budget failed.
    #[error("all {evaluations} evaluations failed")]
    AllEvaluationsFailed {
        /// Number of evaluations attempted.
        evaluations: usize,
    },

    /// Returned when the optimizer cannot be set up.
    #[error("optimisation failed: {reason}")]
    OptimizationFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Wraps a metric construction failure.
    #[error(transparent)]
    Metric(#[from] MetricError),
}

impl CalibrateError {
    /// Returns `true` when the error stems from one candidate parameter
    /// vector and should be reported to the optimizer as a failed
    /// evaluation instead of aborting the run.
    ///
    /// Inadmissible weights or embedding coordinates and non-finite
    /// predictions or objective values qualify. Shape mismatches, invalid
    /// exponents and data errors do not.
    pub fn is_evaluation_failure(&self) -> bool {
        match self {
            CalibrateError::Metric(e) => is_candidate_metric_error(e),
            CalibrateError::Fold { source, .. } => match source {
                IdwError::NonFinitePrediction { .. } => true,
                IdwError::Metric(e) => is_candidate_metric_error(e),
                _ => false,
            },
            CalibrateError::NonFiniteObjective { .. } => true,
            _ => false,
        }
    }
}

fn is_candidate_metric_error(e: &MetricError) -> bool {
    matches!(
        e,
        MetricError::InvalidWeight { .. } | MetricError::NonFiniteEmbedding { .. }
    )
}
