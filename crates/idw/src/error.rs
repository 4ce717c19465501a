//! Error types for the catdist-idw crate.

use catdist_metric::MetricError;

/// Error type for all fallible operations in the catdist-idw crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdwError {
    /// Returned when predicting from an empty training set.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// Returned when computing RMSE over an empty test set.
    #[error("test set is empty")]
    EmptyTestSet,

    /// Returned when point and response collections have different lengths.
    #[error("{what}: {points} points but {values} values")]
    LengthMismatch {
        /// Which collection is inconsistent.
        what: &'static str,
        /// Number of points.
        points: usize,
        /// Number of response values.
        values: usize,
    },

    /// Returned when a prediction is NaN or infinite.
    #[error("non-finite prediction for query {query}")]
    NonFinitePrediction {
        /// Index of the query within the test set (0 for single predictions).
        query: usize,
    },

    /// Wraps a distance computation failure.
    #[error(transparent)]
    Metric(#[from] MetricError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(IdwError::EmptyTrainingSet.to_string(), "training set is empty");
        assert_eq!(IdwError::EmptyTestSet.to_string(), "test set is empty");
        assert_eq!(
            IdwError::LengthMismatch {
                what: "training set",
                points: 3,
                values: 2
            }
            .to_string(),
            "training set: 3 points but 2 values"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<IdwError>();
    }
}
