//! Error types for the catdist-neighbors crate.

use catdist_codec::CodecError;
use catdist_metric::MetricError;

/// Error type for all fallible operations in the catdist-neighbors crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeighborError {
    /// Returned when more neighbors are requested than there are other
    /// combinations.
    #[error("requested {requested} neighbors but only {available} other combinations exist")]
    InsufficientCandidates {
        /// Requested neighbor count.
        requested: usize,
        /// Number of combinations excluding the current one.
        available: usize,
    },

    /// Returned when a direction does not have one entry per variable.
    #[error("direction has {got} entries, expected {expected}")]
    DimensionMismatch {
        /// Number of variables.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Wraps a point split or reassembly failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Wraps an encoding or distance failure.
    #[error(transparent)]
    Metric(#[from] MetricError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_candidates() {
        let e = NeighborError::InsufficientCandidates {
            requested: 4,
            available: 3,
        };
        assert_eq!(
            e.to_string(),
            "requested 4 neighbors but only 3 other combinations exist"
        );
    }

    #[test]
    fn error_dimension_mismatch() {
        let e = NeighborError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(e.to_string(), "direction has 2 entries, expected 3");
    }

    #[test]
    fn error_codec_is_transparent() {
        let inner = CodecError::TooManyCombinations;
        let e = NeighborError::from(inner.clone());
        assert_eq!(e.to_string(), inner.to_string());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<NeighborError>();
    }
}
