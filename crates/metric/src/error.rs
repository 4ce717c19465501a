//! Error types for the catdist-metric crate.

use catdist_codec::CodecError;

/// Error type for all fallible operations in the catdist-metric crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// Returned when compared vectors or the weight vector have
    /// inconsistent lengths.
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the mismatching input.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a weight is negative or non-finite.
    #[error("weight {index} must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Index of the weight in the per-variable weight vector.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when the exponent `p` is not finite and positive.
    #[error("exponent p must be finite and positive, got {p}")]
    InvalidExponent {
        /// The offending exponent.
        p: f64,
    },

    /// Returned when an embedding coordinate is non-finite.
    #[error("embedding coordinate {index} is not finite")]
    NonFiniteEmbedding {
        /// Index within the embedding portion of the parameter vector.
        index: usize,
    },

    /// Wraps an encoding failure from catdist-codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_dimension_mismatch() {
        let e = MetricError::DimensionMismatch {
            what: "weights",
            expected: 4,
            got: 3,
        };
        assert_eq!(
            e.to_string(),
            "dimension mismatch for weights: expected 4, got 3"
        );
    }

    #[test]
    fn error_invalid_weight() {
        let e = MetricError::InvalidWeight {
            index: 2,
            value: -0.5,
        };
        assert_eq!(
            e.to_string(),
            "weight 2 must be finite and non-negative, got -0.5"
        );
    }

    #[test]
    fn error_codec_is_transparent() {
        let e = MetricError::from(CodecError::TooManyCombinations);
        assert_eq!(e.to_string(), "too many categorical combinations to enumerate");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<MetricError>();
    }
}
