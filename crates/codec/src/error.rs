//! Error types for the catdist-codec crate.

/// Error type for all fallible operations in the catdist-codec crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// Returned when a point has the wrong number of slots, or a
    /// categorical slot holds a value that is not a valid level index.
    #[error("malformed point at slot {slot}: {reason}")]
    MalformedPoint {
        /// Index of the offending slot in the variable specification.
        slot: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a normalization dimension has `upper == lower`.
    #[error("degenerate bounds in dimension {dim}: lower = upper = {bound}")]
    DegenerateBounds {
        /// Index of the dimension within the normalized sub-vector.
        dim: usize,
        /// The shared bound value.
        bound: f64,
    },

    /// Returned when a variable slot is declared with `lower > upper` or
    /// non-finite bounds.
    #[error("invalid bounds for slot {slot}: lower {lower}, upper {upper}")]
    InvalidBounds {
        /// Index of the offending slot.
        slot: usize,
        /// Declared lower bound.
        lower: f64,
        /// Declared upper bound.
        upper: f64,
    },

    /// Returned when a categorical slot is declared with zero levels.
    #[error("categorical slot {slot} must have at least one level")]
    EmptyCategorical {
        /// Index of the offending slot.
        slot: usize,
    },

    /// Returned when two slices that must align have different lengths.
    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        /// Name of the input being compared.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a categorical level lies outside its variable's range
    /// during encoding.
    #[error("level {level} out of range for categorical variable {var} with {levels} levels")]
    LevelOutOfRange {
        /// Categorical variable index (not slot index).
        var: usize,
        /// Offending level.
        level: usize,
        /// Number of levels of the variable.
        levels: usize,
    },

    /// Returned when enumerating every categorical combination would
    /// exceed the enumeration limit.
    #[error("too many categorical combinations to enumerate")]
    TooManyCombinations,
}
