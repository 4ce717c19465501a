//! Unit-interval normalization of integer and continuous sub-vectors.

use crate::error::CodecError;

/// Maps each value into `[0, 1]` with `(v - lower) / (upper - lower)`.
///
/// Values outside the bounds map outside `[0, 1]`; no clamping is applied.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`CodecError::LengthMismatch`] | `lower` or `upper` length differs from `values` |
/// | [`CodecError::DegenerateBounds`] | `upper == lower` in some dimension |
///
/// # Example
///
/// ```
/// use catdist_codec::normalize;
///
/// let out = normalize(&[5.0, 0.0], &[0.0, -1.0], &[10.0, 1.0]).unwrap();
/// assert_eq!(out, vec![0.5, 0.5]);
/// ```
pub fn normalize(values: &[f64], lower: &[f64], upper: &[f64]) -> Result<Vec<f64>, CodecError> {
    if lower.len() != values.len() {
        return Err(CodecError::LengthMismatch {
            what: "lower bounds",
            expected: values.len(),
            got: lower.len(),
        });
    }
    if upper.len() != values.len() {
        return Err(CodecError::LengthMismatch {
            what: "upper bounds",
            expected: values.len(),
            got: upper.len(),
        });
    }

    values
        .iter()
        .zip(lower.iter().zip(upper))
        .enumerate()
        .map(|(dim, (&v, (&lo, &hi)))| {
            let range = hi - lo;
            if range == 0.0 {
                return Err(CodecError::DegenerateBounds { dim, bound: lo });
            }
            Ok((v - lo) / range)
        })
        .collect()
}
