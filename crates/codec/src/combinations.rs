//! Enumeration of every categorical level combination.

use crate::error::CodecError;

/// Largest number of combinations [`categorical_combinations`] enumerates.
pub const MAX_COMBINATIONS: usize = 1 << 20;

/// Enumerates all categorical combinations in lexicographic order (the last
/// variable varies fastest).
///
/// This order is the canonical enumeration order used to break distance
/// ties when ranking neighbors.
///
/// # Errors
///
/// Returns [`CodecError::TooManyCombinations`] if the product of the
/// cardinalities exceeds [`MAX_COMBINATIONS`].
///
/// # Example
///
/// ```
/// use catdist_codec::categorical_combinations;
///
/// let all = categorical_combinations(&[2, 2]).unwrap();
/// assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
pub fn categorical_combinations(levels_per_variable: &[usize]) -> Result<Vec<Vec<usize>>, CodecError> {
    let total = levels_per_variable
        .iter()
        .try_fold(1usize, |acc, &m| acc.checked_mul(m))
        .filter(|&total| total <= MAX_COMBINATIONS)
        .ok_or(CodecError::TooManyCombinations)?;

    let mut out = Vec::with_capacity(total);
    if total == 0 {
        return Ok(out);
    }

    let mut current = vec![0usize; levels_per_variable.len()];
    for _ in 0..total {
        out.push(current.clone());
        // Odometer increment from the last variable.
        for j in (0..current.len()).rev() {
            current[j] += 1;
            if current[j] < levels_per_variable[j] {
                break;
            }
            current[j] = 0;
        }
    }

    Ok(out)
}
