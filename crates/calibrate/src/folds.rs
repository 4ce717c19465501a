//! Seeded K-way partition of a training set into validation blocks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CalibrateError;

/// A partition of `0..n` into `k` contiguous blocks of a seeded permutation.
///
/// Block `f` has `⌊n/k⌋ + 1` elements if `f < n mod k`, otherwise `⌊n/k⌋`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment {
    permutation: Vec<usize>,
    starts: Vec<usize>,
}

impl FoldAssignment {
    /// Number of folds.
    pub fn k(&self) -> usize {
        self.starts.len() - 1
    }

    /// Number of partitioned indices.
    pub fn n(&self) -> usize {
        self.permutation.len()
    }

    /// Size of every fold, in fold order.
    pub fn sizes(&self) -> Vec<usize> {
        self.starts.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Indices held out in `fold`.
    ///
    /// # Panics
    ///
    /// Panics if `fold >= self.k()`.
    pub fn validation(&self, fold: usize) -> &[usize] {
        &self.permutation[self.starts[fold]..self.starts[fold + 1]]
    }

    /// Indices used for training in `fold`: the permutation with the
    /// validation block removed, in permutation order.
    ///
    /// # Panics
    ///
    /// Panics if `fold >= self.k()`.
    pub fn training(&self, fold: usize) -> Vec<usize> {
        let (start, end) = (self.starts[fold], self.starts[fold + 1]);
        self.permutation[..start]
            .iter()
            .chain(&self.permutation[end..])
            .copied()
            .collect()
    }

    /// Iterates over the validation blocks.
    pub fn blocks(&self) -> impl Iterator<Item = &[usize]> {
        (0..self.k()).map(|f| self.validation(f))
    }
}

/// Partitions `0..n` into `k` folds using a permutation drawn from `seed`.
///
/// The permutation is a Fisher-Yates shuffle driven by
/// `StdRng::seed_from_u64(seed)`, so the result is bit-reproducible for the
/// same `(n, k, seed)`.
///
/// # Errors
///
/// Returns [`CalibrateError::InvalidFolds`] if `k == 0`. With `k > n` the
/// trailing `k - n` folds are empty.
///
/// # Example
///
/// ```
/// use catdist_calibrate::partition;
///
/// let folds = partition(10, 3, 42).unwrap();
/// assert_eq!(folds.sizes(), vec![4, 3, 3]);
/// ```
pub fn partition(n: usize, k: usize, seed: u64) -> Result<FoldAssignment, CalibrateError> {
    if k == 0 {
        return Err(CalibrateError::InvalidFolds { k, n });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut permutation: Vec<usize> = (0..n).collect();
    for i in 0..n.saturating_sub(1) {
        let j = rng.random_range(i..n);
        permutation.swap(i, j);
    }

    let base = n / k;
    let extra = n % k;
    let mut starts = Vec::with_capacity(k + 1);
    let mut start = 0;
    starts.push(start);
    for fold in 0..k {
        start += base + usize::from(fold < extra);
        starts.push(start);
    }

    Ok(FoldAssignment {
        permutation,
        starts,
    })
}
