//! Weighted distance metrics over encoded points.

use crate::error::MetricError;

/// A distance over encoded point vectors of a fixed dimension.
///
/// Implementations satisfy `distance(a, b) >= 0`, `distance(a, a) == 0` and
/// `distance(a, b) == distance(b, a)`.
pub trait Distance {
    /// Length of the encoded vectors this metric compares.
    fn dims(&self) -> usize;

    /// Distance between two encoded vectors.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DimensionMismatch`] if either vector's length
    /// differs from [`dims`](Distance::dims).
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, MetricError>;
}

/// Weighted Lp distance over a flat numeric vector.
///
/// ```text
/// d(a, b) = (Σᵢ wᵢ |aᵢ − bᵢ|ᵖ)^(1/p)
/// ```
///
/// # Example
///
/// ```
/// use catdist_metric::{Distance, WeightedLp};
///
/// let metric = WeightedLp::new(vec![1.0, 4.0], 2.0).unwrap();
/// let d = metric.distance(&[0.0, 0.0], &[3.0, 2.0]).unwrap();
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLp {
    weights: Vec<f64>,
    p: f64,
}

impl WeightedLp {
    /// Creates the metric with one weight per compared dimension.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`MetricError::InvalidWeight`] | a negative or non-finite weight |
    /// | [`MetricError::InvalidExponent`] | `p` non-finite or `<= 0` |
    pub fn new(weights: Vec<f64>, p: f64) -> Result<Self, MetricError> {
        validate_exponent(p)?;
        validate_weights(&weights)?;
        Ok(Self { weights, p })
    }

    /// Returns the weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the exponent.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Distance for WeightedLp {
    fn dims(&self) -> usize {
        self.weights.len()
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
        check_dims(self.dims(), a, b)?;
        let sum: f64 = a
            .iter()
            .zip(b)
            .zip(&self.weights)
            .map(|((x, y), w)| w * pow_abs(x - y, self.p))
            .sum();
        Ok(root(sum, self.p))
    }
}

/// Mixed distance over `[cat embeddings (2 per variable) | integer | continuous]`
/// vectors, with one weight per variable.
///
/// Categorical variable `j` contributes `wⱼ · ‖eₐ − e_b‖ₚᵖ` where `e` are the
/// 2D embedding coordinates of the two observed levels. Integer and
/// continuous variables contribute `wᵢ · |aᵢ − bᵢ|ᵖ`. The result is the p-th
/// root of the sum.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedEmbedding {
    n_categorical: usize,
    weights: Vec<f64>,
    p: f64,
}

impl MixedEmbedding {
    /// Creates the metric for `n_categorical` embedded variables followed by
    /// `weights.len() - n_categorical` scalar variables.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`MetricError::DimensionMismatch`] | `n_categorical > weights.len()` |
    /// | [`MetricError::InvalidWeight`] | a negative or non-finite weight |
    /// | [`MetricError::InvalidExponent`] | `p` non-finite or `<= 0` |
    pub fn new(n_categorical: usize, weights: Vec<f64>, p: f64) -> Result<Self, MetricError> {
        if n_categorical > weights.len() {
            return Err(MetricError::DimensionMismatch {
                what: "weights",
                expected: n_categorical,
                got: weights.len(),
            });
        }
        validate_exponent(p)?;
        validate_weights(&weights)?;
        Ok(Self {
            n_categorical,
            weights,
            p,
        })
    }

    /// Number of embedded categorical variables.
    pub fn n_categorical(&self) -> usize {
        self.n_categorical
    }

    /// Returns the per-variable weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the exponent.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Distance for MixedEmbedding {
    fn dims(&self) -> usize {
        self.weights.len() + self.n_categorical
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
        check_dims(self.dims(), a, b)?;
        let split = 2 * self.n_categorical;
        let (cat_w, quant_w) = self.weights.split_at(self.n_categorical);

        let cat: f64 = a[..split]
            .chunks_exact(2)
            .zip(b[..split].chunks_exact(2))
            .zip(cat_w)
            .map(|((ea, eb), w)| {
                // ‖ea − eb‖ₚ raised back to p
                w * (pow_abs(ea[0] - eb[0], self.p) + pow_abs(ea[1] - eb[1], self.p))
            })
            .sum();

        let quant: f64 = a[split..]
            .iter()
            .zip(&b[split..])
            .zip(quant_w)
            .map(|((x, y), w)| w * pow_abs(x - y, self.p))
            .sum();

        Ok(root(cat + quant, self.p))
    }
}

/// Either metric variant, selected at run time from the parameter layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    /// Weighted Lp over one-hot categorical blocks and scalar variables.
    WeightedLp(WeightedLp),
    /// Mixed distance over 2D categorical embeddings and scalar variables.
    MixedEmbedding(MixedEmbedding),
}

impl Distance for Metric {
    fn dims(&self) -> usize {
        match self {
            Metric::WeightedLp(m) => m.dims(),
            Metric::MixedEmbedding(m) => m.dims(),
        }
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
        match self {
            Metric::WeightedLp(m) => m.distance(a, b),
            Metric::MixedEmbedding(m) => m.distance(a, b),
        }
    }
}

fn check_dims(dims: usize, a: &[f64], b: &[f64]) -> Result<(), MetricError> {
    for v in [a, b] {
        if v.len() != dims {
            return Err(MetricError::DimensionMismatch {
                what: "compared vector",
                expected: dims,
                got: v.len(),
            });
        }
    }
    Ok(())
}

fn validate_exponent(p: f64) -> Result<(), MetricError> {
    if !p.is_finite() || p <= 0.0 {
        return Err(MetricError::InvalidExponent { p });
    }
    Ok(())
}

fn validate_weights(weights: &[f64]) -> Result<(), MetricError> {
    match weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        Some((index, &value)) => Err(MetricError::InvalidWeight { index, value }),
        None => Ok(()),
    }
}

#[inline]
fn pow_abs(d: f64, p: f64) -> f64 {
    if p == 2.0 { d * d } else { d.abs().powf(p) }
}

#[inline]
fn root(sum: f64, p: f64) -> f64 {
    if p == 2.0 { sum.sqrt() } else { sum.powf(1.0 / p) }
}
