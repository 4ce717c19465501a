//! Raw evaluation history and its normalized form.

use catdist_codec::{VariableSpec, normalize, split};
use catdist_metric::{CalibratedMetric, MetricError};
use tracing::warn;

use crate::error::CalibrateError;

/// Evaluated points with their objective values, as read from the cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl TrainingSet {
    /// Creates an empty training set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one evaluation.
    pub fn push(&mut self, point: Vec<f64>, value: f64) {
        self.points.push(point);
        self.values.push(value);
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no evaluations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluated points in slot order.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Objective values, aligned with [`points`](Self::points).
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl FromIterator<(Vec<f64>, f64)> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = (Vec<f64>, f64)>>(iter: I) -> Self {
        let (points, values) = iter.into_iter().unzip();
        Self { points, values }
    }
}

/// A training set split by variable type with integer and continuous values
/// mapped into `[0, 1]` and responses min-max scaled into `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    categorical: Vec<Vec<usize>>,
    quantitative: Vec<Vec<f64>>,
    responses: Vec<f64>,
}

impl Dataset {
    /// Normalizes `training` against the bounds of `spec`.
    ///
    /// Evaluations with a non-finite response are skipped with a warning.
    /// If every remaining response is equal they all scale to `0`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CalibrateError::Bounds`] | an integer or continuous variable with `lower == upper` |
    /// | [`CalibrateError::MalformedPoint`] | a point that does not fit `spec` |
    pub fn from_training(training: &TrainingSet, spec: &VariableSpec) -> Result<Self, CalibrateError> {
        let (int_lo, int_hi) = spec.integer_bounds();
        let (con_lo, con_hi) = spec.continuous_bounds();
        normalize(&int_lo, &int_lo, &int_hi).map_err(|source| CalibrateError::Bounds {
            kind: "integer",
            source,
        })?;
        normalize(&con_lo, &con_lo, &con_hi).map_err(|source| CalibrateError::Bounds {
            kind: "continuous",
            source,
        })?;

        let mut categorical = Vec::with_capacity(training.len());
        let mut quantitative = Vec::with_capacity(training.len());
        let mut raw = Vec::with_capacity(training.len());
        let mut skipped = 0usize;

        for (index, (point, &y)) in training.points().iter().zip(training.values()).enumerate() {
            if !y.is_finite() {
                skipped += 1;
                continue;
            }
            let to_point_err = |source| CalibrateError::MalformedPoint { index, source };
            let parts = split(point, spec).map_err(to_point_err)?;
            let mut scaled = normalize(&parts.integer, &int_lo, &int_hi).map_err(to_point_err)?;
            scaled.extend(normalize(&parts.continuous, &con_lo, &con_hi).map_err(to_point_err)?);

            categorical.push(parts.categorical);
            quantitative.push(scaled);
            raw.push(y);
        }

        if skipped > 0 {
            warn!(skipped, "skipping evaluations with non-finite responses");
        }

        Ok(Self {
            categorical,
            quantitative,
            responses: min_max_scale(&raw),
        })
    }

    /// Number of usable evaluations.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Returns `true` if no evaluation survived normalization.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Categorical level indices of every point.
    pub fn categorical(&self) -> &[Vec<usize>] {
        &self.categorical
    }

    /// Normalized integer-then-continuous values of every point.
    pub fn quantitative(&self) -> &[Vec<f64>] {
        &self.quantitative
    }

    /// Scaled responses.
    pub fn responses(&self) -> &[f64] {
        &self.responses
    }

    /// Encodes every point under `metric`.
    ///
    /// # Errors
    ///
    /// Propagates encoding errors of [`CalibratedMetric::encode`].
    pub fn encode_all(&self, metric: &CalibratedMetric) -> Result<Vec<Vec<f64>>, MetricError> {
        self.categorical
            .iter()
            .zip(&self.quantitative)
            .map(|(cat, quant)| metric.encode(cat, quant))
            .collect()
    }
}

fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if range > 0.0 {
        values.iter().map(|y| (y - lo) / range).collect()
    } else {
        if !values.is_empty() {
            warn!(value = lo, "all responses are equal; scaling them to zero");
        }
        vec![0.0; values.len()]
    }
}
