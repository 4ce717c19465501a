//! Inverse-distance-weighting predictor over an encoded training set.

use catdist_metric::Distance;

use crate::error::IdwError;

/// Distances at or below this value count as exact matches.
pub const EXACT_MATCH_TOLERANCE: f64 = 1e-10;

/// Non-parametric IDW surrogate.
///
/// ```text
/// ŷ(q) = Σᵢ (yᵢ / dᵢ) / Σᵢ (1 / dᵢ),   dᵢ = d(q, xᵢ)
/// ```
///
/// If one or more training points lie within [`EXACT_MATCH_TOLERANCE`] of
/// the query, the mean response of all of them is returned instead.
///
/// The metric is borrowed; [`rebind`](Self::rebind) swaps it without
/// copying the training data.
///
/// # Example
///
/// ```
/// use catdist_idw::IdwPredictor;
/// use catdist_metric::WeightedLp;
///
/// let metric = WeightedLp::new(vec![1.0], 2.0).unwrap();
/// let model = IdwPredictor::new(vec![vec![0.0], vec![2.0]], vec![1.0, 3.0], &metric).unwrap();
/// assert!((model.predict(&[1.0]).unwrap() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct IdwPredictor<'m, D: Distance + ?Sized> {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
    metric: &'m D,
}

impl<'m, D: Distance + ?Sized> IdwPredictor<'m, D> {
    /// Creates a predictor over encoded training points and their responses.
    ///
    /// # Errors
    ///
    /// Returns [`IdwError::LengthMismatch`] if `points.len() != values.len()`.
    pub fn new(points: Vec<Vec<f64>>, values: Vec<f64>, metric: &'m D) -> Result<Self, IdwError> {
        if points.len() != values.len() {
            return Err(IdwError::LengthMismatch {
                what: "training set",
                points: points.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            points,
            values,
            metric,
        })
    }

    /// Number of training points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no training points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the bound metric.
    pub fn metric(&self) -> &'m D {
        self.metric
    }

    /// Re-binds the predictor to another metric, keeping the training data.
    pub fn rebind<'n, E: Distance + ?Sized>(self, metric: &'n E) -> IdwPredictor<'n, E> {
        IdwPredictor {
            points: self.points,
            values: self.values,
            metric,
        }
    }

    /// Extends the training set. No re-fit is needed.
    pub fn append(&mut self, point: Vec<f64>, value: f64) {
        self.points.push(point);
        self.values.push(value);
    }

    /// Predicts the response at `query`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IdwError::EmptyTrainingSet`] | no training points |
    /// | [`IdwError::Metric`] | `query` or a training point has the wrong dimension |
    /// | [`IdwError::NonFinitePrediction`] | the weighted mean is NaN or infinite |
    pub fn predict(&self, query: &[f64]) -> Result<f64, IdwError> {
        if self.points.is_empty() {
            return Err(IdwError::EmptyTrainingSet);
        }

        let mut exact_sum = 0.0;
        let mut exact_count = 0usize;
        let mut weighted = 0.0;
        let mut total_weight = 0.0;

        for (x, &y) in self.points.iter().zip(&self.values) {
            let d = self.metric.distance(query, x)?;
            if d <= EXACT_MATCH_TOLERANCE {
                exact_sum += y;
                exact_count += 1;
            } else if exact_count == 0 {
                let w = 1.0 / d;
                weighted += w * y;
                total_weight += w;
            }
        }

        let prediction = if exact_count > 0 {
            exact_sum / exact_count as f64
        } else {
            weighted / total_weight
        };

        if !prediction.is_finite() {
            return Err(IdwError::NonFinitePrediction { query: 0 });
        }
        Ok(prediction)
    }

    /// Root-mean-square prediction error over a test set.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IdwError::EmptyTestSet`] | no test points |
    /// | [`IdwError::LengthMismatch`] | `test_points.len() != test_values.len()` |
    ///
    /// plus every error of [`predict`](Self::predict), with the failing
    /// query index filled in for non-finite predictions.
    pub fn rmse(&self, test_points: &[Vec<f64>], test_values: &[f64]) -> Result<f64, IdwError> {
        if test_points.len() != test_values.len() {
            return Err(IdwError::LengthMismatch {
                what: "test set",
                points: test_points.len(),
                values: test_values.len(),
            });
        }
        if test_points.is_empty() {
            return Err(IdwError::EmptyTestSet);
        }

        let n = test_points.len() as f64;
        let mut sum_sq = 0.0;
        for (query, (x, &y)) in test_points.iter().zip(test_values).enumerate() {
            let pred = self.predict(x).map_err(|e| match e {
                IdwError::NonFinitePrediction { .. } => IdwError::NonFinitePrediction { query },
                other => other,
            })?;
            let err = pred - y;
            sum_sq += err * err;
        }

        Ok((sum_sq / n).sqrt())
    }
}
