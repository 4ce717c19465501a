//! Flat metric parameter vectors and their binding to concrete metrics.
//!
//! Layout of a parameter vector:
//!
//! ```text
//! [ w_cat_1 … w_cat_C | w_int_1 … w_int_I | w_con_1 … w_con_R | x₀ y₀ x₁ y₁ … ]
//!   └────────────── one weight per variable ──────────────┘   └ 2 per level ┘
//!                                                               (embedding only)
//! ```

use std::ops::Range;

use catdist_codec::{EmbeddingTable, VariableSpec, embed_categorical, one_hot};

use crate::distance::{Distance, MixedEmbedding, Metric, WeightedLp};
use crate::error::MetricError;

/// Admissible range of every weight.
pub const WEIGHT_BOUNDS: (f64, f64) = (0.0, 1.0);

/// Admissible range of every embedding coordinate.
pub const EMBEDDING_BOUNDS: (f64, f64) = (-1.0, 1.0);

/// Which metric a parameter vector describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Weighted Lp over one-hot categorical blocks; `nb_variables` parameters.
    OneHot,
    /// Mixed distance over learned 2D embeddings;
    /// `nb_variables + 2 × total_levels` parameters.
    Embedding,
}

/// Partition of a flat parameter vector into weights and embedding
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamLayout {
    variant: Variant,
    n_categorical: usize,
    n_integer: usize,
    n_continuous: usize,
    levels: Vec<usize>,
}

impl ParamLayout {
    /// Creates the layout of `variant` for the given variables.
    pub fn new(spec: &VariableSpec, variant: Variant) -> Self {
        Self {
            variant,
            n_categorical: spec.n_categorical(),
            n_integer: spec.n_integer(),
            n_continuous: spec.n_continuous(),
            levels: spec.levels_per_variable().to_vec(),
        }
    }

    /// Recovers the layout from a parameter count.
    ///
    /// When there are no categorical variables both variants have the same
    /// length and [`Variant::OneHot`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DimensionMismatch`] if `n_params` matches neither
    /// variant.
    pub fn infer(spec: &VariableSpec, n_params: usize) -> Result<Self, MetricError> {
        let one_hot = Self::new(spec, Variant::OneHot);
        if n_params == one_hot.len() {
            return Ok(one_hot);
        }
        let embedding = Self::new(spec, Variant::Embedding);
        if n_params == embedding.len() {
            return Ok(embedding);
        }
        Err(MetricError::DimensionMismatch {
            what: "metric parameters",
            expected: embedding.len(),
            got: n_params,
        })
    }

    /// Returns the variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Number of categorical variables.
    pub fn n_categorical(&self) -> usize {
        self.n_categorical
    }

    /// Number of integer plus continuous variables.
    pub fn n_quantitative(&self) -> usize {
        self.n_integer + self.n_continuous
    }

    /// Total number of variables (and of weights).
    pub fn n_variables(&self) -> usize {
        self.n_categorical + self.n_quantitative()
    }

    /// Cardinality of each categorical variable.
    pub fn levels_per_variable(&self) -> &[usize] {
        &self.levels
    }

    /// Total parameter count.
    pub fn len(&self) -> usize {
        self.embedding_range().end
    }

    /// Returns `true` if the layout holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of the per-variable weights.
    pub fn weight_range(&self) -> Range<usize> {
        0..self.n_variables()
    }

    /// Indices of the integer and continuous weights.
    pub fn quantitative_weight_range(&self) -> Range<usize> {
        self.n_categorical..self.n_variables()
    }

    /// Indices of the embedding coordinates (empty for [`Variant::OneHot`]).
    pub fn embedding_range(&self) -> Range<usize> {
        let start = self.n_variables();
        match self.variant {
            Variant::OneHot => start..start,
            Variant::Embedding => start..start + 2 * self.levels.iter().sum::<usize>(),
        }
    }

    /// Lower bound of every parameter.
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.bounds(|(lo, _)| lo)
    }

    /// Upper bound of every parameter.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.bounds(|(_, hi)| hi)
    }

    fn bounds(&self, pick: impl Fn((f64, f64)) -> f64) -> Vec<f64> {
        let mut out = vec![pick(WEIGHT_BOUNDS); self.n_variables()];
        out.resize(self.len(), pick(EMBEDDING_BOUNDS));
        out
    }
}

/// A parameter vector together with its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricParams {
    layout: ParamLayout,
    values: Vec<f64>,
}

impl MetricParams {
    /// Wraps `values` with an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DimensionMismatch`] if `values.len()` differs
    /// from `layout.len()`.
    pub fn new(layout: ParamLayout, values: Vec<f64>) -> Result<Self, MetricError> {
        if values.len() != layout.len() {
            return Err(MetricError::DimensionMismatch {
                what: "metric parameters",
                expected: layout.len(),
                got: values.len(),
            });
        }
        Ok(Self { layout, values })
    }

    /// Wraps `values`, inferring the variant from their count.
    ///
    /// # Errors
    ///
    /// See [`ParamLayout::infer`].
    pub fn from_flat(spec: &VariableSpec, values: Vec<f64>) -> Result<Self, MetricError> {
        let layout = ParamLayout::infer(spec, values.len())?;
        Ok(Self { layout, values })
    }

    /// Returns the layout.
    pub fn layout(&self) -> &ParamLayout {
        &self.layout
    }

    /// Returns the flat parameter vector.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consumes `self`, returning the flat parameter vector.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Per-variable weights.
    pub fn weights(&self) -> &[f64] {
        &self.values[self.layout.weight_range()]
    }

    /// Embedding coordinates (empty for [`Variant::OneHot`]).
    pub fn embedding(&self) -> &[f64] {
        &self.values[self.layout.embedding_range()]
    }

    /// Binds the parameters to a metric over full encoded points.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidWeight`],
    /// [`MetricError::NonFiniteEmbedding`] or
    /// [`MetricError::InvalidExponent`] for inadmissible parameters.
    pub fn bind(&self, p: f64) -> Result<CalibratedMetric, MetricError> {
        self.bind_with(self.weights(), self.layout.n_quantitative(), p)
    }

    /// Binds the parameters to a metric over categorical variables only,
    /// using the categorical weights (and embeddings, if any).
    ///
    /// # Errors
    ///
    /// Same as [`bind`](Self::bind).
    pub fn bind_categorical(&self, p: f64) -> Result<CalibratedMetric, MetricError> {
        let n_cat = self.layout.n_categorical();
        self.bind_with(&self.weights()[..n_cat], 0, p)
    }

    fn bind_with(
        &self,
        weights: &[f64],
        n_quantitative: usize,
        p: f64,
    ) -> Result<CalibratedMetric, MetricError> {
        let n_cat = self.layout.n_categorical();
        let levels = self.layout.levels_per_variable();

        let (encoding, metric) = match self.layout.variant() {
            Variant::OneHot => {
                // A categorical weight covers every coordinate of its one-hot block.
                let mut expanded = Vec::with_capacity(self.layout.len() + levels.len());
                for (&w, &m) in weights[..n_cat].iter().zip(levels) {
                    expanded.extend(std::iter::repeat_n(w, m));
                }
                expanded.extend_from_slice(&weights[n_cat..]);
                (
                    CategoricalEncoding::OneHot {
                        levels: levels.to_vec(),
                    },
                    Metric::WeightedLp(WeightedLp::new(expanded, p)?),
                )
            }
            Variant::Embedding => {
                let coords = self.embedding();
                if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
                    return Err(MetricError::NonFiniteEmbedding { index });
                }
                let table = EmbeddingTable::from_flat(coords, levels)?;
                (
                    CategoricalEncoding::Embedded(table),
                    Metric::MixedEmbedding(MixedEmbedding::new(n_cat, weights.to_vec(), p)?),
                )
            }
        };

        Ok(CalibratedMetric {
            encoding,
            n_quantitative,
            metric,
        })
    }
}

/// How categorical levels are turned into coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoricalEncoding {
    /// One-hot blocks.
    OneHot {
        /// Cardinality of each categorical variable.
        levels: Vec<usize>,
    },
    /// Learned 2D embedding per level.
    Embedded(EmbeddingTable),
}

/// A metric bound to concrete parameters, together with the encoding that
/// produces the vectors it compares.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedMetric {
    encoding: CategoricalEncoding,
    n_quantitative: usize,
    metric: Metric,
}

impl CalibratedMetric {
    /// Encodes a point given its categorical levels and its normalized
    /// integer-then-continuous values.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DimensionMismatch`] if `quantitative` does not
    /// hold exactly the number of scalar variables this metric compares, or
    /// a wrapped codec error for invalid levels.
    pub fn encode(&self, categorical: &[usize], quantitative: &[f64]) -> Result<Vec<f64>, MetricError> {
        if quantitative.len() != self.n_quantitative {
            return Err(MetricError::DimensionMismatch {
                what: "quantitative values",
                expected: self.n_quantitative,
                got: quantitative.len(),
            });
        }
        let mut out = self.encode_categorical(categorical)?;
        out.extend_from_slice(quantitative);
        Ok(out)
    }

    /// Encodes only the categorical part of a point.
    ///
    /// # Errors
    ///
    /// Returns a wrapped codec error for invalid levels or arity.
    pub fn encode_categorical(&self, categorical: &[usize]) -> Result<Vec<f64>, MetricError> {
        let encoded = match &self.encoding {
            CategoricalEncoding::OneHot { levels } => one_hot(categorical, levels)?,
            CategoricalEncoding::Embedded(table) => embed_categorical(categorical, table)?,
        };
        Ok(encoded)
    }

    /// Returns the categorical encoding.
    pub fn encoding(&self) -> &CategoricalEncoding {
        &self.encoding
    }

    /// Returns the underlying metric.
    pub fn metric(&self) -> &Metric {
        &self.metric
    }
}

impl Distance for CalibratedMetric {
    fn dims(&self) -> usize {
        self.metric.dims()
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, MetricError> {
        self.metric.distance(a, b)
    }
}
