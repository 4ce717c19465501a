//! # catdist-metric
//!
//! Parametric distances over mixed-variable points.
//!
//! | Metric | Compared vector | Weights |
//! |--------|-----------------|---------|
//! | [`WeightedLp`] | flat, categorical supplied pre-encoded (one-hot) | one per coordinate |
//! | [`MixedEmbedding`] | 2D embedding per categorical variable, then scalars | one per variable |
//!
//! [`MetricParams`] splits a flat calibration vector into weights and
//! embedding coordinates and binds it to a [`CalibratedMetric`], which
//! carries both the encoding and the metric.
//!
//! # Example
//!
//! ```
//! use catdist_codec::{VarKind, VariableSpec};
//! use catdist_metric::{Distance, MetricParams};
//!
//! let spec = VariableSpec::new(vec![
//!     VarKind::Categorical { levels: 2 },
//!     VarKind::Continuous { lower: 0.0, upper: 1.0 },
//! ])
//! .unwrap();
//!
//! // 2 weights + 2 levels × 2 coordinates
//! let params = MetricParams::from_flat(&spec, vec![1.0, 1.0, 0.0, 0.0, 0.6, 0.8]).unwrap();
//! let metric = params.bind(2.0).unwrap();
//!
//! let a = metric.encode(&[0], &[0.0]).unwrap();
//! let b = metric.encode(&[1], &[0.0]).unwrap();
//! assert!((metric.distance(&a, &b).unwrap() - 1.0).abs() < 1e-12);
//! ```

mod distance;
mod error;
mod params;

pub use distance::{Distance, Metric, MixedEmbedding, WeightedLp};
pub use error::MetricError;
pub use params::{
    CalibratedMetric, CategoricalEncoding, EMBEDDING_BOUNDS, MetricParams, ParamLayout,
    Variant, WEIGHT_BOUNDS,
};
