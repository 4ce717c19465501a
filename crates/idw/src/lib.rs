//! # catdist-idw
//!
//! Inverse-distance-weighting surrogate built on any [`Distance`].
//!
//! ```text
//! IdwPredictor::new(points, values, &metric)?
//!   ├─ .predict(&query)?         exact-match mean, else Σ(y/d) / Σ(1/d)
//!   ├─ .rmse(&test, &values)?    held-out root-mean-square error
//!   ├─ .append(point, value)     grow the training set
//!   └─ .rebind(&other_metric)    swap parameters, keep data
//! ```
//!
//! [`Distance`]: catdist_metric::Distance

mod error;
mod predictor;

pub use error::IdwError;
pub use predictor::{EXACT_MATCH_TOLERANCE, IdwPredictor};
