//! K-fold calibration of mixed-variable distance metrics.
//!
//! Metric parameters are tuned so that an IDW surrogate built on the metric
//! predicts held-out evaluations well. The optimizer is injected through
//! [`BlackboxOptimizer`]; [`HybridSearch`] is the default.
//!
//! # Quick start
//!
//! ```
//! use catdist_calibrate::{CalibrationConfig, Dataset, HybridSearch, TrainingSet, calibrate};
//! use catdist_codec::{VarKind, VariableSpec};
//! use catdist_metric::Variant;
//!
//! let spec = VariableSpec::new(vec![
//!     VarKind::Categorical { levels: 2 },
//!     VarKind::Continuous { lower: 0.0, upper: 1.0 },
//! ])
//! .unwrap();
//! let training: TrainingSet = (0..9)
//!     .map(|i| (vec![(i % 2) as f64, i as f64 / 8.0], (i % 2) as f64))
//!     .collect();
//! let data = Dataset::from_training(&training, &spec).unwrap();
//!
//! let config = CalibrationConfig::new(Variant::OneHot).with_budget_per_param(5);
//! let outcome = calibrate(&data, &spec, &config, &HybridSearch::default()).unwrap();
//! assert_eq!(outcome.params().values().len(), 2);
//! ```
//!
//! # Architecture
//!
//! ```text
//! calibrate()
//!   ├─ CalibrationObjective::new()   partition() into K FoldObjective  (folds.rs)
//!   ├─ initial_guess(), fixed_mask()
//!   └─ BlackboxOptimizer::minimize() (blackbox.rs, search.rs)
//!        └─ evaluate_outcome(params)
//!             ├─ MetricParams::bind()      weights + embedding table
//!             ├─ Dataset::encode_all()
//!             └─ mean of FoldObjective::rmse()  (IdwPredictor per fold)
//! ```

mod blackbox;
mod calibrate;
mod config;
mod dataset;
mod error;
mod folds;
mod objective;
mod search;

pub use blackbox::{BlackboxOptimizer, BlackboxProblem, BlackboxResult, EvalOutcome, Objective};
pub use calibrate::{
    CalibrationOutcome, calibrate, fixed_mask, initial_guess, recalibration_budget_reached,
};
pub use config::CalibrationConfig;
pub use dataset::{Dataset, TrainingSet};
pub use error::CalibrateError;
pub use folds::{FoldAssignment, partition};
pub use objective::{CalibrationObjective, FoldObjective};
pub use search::HybridSearch;
