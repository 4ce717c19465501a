//! # catdist-codec
//!
//! Variable codec for mixed categorical / integer / continuous points.
//!
//! ```text
//! point ──split()──► SplitPoint { categorical, integer, continuous }
//!                         │            │          │
//!                         │            └─normalize()┘ ──► [0,1] values
//!                         ├─one_hot()            ──► binary blocks
//!                         └─embed_categorical()  ──► 2D coordinates per variable
//! ```
//!
//! # Example
//!
//! ```
//! use catdist_codec::{VarKind, VariableSpec, normalize, one_hot, split};
//!
//! let spec = VariableSpec::new(vec![
//!     VarKind::Categorical { levels: 3 },
//!     VarKind::Continuous { lower: 0.0, upper: 4.0 },
//! ])
//! .unwrap();
//!
//! let parts = split(&[2.0, 1.0], &spec).unwrap();
//! let (lo, hi) = spec.continuous_bounds();
//! assert_eq!(normalize(&parts.continuous, &lo, &hi).unwrap(), vec![0.25]);
//! assert_eq!(
//!     one_hot(&parts.categorical, spec.levels_per_variable()).unwrap(),
//!     vec![0.0, 0.0, 1.0]
//! );
//! ```

mod combinations;
mod encode;
mod error;
mod normalize;
mod point;
mod variables;

pub use combinations::{MAX_COMBINATIONS, categorical_combinations};
pub use encode::{EmbeddingTable, embed_categorical, one_hot};
pub use error::CodecError;
pub use normalize::normalize;
pub use point::{SplitPoint, assemble, split};
pub use variables::{VarKind, VariableSpec};
