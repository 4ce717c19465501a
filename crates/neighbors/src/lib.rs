//! # catdist-neighbors
//!
//! Proposes categorical neighbors of the current point under a calibrated
//! categorical metric, together with the move directions the host
//! optimizer polls along.
//!
//! ```text
//! propose_neighbors(spec, params, p, current, m)
//!   ├─ MetricParams::bind_categorical()
//!   ├─ categorical_combinations()       canonical lexicographic order
//!   └─ rank_neighbors()                 self at +∞, stable sort, take m
//!        └─ NeighborCandidate { point, direction, .. }
//!
//! format_direction(spec, &candidate.direction)   "(d1 d2 … dn)"
//! ```

mod direction;
mod error;
mod rank;

pub use direction::format_direction;
pub use error::NeighborError;
pub use rank::{NeighborCandidate, propose_neighbors, rank_neighbors};
