//! # catdist-io
//!
//! File exchange with the host optimizer: the problem/cache file it writes
//! before each call, the calibrated-parameters file kept between calls,
//! and the directions file it reads back.
//!
//! Output files are written through a sibling temporary file and renamed
//! into place, so a failed run never leaves partial output.

mod atomic;
mod cache;
mod directions;
mod error;
mod params_file;
mod validate;

pub use cache::{
    Evaluation, MAX_CATEGORICAL_LEVELS, ProblemCache, TypeCode, TypeCounts, parse_cache, read_cache,
};
pub use directions::write_directions;
pub use error::IoError;
pub use params_file::{read_params, write_params};
