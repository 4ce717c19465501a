//! Splitting flat points into typed sub-vectors and reassembling them.

use crate::error::CodecError;
use crate::variables::{VarKind, VariableSpec};

/// A point separated into its categorical, integer and continuous parts.
///
/// Each part lists its variables in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPoint {
    /// Categorical level indices.
    pub categorical: Vec<usize>,
    /// Integer variable values.
    pub integer: Vec<f64>,
    /// Continuous variable values.
    pub continuous: Vec<f64>,
}

/// Splits a flat point into typed sub-vectors.
///
/// # Errors
///
/// Returns [`CodecError::MalformedPoint`] if `point.len() != spec.len()`, or
/// a categorical slot holds a value that is non-integral or outside
/// `[0, levels)`.
pub fn split(point: &[f64], spec: &VariableSpec) -> Result<SplitPoint, CodecError> {
    if point.len() != spec.len() {
        return Err(CodecError::MalformedPoint {
            slot: point.len().min(spec.len()),
            reason: format!("point has {} values, expected {}", point.len(), spec.len()),
        });
    }

    let mut out = SplitPoint {
        categorical: Vec::with_capacity(spec.n_categorical()),
        integer: Vec::with_capacity(spec.n_integer()),
        continuous: Vec::with_capacity(spec.n_continuous()),
    };

    for (slot, (&v, kind)) in point.iter().zip(spec.slots()).enumerate() {
        if !v.is_finite() {
            return Err(CodecError::MalformedPoint {
                slot,
                reason: format!("non-finite value {v}"),
            });
        }
        match *kind {
            VarKind::Categorical { levels } => {
                if v.fract() != 0.0 || v < 0.0 || v >= levels as f64 {
                    return Err(CodecError::MalformedPoint {
                        slot,
                        reason: format!("categorical value {v} not a level in [0, {levels})"),
                    });
                }
                out.categorical.push(v as usize);
            }
            VarKind::Integer { .. } => out.integer.push(v),
            VarKind::Continuous { .. } => out.continuous.push(v),
        }
    }

    Ok(out)
}

/// Reassembles a flat point in slot order from its typed parts.
///
/// # Errors
///
/// Returns [`CodecError::LengthMismatch`] if any part does not match the
/// corresponding variable count of `spec`.
pub fn assemble(parts: &SplitPoint, spec: &VariableSpec) -> Result<Vec<f64>, CodecError> {
    check_len("categorical part", spec.n_categorical(), parts.categorical.len())?;
    check_len("integer part", spec.n_integer(), parts.integer.len())?;
    check_len("continuous part", spec.n_continuous(), parts.continuous.len())?;

    let mut cat = parts.categorical.iter();
    let mut int = parts.integer.iter();
    let mut con = parts.continuous.iter();

    // Lengths were checked above, so every iterator yields exactly once per slot.
    let point = spec
        .slots()
        .iter()
        .filter_map(|kind| match kind {
            VarKind::Categorical { .. } => cat.next().map(|&l| l as f64),
            VarKind::Integer { .. } => int.next().copied(),
            VarKind::Continuous { .. } => con.next().copied(),
        })
        .collect();

    Ok(point)
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), CodecError> {
    if expected != got {
        return Err(CodecError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
