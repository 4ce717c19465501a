//! Text form of a move direction.

use catdist_codec::VariableSpec;

use crate::error::NeighborError;

/// Formats a direction as `(d1 d2 … dn)` in slot order.
///
/// Categorical and integer entries are written as integers, continuous
/// entries with six decimals.
///
/// # Errors
///
/// Returns [`NeighborError::DimensionMismatch`] if `direction.len()` differs
/// from `spec.len()`.
///
/// # Example
///
/// ```
/// use catdist_codec::{VarKind, VariableSpec};
/// use catdist_neighbors::format_direction;
///
/// let spec = VariableSpec::new(vec![
///     VarKind::Categorical { levels: 3 },
///     VarKind::Continuous { lower: 0.0, upper: 1.0 },
/// ])
/// .unwrap();
/// assert_eq!(format_direction(&spec, &[-2.0, 0.0]).unwrap(), "(-2 0.000000)");
/// ```
pub fn format_direction(spec: &VariableSpec, direction: &[f64]) -> Result<String, NeighborError> {
    if direction.len() != spec.len() {
        return Err(NeighborError::DimensionMismatch {
            expected: spec.len(),
            got: direction.len(),
        });
    }

    let entries: Vec<String> = direction
        .iter()
        .zip(spec.slots())
        .map(|(&d, kind)| {
            if kind.is_integral() {
                format!("{}", d.round() as i64)
            } else {
                format!("{d:.6}")
            }
        })
        .collect();
    Ok(format!("({})", entries.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdist_codec::VarKind;

    fn spec() -> VariableSpec {
        VariableSpec::new(vec![
            VarKind::Categorical { levels: 4 },
            VarKind::Integer {
                lower: -3.0,
                upper: 3.0,
            },
            VarKind::Continuous {
                lower: 0.0,
                upper: 1.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn mixed_types() {
        let s = format_direction(&spec(), &[3.0, -1.0, 0.25]).unwrap();
        assert_eq!(s, "(3 -1 0.250000)");
    }

    #[test]
    fn float_noise_on_integral_slots_is_rounded() {
        let s = format_direction(&spec(), &[0.9999999999, -1e-12, 0.0]).unwrap();
        assert_eq!(s, "(1 0 0.000000)");
    }

    #[test]
    fn length_checked() {
        assert_eq!(
            format_direction(&spec(), &[1.0]).unwrap_err(),
            NeighborError::DimensionMismatch {
                expected: 3,
                got: 1
            }
        );
    }
}
