//! Ordered variable specification shared by points, bounds and metric
//! parameter layouts.

use crate::error::CodecError;

/// Type tag of a single variable slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// Unordered variable taking level indices `0..levels`.
    Categorical {
        /// Number of levels (cardinality).
        levels: usize,
    },
    /// Integer-valued variable in `[lower, upper]`.
    Integer {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
    /// Real-valued variable in `[lower, upper]`.
    Continuous {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
}

impl VarKind {
    /// Returns `true` for categorical slots.
    pub fn is_categorical(&self) -> bool {
        matches!(self, VarKind::Categorical { .. })
    }

    /// Returns `true` when values of this slot are integral (categorical or
    /// integer).
    pub fn is_integral(&self) -> bool {
        !matches!(self, VarKind::Continuous { .. })
    }
}

/// Ordered list of variable slots.
///
/// Slot order is fixed for a run. Sub-vectors produced by
/// [`split`](crate::split) and every per-variable parameter layout list the
/// categorical variables first, then the integer ones, then the continuous
/// ones, each group in slot order.
///
/// # Example
///
/// ```
/// use catdist_codec::{VarKind, VariableSpec};
///
/// let spec = VariableSpec::new(vec![
///     VarKind::Categorical { levels: 3 },
///     VarKind::Integer { lower: 0.0, upper: 10.0 },
///     VarKind::Continuous { lower: -1.0, upper: 1.0 },
/// ])
/// .unwrap();
///
/// assert_eq!(spec.n_categorical(), 1);
/// assert_eq!(spec.levels_per_variable(), &[3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    slots: Vec<VarKind>,
    levels: Vec<usize>,
    n_integer: usize,
    n_continuous: usize,
}

impl VariableSpec {
    /// Builds a specification, validating every slot.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CodecError::EmptyCategorical`] | a categorical slot with zero levels |
    /// | [`CodecError::InvalidBounds`] | non-finite bounds or `lower > upper` |
    pub fn new(slots: Vec<VarKind>) -> Result<Self, CodecError> {
        let mut levels = Vec::new();
        let mut n_integer = 0;
        let mut n_continuous = 0;

        for (slot, kind) in slots.iter().enumerate() {
            match *kind {
                VarKind::Categorical { levels: 0 } => {
                    return Err(CodecError::EmptyCategorical { slot });
                }
                VarKind::Categorical { levels: m } => levels.push(m),
                VarKind::Integer { lower, upper } | VarKind::Continuous { lower, upper } => {
                    if !lower.is_finite() || !upper.is_finite() || lower > upper {
                        return Err(CodecError::InvalidBounds { slot, lower, upper });
                    }
                    if kind.is_integral() {
                        n_integer += 1;
                    } else {
                        n_continuous += 1;
                    }
                }
            }
        }

        Ok(Self {
            slots,
            levels,
            n_integer,
            n_continuous,
        })
    }

    /// Returns the slots in order.
    pub fn slots(&self) -> &[VarKind] {
        &self.slots
    }

    /// Returns the total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of categorical variables.
    pub fn n_categorical(&self) -> usize {
        self.levels.len()
    }

    /// Number of integer variables.
    pub fn n_integer(&self) -> usize {
        self.n_integer
    }

    /// Number of continuous variables.
    pub fn n_continuous(&self) -> usize {
        self.n_continuous
    }

    /// Cardinality of each categorical variable, in categorical order.
    pub fn levels_per_variable(&self) -> &[usize] {
        &self.levels
    }

    /// Sum of the cardinalities of all categorical variables.
    pub fn total_levels(&self) -> usize {
        self.levels.iter().sum()
    }

    /// Lower and upper bounds of the integer variables, in integer order.
    pub fn integer_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        self.bounds_where(|k| matches!(k, VarKind::Integer { .. }))
    }

    /// Lower and upper bounds of the continuous variables, in continuous order.
    pub fn continuous_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        self.bounds_where(|k| matches!(k, VarKind::Continuous { .. }))
    }

    fn bounds_where(&self, pred: impl Fn(&VarKind) -> bool) -> (Vec<f64>, Vec<f64>) {
        self.slots
            .iter()
            .filter(|k| pred(k))
            .filter_map(|k| match *k {
                VarKind::Integer { lower, upper } | VarKind::Continuous { lower, upper } => {
                    Some((lower, upper))
                }
                VarKind::Categorical { .. } => None,
            })
            .unzip()
    }
}
