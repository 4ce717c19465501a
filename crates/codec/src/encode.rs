//! Categorical encodings: one-hot vectors and learned 2D embeddings.

use crate::error::CodecError;

/// Table mapping `(categorical variable, level)` to a point in ℝ².
///
/// Rows are laid out variable by variable: the row of level `l` of variable
/// `j` is `offset(j) + l`, where `offset(j)` is the cumulative level count of
/// the preceding variables. Levels of different variables never share a
/// row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    coords: Vec<[f64; 2]>,
    offsets: Vec<usize>,
    levels: Vec<usize>,
}

impl EmbeddingTable {
    /// Builds a table from a flat coordinate vector `[x₀, y₀, x₁, y₁, …]`
    /// holding two values per level.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LengthMismatch`] if `flat.len()` is not twice the
    /// total level count.
    ///
    /// # Example
    ///
    /// ```
    /// use catdist_codec::EmbeddingTable;
    ///
    /// // Two variables with 2 and 1 levels -> 3 rows.
    /// let table = EmbeddingTable::from_flat(&[0.0, 0.0, 1.0, 0.0, 0.5, 0.5], &[2, 1]).unwrap();
    /// assert_eq!(table.coord(1, 0).unwrap(), [0.5, 0.5]);
    /// ```
    pub fn from_flat(flat: &[f64], levels_per_variable: &[usize]) -> Result<Self, CodecError> {
        let total: usize = levels_per_variable.iter().sum();
        if flat.len() != 2 * total {
            return Err(CodecError::LengthMismatch {
                what: "embedding coordinates",
                expected: 2 * total,
                got: flat.len(),
            });
        }

        let coords = flat.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        let offsets = levels_per_variable
            .iter()
            .scan(0, |acc, &m| {
                let start = *acc;
                *acc += m;
                Some(start)
            })
            .collect();

        Ok(Self {
            coords,
            offsets,
            levels: levels_per_variable.to_vec(),
        })
    }

    /// Number of categorical variables covered by the table.
    pub fn n_variables(&self) -> usize {
        self.levels.len()
    }

    /// Cardinality of each categorical variable.
    pub fn levels_per_variable(&self) -> &[usize] {
        &self.levels
    }

    /// Row offset of each categorical variable.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Looks up the embedding of `level` of categorical variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::LevelOutOfRange`] if `var` or `level` is out of
    /// range.
    pub fn coord(&self, var: usize, level: usize) -> Result<[f64; 2], CodecError> {
        match self.levels.get(var) {
            Some(&levels) if level < levels => Ok(self.coords[self.offsets[var] + level]),
            Some(&levels) => Err(CodecError::LevelOutOfRange { var, level, levels }),
            None => Err(CodecError::LevelOutOfRange {
                var,
                level,
                levels: 0,
            }),
        }
    }
}

/// Concatenates the embedding of each observed level, in variable order.
///
/// The output has length `2 × cat_values.len()`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`CodecError::LengthMismatch`] | `cat_values.len()` differs from the table's variable count |
/// | [`CodecError::LevelOutOfRange`] | a level outside its variable's range |
pub fn embed_categorical(
    cat_values: &[usize],
    table: &EmbeddingTable,
) -> Result<Vec<f64>, CodecError> {
    if cat_values.len() != table.n_variables() {
        return Err(CodecError::LengthMismatch {
            what: "categorical values",
            expected: table.n_variables(),
            got: cat_values.len(),
        });
    }

    let mut out = Vec::with_capacity(2 * cat_values.len());
    for (var, &level) in cat_values.iter().enumerate() {
        out.extend_from_slice(&table.coord(var, level)?);
    }
    Ok(out)
}

/// Standard one-hot concatenation of categorical levels.
///
/// The output has length `Σ levels_per_variable`.
///
/// # Errors
///
/// Same as [`embed_categorical`].
///
/// # Example
///
/// ```
/// use catdist_codec::one_hot;
///
/// let v = one_hot(&[1, 0], &[3, 2]).unwrap();
/// assert_eq!(v, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
/// ```
pub fn one_hot(cat_values: &[usize], levels_per_variable: &[usize]) -> Result<Vec<f64>, CodecError> {
    if cat_values.len() != levels_per_variable.len() {
        return Err(CodecError::LengthMismatch {
            what: "categorical values",
            expected: levels_per_variable.len(),
            got: cat_values.len(),
        });
    }

    let total: usize = levels_per_variable.iter().sum();
    let mut out = vec![0.0; total];
    let mut offset = 0;
    for (var, (&level, &levels)) in cat_values.iter().zip(levels_per_variable).enumerate() {
        if level >= levels {
            return Err(CodecError::LevelOutOfRange { var, level, levels });
        }
        out[offset + level] = 1.0;
        offset += levels;
    }
    Ok(out)
}
