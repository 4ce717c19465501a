//! Parser for the problem/cache file written by the host optimizer.
//!
//! The file starts with eleven `label: value` header lines in fixed order,
//! followed by one line per historical evaluation:
//!
//! ```text
//! Variable types: ( I I R )
//! Number of cat, int and cont: 1 1 1
//! Lower bounds: ( 0 0 -5 )
//! Upper bounds: ( 2 10 5 )
//! Current step: POLL
//! Current frame (poll) or feasible (search) : ( 1 3 0.5 )
//! Current frame (poll) or infeasible (search): ( - - - )
//! Best current function values: 1.25 inf 0
//! Nb of cat neighbors: 2
//! Seed: 0
//! Budget per variables: 100
//! ( 1 3 0.5 ) BB_EVAL_OK ( 1.25 -0.3 )
//! ```
//!
//! Labels are free text up to the first `:`. Only evaluation lines carrying
//! `BB_EVAL_OK` are kept.

use std::path::Path;
use std::str::FromStr;

use catdist_codec::{VarKind, VariableSpec};
use tracing::{debug, info};

use crate::error::IoError;
use crate::validate::ValidationCollector;

const EVAL_OK: &str = "BB_EVAL_OK";

/// Largest number of levels accepted for one categorical variable.
pub const MAX_CATEGORICAL_LEVELS: usize = 1 << 16;

/// Variable type code as written by the host optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// `I`: integer-coded (categorical when among the first `nb_cat` slots).
    Integer,
    /// `R`: real-valued.
    Real,
    /// `B`: binary, handled as an integer in `[0, 1]`.
    Binary,
}

impl TypeCode {
    /// The code as written in the cache file.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeCode::Integer => "I",
            TypeCode::Real => "R",
            TypeCode::Binary => "B",
        }
    }
}

impl FromStr for TypeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" => Ok(TypeCode::Integer),
            "R" => Ok(TypeCode::Real),
            "B" => Ok(TypeCode::Binary),
            other => Err(format!("unknown variable type '{other}'")),
        }
    }
}

/// Number of variables of each kind, in slot order cat → int → con.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCounts {
    /// Categorical variables.
    pub categorical: usize,
    /// Integer variables.
    pub integer: usize,
    /// Continuous variables.
    pub continuous: usize,
}

impl TypeCounts {
    /// Total number of variables.
    pub fn total(&self) -> usize {
        self.categorical
            .saturating_add(self.integer)
            .saturating_add(self.continuous)
    }
}

/// One successful blackbox evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Evaluated point in slot order.
    pub point: Vec<f64>,
    /// Objective value.
    pub objective: f64,
    /// Constraint values, possibly empty.
    pub constraints: Vec<f64>,
}

/// Contents of a problem/cache file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemCache {
    /// Type code of every slot.
    pub types: Vec<TypeCode>,
    /// Variable counts per kind.
    pub counts: TypeCounts,
    /// Lower bound of every slot.
    pub lower: Vec<f64>,
    /// Upper bound of every slot.
    pub upper: Vec<f64>,
    /// Search step tag of the host optimizer.
    pub step: String,
    /// Current feasible frame point, if defined.
    pub feasible_frame: Option<Vec<f64>>,
    /// Current infeasible frame point, if defined.
    pub infeasible_frame: Option<Vec<f64>>,
    /// Best objective values so far; undefined entries are NaN.
    pub best_values: Vec<f64>,
    /// Number of categorical neighbors requested.
    pub n_neighbors: usize,
    /// Random seed of the run.
    pub seed: u64,
    /// Evaluation budget per variable.
    pub budget_per_variable: usize,
    /// Successful evaluations, in file order.
    pub evaluations: Vec<Evaluation>,
}

impl ProblemCache {
    /// Number of variables.
    pub fn n_variables(&self) -> usize {
        self.types.len()
    }

    /// Builds the variable specification.
    ///
    /// The first `counts.categorical` slots are categorical with
    /// `upper + 1` levels. The remaining slots are continuous for `R` and
    /// integer otherwise.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IoError::Validation`] | bound vectors of the wrong length, or a categorical upper bound that is not an integer in `[0, MAX_CATEGORICAL_LEVELS)` |
    /// | [`IoError::Codec`] | bounds rejected by [`VariableSpec::new`] |
    pub fn variable_spec(&self) -> Result<VariableSpec, IoError> {
        let n = self.types.len();
        let mut checks = ValidationCollector::new();
        checks.check_len("lower bounds", n, self.lower.len());
        checks.check_len("upper bounds", n, self.upper.len());
        checks.finish()?;

        let mut slots = Vec::with_capacity(n);
        for (i, code) in self.types.iter().enumerate() {
            let (lower, upper) = (self.lower[i], self.upper[i]);
            let kind = if i < self.counts.categorical {
                let levels = categorical_levels(upper).ok_or_else(|| IoError::Validation {
                    count: 1,
                    details: bad_cardinality(i, upper),
                })?;
                VarKind::Categorical { levels }
            } else if *code == TypeCode::Real {
                VarKind::Continuous { lower, upper }
            } else {
                VarKind::Integer { lower, upper }
            };
            slots.push(kind);
        }
        Ok(VariableSpec::new(slots)?)
    }

    /// The point neighbors are proposed around: the feasible frame point,
    /// or the infeasible one when no feasible point exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::NoCurrentPoint`] if both are undefined.
    pub fn current_point(&self) -> Result<&[f64], IoError> {
        self.feasible_frame
            .as_deref()
            .or(self.infeasible_frame.as_deref())
            .ok_or(IoError::NoCurrentPoint)
    }
}

/// Reads and parses a problem/cache file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::Io`] if it cannot be read, and every error of
/// [`parse_cache`].
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_cache(path: &Path) -> Result<ProblemCache, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cache = parse_cache(&text)?;
    info!(
        variables = cache.n_variables(),
        evaluations = cache.evaluations.len(),
        step = %cache.step,
        "cache loaded"
    );
    Ok(cache)
}

/// Parses the text of a problem/cache file.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::MissingSection`] | a header line is missing or has no `:` |
/// | [`IoError::Parse`] | an unparsable number or type code, or a malformed evaluation line |
/// | [`IoError::Validation`] | header vectors disagree in length, a type code does not fit the cat → int → con slot order, or a categorical slot has bounds outside `[0, MAX_CATEGORICAL_LEVELS)` |
pub fn parse_cache(text: &str) -> Result<ProblemCache, IoError> {
    let mut header = Header::new(text);

    let types: Vec<TypeCode> = header.field("variable types")?.parse_all()?;
    let counts: Vec<usize> = header.field("variable counts")?.parse_all()?;
    let lower: Vec<f64> = header.field("lower bounds")?.parse_all()?;
    let upper: Vec<f64> = header.field("upper bounds")?.parse_all()?;
    let step = header.field("current step")?.value.to_string();
    let feasible_frame = header.field("feasible frame point")?.optional_point()?;
    let infeasible_frame = header.field("infeasible frame point")?.optional_point()?;
    let best_values = header.field("best values")?.lenient_floats()?;
    let n_neighbors = header.field("neighbor count")?.parse_one()?;
    let seed = header.field("seed")?.parse_one()?;
    let budget_per_variable = header.field("budget per variable")?.parse_one()?;

    let counts = match counts.as_slice() {
        &[categorical, integer, continuous] => TypeCounts {
            categorical,
            integer,
            continuous,
        },
        other => {
            return Err(IoError::Parse {
                line: 2,
                section: "variable counts",
                reason: format!("expected 3 counts, got {}", other.len()),
            });
        }
    };

    let n = types.len();
    let mut checks = ValidationCollector::new();
    checks.check_len("variable counts", n, counts.total());
    checks.check_len("lower bounds", n, lower.len());
    checks.check_len("upper bounds", n, upper.len());
    for (what, frame) in [("feasible frame", &feasible_frame), ("infeasible frame", &infeasible_frame)] {
        if let Some(point) = frame {
            checks.check_len(what, n, point.len());
        }
    }
    let quantitative_start = counts.categorical.saturating_add(counts.integer);
    for (i, &code) in types.iter().enumerate() {
        let continuous = i >= quantitative_start;
        if continuous != (code == TypeCode::Real) {
            let kind = if i < counts.categorical {
                "categorical"
            } else if continuous {
                "continuous"
            } else {
                "integer"
            };
            checks.push(format!(
                "slot {i}: {kind} variable cannot have type {}",
                code.as_str()
            ));
        }
    }
    for i in 0..counts.categorical.min(n) {
        if let (Some(&lo), Some(&hi)) = (lower.get(i), upper.get(i)) {
            if lo != 0.0 {
                checks.push(format!(
                    "slot {i}: categorical lower bound must be 0, got {lo}"
                ));
            }
            if categorical_levels(hi).is_none() {
                checks.push(bad_cardinality(i, hi));
            }
        }
    }
    checks.finish()?;

    let mut evaluations = Vec::new();
    let mut skipped = 0usize;
    for (line, raw) in header.rest() {
        if raw.trim().is_empty() {
            continue;
        }
        if !raw.contains(EVAL_OK) {
            skipped += 1;
            continue;
        }
        evaluations.push(parse_evaluation(line, raw, n)?);
    }
    if skipped > 0 {
        debug!(skipped, "ignored cache lines without {EVAL_OK}");
    }

    Ok(ProblemCache {
        types,
        counts,
        lower,
        upper,
        step,
        feasible_frame,
        infeasible_frame,
        best_values,
        n_neighbors,
        seed,
        budget_per_variable,
        evaluations,
    })
}

/// Level count of a categorical slot with upper bound `upper`, if it is an
/// integer in `[0, MAX_CATEGORICAL_LEVELS)`.
fn categorical_levels(upper: f64) -> Option<usize> {
    if !(upper >= 0.0 && upper.fract() == 0.0 && upper < MAX_CATEGORICAL_LEVELS as f64) {
        return None;
    }
    (upper as usize).checked_add(1)
}

fn bad_cardinality(slot: usize, upper: f64) -> String {
    format!(
        "slot {slot}: categorical upper bound must be an integer in [0, {}), got {upper}",
        MAX_CATEGORICAL_LEVELS
    )
}

fn parse_evaluation(line: usize, raw: &str, n: usize) -> Result<Evaluation, IoError> {
    let parse_err = |reason: String| IoError::Parse {
        line,
        section: "evaluation",
        reason,
    };

    let point_text = first_group(raw).ok_or_else(|| parse_err("missing point".to_string()))?;
    let point = parse_numbers::<f64>(point_text).map_err(&parse_err)?;
    if point.len() != n {
        return Err(parse_err(format!(
            "point has {} values, expected {n}",
            point.len()
        )));
    }

    let (_, after) = raw
        .split_once(EVAL_OK)
        .ok_or_else(|| parse_err(format!("missing {EVAL_OK}")))?;
    let values_text =
        first_group(after).ok_or_else(|| parse_err("missing objective values".to_string()))?;
    let values = parse_numbers::<f64>(values_text).map_err(&parse_err)?;
    let (&objective, constraints) = values
        .split_first()
        .ok_or_else(|| parse_err("empty objective values".to_string()))?;

    Ok(Evaluation {
        point,
        objective,
        constraints: constraints.to_vec(),
    })
}

/// Text between the first `(` and the following `)`.
fn first_group(text: &str) -> Option<&str> {
    let start = text.find('(')? + 1;
    let len = text[start..].find(')')?;
    Some(&text[start..start + len])
}

fn parse_numbers<T: FromStr>(text: &str) -> Result<Vec<T>, String> {
    text.split_whitespace()
        .map(|tok| tok.parse().map_err(|_| format!("invalid number '{tok}'")))
        .collect()
}

/// Sequential reader of the header lines.
struct Header<'t> {
    lines: std::iter::Enumerate<std::str::Lines<'t>>,
    last_line: usize,
}

impl<'t> Header<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn field(&mut self, section: &'static str) -> Result<Field<'t>, IoError> {
        let (idx, raw) = self.lines.next().ok_or(IoError::MissingSection {
            line: self.last_line + 1,
            section,
        })?;
        let line = idx + 1;
        self.last_line = line;
        let (_, value) = raw
            .split_once(':')
            .ok_or(IoError::MissingSection { line, section })?;
        Ok(Field {
            line,
            section,
            value: value.trim(),
        })
    }

    /// Remaining lines with their 1-based line numbers.
    fn rest(self) -> impl Iterator<Item = (usize, &'t str)> {
        self.lines.map(|(idx, raw)| (idx + 1, raw))
    }
}

/// One header value with its position, for error reporting.
struct Field<'t> {
    line: usize,
    section: &'static str,
    value: &'t str,
}

impl Field<'_> {
    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.value
            .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .filter(|t| !t.is_empty())
    }

    fn error(&self, reason: String) -> IoError {
        IoError::Parse {
            line: self.line,
            section: self.section,
            reason,
        }
    }

    fn parse_all<T: FromStr>(&self) -> Result<Vec<T>, IoError> {
        self.tokens()
            .map(|tok| {
                tok.parse()
                    .map_err(|_| self.error(format!("invalid value '{tok}'")))
            })
            .collect()
    }

    fn parse_one<T: FromStr>(&self) -> Result<T, IoError> {
        let tok = self
            .tokens()
            .next()
            .ok_or_else(|| self.error("missing value".to_string()))?;
        tok.parse()
            .map_err(|_| self.error(format!("invalid value '{tok}'")))
    }

    /// Floats where `-` stands for an undefined value (NaN).
    fn lenient_floats(&self) -> Result<Vec<f64>, IoError> {
        self.tokens()
            .map(|tok| match tok {
                "-" => Ok(f64::NAN),
                _ => tok
                    .parse()
                    .map_err(|_| self.error(format!("invalid value '{tok}'"))),
            })
            .collect()
    }

    /// A point, or `None` when every entry is `-`.
    fn optional_point(&self) -> Result<Option<Vec<f64>>, IoError> {
        if self.tokens().all(|t| t == "-") {
            return Ok(None);
        }
        self.parse_all().map(Some)
    }
}
