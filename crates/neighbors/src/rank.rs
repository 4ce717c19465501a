//! Ranking of categorical combinations by calibrated distance.

use catdist_codec::{SplitPoint, VariableSpec, assemble, categorical_combinations, split};
use catdist_metric::{CalibratedMetric, Distance, MetricParams};
use tracing::debug;

use crate::error::NeighborError;

/// A proposed point differing from the current one only in its categorical
/// levels.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborCandidate {
    /// Categorical levels of the candidate.
    pub combination: Vec<usize>,
    /// Full candidate point in slot order.
    pub point: Vec<f64>,
    /// `point − current`, per slot.
    pub direction: Vec<f64>,
    /// Categorical distance from the current assignment.
    pub distance: f64,
}

/// Returns the `m` combinations closest to the categorical part of
/// `current`, nearest first.
///
/// `metric` must compare categorical encodings only (see
/// [`MetricParams::bind_categorical`]). The current combination gets
/// distance `+∞` and is never returned. Ties keep the order of
/// `combinations`; with [`categorical_combinations`] that is lexicographic
/// order.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`NeighborError::InsufficientCandidates`] | `m > combinations.len() - 1` |
/// | [`NeighborError::Codec`] | `current` does not fit `spec` |
/// | [`NeighborError::Metric`] | a combination cannot be encoded |
#[tracing::instrument(skip_all, fields(m = m, combinations = combinations.len()))]
pub fn rank_neighbors(
    spec: &VariableSpec,
    metric: &CalibratedMetric,
    current: &[f64],
    combinations: &[Vec<usize>],
    m: usize,
) -> Result<Vec<NeighborCandidate>, NeighborError> {
    let available = combinations.len().saturating_sub(1);
    if m > available {
        return Err(NeighborError::InsufficientCandidates {
            requested: m,
            available,
        });
    }

    let parts = split(current, spec)?;
    let here = metric.encode_categorical(&parts.categorical)?;

    let mut distances = Vec::with_capacity(combinations.len());
    for combination in combinations {
        let d = if *combination == parts.categorical {
            f64::INFINITY
        } else {
            metric.distance(&here, &metric.encode_categorical(combination)?)?
        };
        distances.push(d);
    }

    // Stable, so equal distances keep enumeration order.
    let mut order: Vec<usize> = (0..combinations.len()).collect();
    order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

    let mut out = Vec::with_capacity(m);
    for &idx in order.iter().take(m) {
        let candidate = SplitPoint {
            categorical: combinations[idx].clone(),
            integer: parts.integer.clone(),
            continuous: parts.continuous.clone(),
        };
        let point = assemble(&candidate, spec)?;
        let direction = point.iter().zip(current).map(|(c, x)| c - x).collect();
        out.push(NeighborCandidate {
            combination: candidate.categorical,
            point,
            direction,
            distance: distances[idx],
        });
    }

    debug!(
        nearest = ?out.first().map(|c| c.distance),
        "neighbors ranked"
    );
    Ok(out)
}

/// Enumerates every combination of `spec` and ranks them under the
/// categorical part of `params`.
///
/// # Errors
///
/// Same as [`rank_neighbors`], plus metric binding and enumeration errors.
pub fn propose_neighbors(
    spec: &VariableSpec,
    params: &MetricParams,
    p: f64,
    current: &[f64],
    m: usize,
) -> Result<Vec<NeighborCandidate>, NeighborError> {
    let metric = params.bind_categorical(p)?;
    let combinations = categorical_combinations(spec.levels_per_variable())?;
    rank_neighbors(spec, &metric, current, &combinations, m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use catdist_codec::VarKind;

    fn spec() -> VariableSpec {
        VariableSpec::new(vec![
            VarKind::Categorical { levels: 3 },
            VarKind::Continuous {
                lower: 0.0,
                upper: 1.0,
            },
        ])
        .unwrap()
    }

    fn embedding_params(coords: [f64; 6]) -> MetricParams {
        let mut values = vec![1.0, 1.0];
        values.extend(coords);
        MetricParams::from_flat(&spec(), values).unwrap()
    }

    #[test]
    fn nearest_first_excluding_self() {
        // level 0 at origin, level 2 close, level 1 far
        let params = embedding_params([0.0, 0.0, 0.9, 0.9, 0.1, 0.0]);
        let out = propose_neighbors(&spec(), &params, 2.0, &[0.0, 0.4], 2).unwrap();
        let combos: Vec<_> = out.iter().map(|c| c.combination.clone()).collect();
        assert_eq!(combos, vec![vec![2], vec![1]]);
        assert_abs_diff_eq!(out[0].distance, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn candidate_keeps_quantitative_values() {
        let params = embedding_params([0.0, 0.0, 0.9, 0.9, 0.1, 0.0]);
        let out = propose_neighbors(&spec(), &params, 2.0, &[1.0, 0.4], 1).unwrap();
        assert_eq!(out[0].point, vec![2.0, 0.4]);
        assert_eq!(out[0].direction, vec![1.0, 0.0]);
    }

    #[test]
    fn ties_follow_enumeration_order() {
        // Every other level equidistant from level 1.
        let params = embedding_params([0.0, 0.0, 0.5, 0.0, 1.0, 0.0]);
        let out = propose_neighbors(&spec(), &params, 2.0, &[1.0, 0.0], 2).unwrap();
        assert_eq!(out[0].combination, vec![0]);
        assert_eq!(out[1].combination, vec![2]);
    }

    #[test]
    fn zero_neighbors_is_empty() {
        let params = embedding_params([0.0; 6]);
        assert!(propose_neighbors(&spec(), &params, 2.0, &[0.0, 0.0], 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn too_many_requested() {
        let params = embedding_params([0.0; 6]);
        let err = propose_neighbors(&spec(), &params, 2.0, &[0.0, 0.0], 3).unwrap_err();
        assert_eq!(
            err,
            NeighborError::InsufficientCandidates {
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn malformed_current_point() {
        let params = embedding_params([0.0; 6]);
        let err = propose_neighbors(&spec(), &params, 2.0, &[5.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, NeighborError::Codec(_)));
    }

    #[test]
    fn one_hot_metric_weights_variables() {
        let spec = VariableSpec::new(vec![
            VarKind::Categorical { levels: 2 },
            VarKind::Categorical { levels: 2 },
        ])
        .unwrap();
        // Changing variable 1 is cheaper than changing variable 0.
        let params = MetricParams::from_flat(&spec, vec![1.0, 0.1]).unwrap();
        let out = propose_neighbors(&spec, &params, 2.0, &[0.0, 0.0], 3).unwrap();
        let combos: Vec<_> = out.iter().map(|c| c.combination.clone()).collect();
        assert_eq!(combos, vec![vec![0, 1], vec![1, 0], vec![1, 1]]);
    }
}
