//! Integration tests: split, normalize and encode a batch of points.

use approx::assert_abs_diff_eq;
use catdist_codec::{
    CodecError, EmbeddingTable, VarKind, VariableSpec, assemble, categorical_combinations,
    embed_categorical, normalize, one_hot, split,
};

fn spec() -> VariableSpec {
    VariableSpec::new(vec![
        VarKind::Categorical { levels: 2 },
        VarKind::Categorical { levels: 3 },
        VarKind::Integer {
            lower: 1.0,
            upper: 9.0,
        },
        VarKind::Continuous {
            lower: -1.0,
            upper: 1.0,
        },
    ])
    .unwrap()
}

#[test]
fn split_normalize_embed() {
    let spec = spec();
    let parts = split(&[1.0, 2.0, 5.0, 0.5], &spec).unwrap();

    let (ilo, ihi) = spec.integer_bounds();
    let (clo, chi) = spec.continuous_bounds();
    let int_n = normalize(&parts.integer, &ilo, &ihi).unwrap();
    let con_n = normalize(&parts.continuous, &clo, &chi).unwrap();
    assert_abs_diff_eq!(int_n[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(con_n[0], 0.75, epsilon = 1e-12);

    // 5 levels in total -> 10 coordinates
    let flat: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
    let table = EmbeddingTable::from_flat(&flat, spec.levels_per_variable()).unwrap();
    let emb = embed_categorical(&parts.categorical, &table).unwrap();
    // var 0 level 1 -> row 1; var 1 level 2 -> row 2 + 2 = 4
    assert_eq!(emb, vec![0.2, 0.3, 0.8, 0.9]);

    let oh = one_hot(&parts.categorical, spec.levels_per_variable()).unwrap();
    assert_eq!(oh, vec![0.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn every_combination_reassembles_to_a_valid_point() {
    let spec = spec();
    let base = split(&[0.0, 0.0, 3.0, 0.0], &spec).unwrap();
    for combo in categorical_combinations(spec.levels_per_variable()).unwrap() {
        let mut parts = base.clone();
        parts.categorical = combo.clone();
        let point = assemble(&parts, &spec).unwrap();
        assert_eq!(split(&point, &spec).unwrap().categorical, combo);
    }
}

#[test]
fn degenerate_integer_bounds_fail_normalization() {
    let spec = VariableSpec::new(vec![VarKind::Integer {
        lower: 4.0,
        upper: 4.0,
    }])
    .unwrap();
    let parts = split(&[4.0], &spec).unwrap();
    let (lo, hi) = spec.integer_bounds();
    assert!(matches!(
        normalize(&parts.integer, &lo, &hi),
        Err(CodecError::DegenerateBounds { dim: 0, .. })
    ));
}
