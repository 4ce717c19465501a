//! Integration tests: IDW over encoded mixed-variable points.

use approx::assert_abs_diff_eq;
use catdist_codec::{VarKind, VariableSpec};
use catdist_idw::{IdwError, IdwPredictor};
use catdist_metric::{MetricParams, WeightedLp};

#[test]
fn query_equal_to_second_training_point() {
    let metric = WeightedLp::new(vec![1.0; 3], 2.0).unwrap();
    let points = vec![
        vec![0.0, 0.1, 0.2],
        vec![0.5, 0.5, 0.5],
        vec![1.0, 0.9, 0.8],
    ];
    let model = IdwPredictor::new(points, vec![1.0, 2.0, 3.0], &metric).unwrap();
    assert_eq!(model.predict(&[0.5, 0.5, 0.5]).unwrap(), 2.0);
}

#[test]
fn prediction_lies_within_response_range() {
    let metric = WeightedLp::new(vec![1.0, 1.0], 2.0).unwrap();
    let points: Vec<Vec<f64>> = (0..10)
        .map(|i| vec![i as f64 / 10.0, (i * i) as f64 / 100.0])
        .collect();
    let values: Vec<f64> = (0..10).map(|i| (i as f64).sin()).collect();
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let model = IdwPredictor::new(points, values, &metric).unwrap();

    for q in [[0.05, 0.3], [0.33, 0.01], [0.95, 0.95]] {
        let y = model.predict(&q).unwrap();
        assert!(y >= lo - 1e-12 && y <= hi + 1e-12);
    }
}

#[test]
fn works_over_calibrated_embedding_metric() {
    let spec = VariableSpec::new(vec![
        VarKind::Categorical { levels: 2 },
        VarKind::Continuous {
            lower: 0.0,
            upper: 1.0,
        },
    ])
    .unwrap();
    let params = MetricParams::from_flat(&spec, vec![1.0, 1.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
    let metric = params.bind(2.0).unwrap();

    let train = vec![
        metric.encode(&[0], &[0.0]).unwrap(),
        metric.encode(&[1], &[0.0]).unwrap(),
    ];
    let model = IdwPredictor::new(train, vec![0.0, 1.0], &metric).unwrap();

    // Each query sits one unit away from the training point sharing its level.
    let q = metric.encode(&[0], &[1.0]).unwrap();
    let r = metric.encode(&[1], &[1.0]).unwrap();
    let pq = model.predict(&q).unwrap();
    let pr = model.predict(&r).unwrap();
    assert!(pq < 0.5 && pr > 0.5);
    assert_abs_diff_eq!(pq + pr, 1.0, epsilon = 1e-12);

    assert!(matches!(model.rmse(&[q], &[]), Err(IdwError::LengthMismatch { .. })));
}
