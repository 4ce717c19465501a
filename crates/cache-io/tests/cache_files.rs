//! Integration test: cache file on disk through to parameter and direction
//! files.

use catdist_io::{IoError, read_cache, read_params, write_directions, write_params};

const CACHE: &str = "\
Variable types: ( I I I R )
Number of cat, int and cont: 2 1 1
Lower bounds: ( 0 0 -3 0 )
Upper bounds: ( 1 3 3 1 )
Current step: SEARCH
Current frame (poll) or feasible (search) : ( 0 2 1 0.25 )
Current frame (poll) or infeasible (search): ( - - - - )
Best current function values: 0.5 - -
Nb of cat neighbors: 3
Seed: 42
Budget per variables: 50
( 0 2 1 0.25 ) BB_EVAL_OK ( 0.5 )
( 1 0 -2 0.75 ) BB_EVAL_OK ( 2.5 )
( 1 3 0 0.1 ) BB_EVAL_OK ( 1.7 )
";

#[test]
fn read_cache_from_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("cachePts.txt");
    std::fs::write(&path, CACHE).expect("write cache");

    let cache = read_cache(&path).expect("cache parses");
    let spec = cache.variable_spec().expect("valid spec");
    assert_eq!(spec.levels_per_variable(), &[2, 4]);
    assert_eq!(spec.n_integer(), 1);
    assert_eq!(cache.current_point().unwrap(), &[0.0, 2.0, 1.0, 0.25]);
    assert_eq!(cache.evaluations.len(), 3);
    assert_eq!(cache.n_neighbors, 3);
    assert_eq!(cache.seed, 42);
}

#[test]
fn missing_cache_is_file_not_found() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = read_cache(&dir.path().join("cachePts.txt")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn params_and_directions_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let params = dir.path().join("params.json");
    let directions = dir.path().join("catDirections.txt");

    write_params(&params, &[1.0, 0.5, 1.0, 1.0]).expect("write params");
    assert_eq!(read_params(&params).unwrap(), vec![1.0, 0.5, 1.0, 1.0]);

    write_directions(&directions, &["(1 0 0 0.000000)".to_string()]).expect("write directions");
    let text = std::fs::read_to_string(&directions).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn huge_categorical_upper_bound_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("cachePts.txt");
    for bound in ["1e20", "1e15", "inf", "1.5"] {
        let text = CACHE.replace(
            "Upper bounds: ( 1 3 3 1 )",
            &format!("Upper bounds: ( {bound} 3 3 1 )"),
        );
        std::fs::write(&path, text).expect("write cache");
        match read_cache(&path) {
            Err(IoError::Validation { count, details }) => {
                assert_eq!(count, 1, "{bound}: {details}");
                assert!(details.contains("slot 0"), "{bound}: {details}");
            }
            other => panic!("{bound}: expected Validation, got {other:?}"),
        }
    }
}
