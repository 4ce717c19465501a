use anyhow::{Context, Result};
use tracing::{info, info_span};

use catdist_calibrate::{Dataset, HybridSearch, calibrate, recalibration_budget_reached};
use catdist_io::{read_cache, write_params};

use crate::Status;
use crate::cli::CalibrateArgs;
use crate::config;
use crate::convert;

/// Runs the `calibrate` subcommand.
///
/// Reads the evaluation history from the cache, calibrates the distance
/// parameters and persists them. Reports [`Status::BudgetReached`] once
/// enough evaluations exist that the host should stop recalibrating.
pub fn run(args: CalibrateArgs) -> Result<Status> {
    let _span = info_span!("calibrate").entered();

    let config = config::load(args.config.as_deref())?;
    let cache_path = args.cache.unwrap_or(config.io.cache);
    let params_path = args.params.unwrap_or(config.io.params);

    let cache = read_cache(&cache_path)
        .with_context(|| format!("failed to read cache: {}", cache_path.display()))?;
    let spec = cache
        .variable_spec()
        .context("invalid variable bounds in cache")?;

    let seed = args.seed.or(config.seed).unwrap_or(cache.seed);
    let cal_config = convert::build_calibration_config(&config.calibration, seed)?;

    let training = convert::training_set(&cache);
    info!(
        evaluations = training.len(),
        variables = spec.len(),
        seed,
        "loaded evaluation history"
    );
    let dataset =
        Dataset::from_training(&training, &spec).context("failed to prepare training data")?;

    let optimizer = HybridSearch::new(cal_config.lhs_fraction());
    let outcome =
        calibrate(&dataset, &spec, &cal_config, &optimizer).context("calibration failed")?;

    write_params(&params_path, outcome.params().values())
        .with_context(|| format!("failed to write parameters: {}", params_path.display()))?;
    info!(
        path = %params_path.display(),
        objective = outcome.objective(),
        evaluations = outcome.evaluations(),
        failed = outcome.failed(),
        "parameters written"
    );

    if recalibration_budget_reached(
        cache.evaluations.len(),
        cache.budget_per_variable,
        spec.len(),
        config.calibration.stop_fraction,
    ) {
        info!(
            evaluations = cache.evaluations.len(),
            stop_fraction = config.calibration.stop_fraction,
            "recalibration budget reached"
        );
        return Ok(Status::BudgetReached);
    }

    Ok(Status::Done)
}
