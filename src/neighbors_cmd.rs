use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use catdist_io::{read_cache, read_params, write_directions};
use catdist_metric::MetricParams;
use catdist_neighbors::{format_direction, propose_neighbors};

use crate::Status;
use crate::cli::NeighborsArgs;
use crate::config;

/// Runs the `neighbors` subcommand.
///
/// Ranks every categorical combination around the current frame point
/// under the persisted parameters and writes the nearest ones as
/// directions, one per line.
pub fn run(args: NeighborsArgs) -> Result<Status> {
    let _span = info_span!("neighbors").entered();

    let config = config::load(args.config.as_deref())?;
    let cache_path = args.cache.unwrap_or(config.io.cache);
    let params_path = args.params.unwrap_or(config.io.params);
    let directions_path = args.directions.unwrap_or(config.io.directions);

    let cache = read_cache(&cache_path)
        .with_context(|| format!("failed to read cache: {}", cache_path.display()))?;
    let spec = cache
        .variable_spec()
        .context("invalid variable bounds in cache")?;

    let values = read_params(&params_path).with_context(|| {
        format!(
            "failed to read parameters: {} (run `catdist calibrate` first)",
            params_path.display()
        )
    })?;
    let params = MetricParams::from_flat(&spec, values)
        .context("parameters do not match the variables in the cache")?;
    debug!(variant = ?params.layout().variant(), "loaded parameters");

    let current = cache.current_point().context("cache has no frame point")?;
    let m = args.count.unwrap_or(cache.n_neighbors);

    let neighbors = propose_neighbors(&spec, &params, config.calibration.p, current, m)
        .context("neighbor ranking failed")?;
    let lines = neighbors
        .iter()
        .map(|n| format_direction(&spec, &n.direction))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to format directions")?;

    write_directions(&directions_path, &lines)
        .with_context(|| format!("failed to write directions: {}", directions_path.display()))?;
    info!(
        path = %directions_path.display(),
        count = lines.len(),
        nearest = neighbors.first().map(|n| n.distance),
        "directions written"
    );

    Ok(Status::Done)
}
