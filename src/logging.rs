use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Workspace crates whose events follow the `-v` flag. Dependencies such as
/// argmin stay at `warn`.
const CRATE_TARGETS: &[&str] = &[
    "catdist",
    "catdist_calibrate",
    "catdist_codec",
    "catdist_idw",
    "catdist_io",
    "catdist_metric",
    "catdist_neighbors",
];

/// Level for a `-v` count; anything past `-vvv` is trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(CRATE_TARGETS.iter().map(|t| format!("{t}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initializes the stderr subscriber.
///
/// `RUST_LOG` replaces the verbosity-derived filter when set. The host
/// optimizer launches catdist once per iteration, so lines carry no
/// timestamp, and targets are shown from `-vv` on.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level_for(verbosity))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .without_time()
        .compact()
        .init();
}
