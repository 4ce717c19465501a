use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "catdist.toml";

/// Top-level catdist configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatdistConfig {
    /// RNG seed; falls back to the seed recorded in the cache.
    #[serde(default)]
    pub seed: Option<u64>,

    /// File locations.
    #[serde(default)]
    pub io: IoToml,

    /// Calibration settings.
    #[serde(default)]
    pub calibration: CalibrationToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_cache")]
    pub cache: PathBuf,
    #[serde(default = "default_params")]
    pub params: PathBuf,
    #[serde(default = "default_directions")]
    pub directions: PathBuf,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            params: default_params(),
            directions: default_directions(),
        }
    }
}

fn default_cache() -> PathBuf {
    PathBuf::from("readwrite_files/cachePts.txt")
}
fn default_params() -> PathBuf {
    PathBuf::from("readwrite_files/params.json")
}
fn default_directions() -> PathBuf {
    PathBuf::from("readwrite_files/catDirections.txt")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationToml {
    #[serde(default = "default_variant")]
    pub variant: String,
    #[serde(default = "default_folds")]
    pub folds: usize,
    #[serde(default = "default_p")]
    pub p: f64,
    #[serde(default = "default_budget_per_param")]
    pub budget_per_param: usize,
    #[serde(default = "default_lhs_fraction")]
    pub lhs_fraction: f64,
    #[serde(default = "default_true")]
    pub fix_quantitative_weights: bool,
    #[serde(default = "default_stop_fraction")]
    pub stop_fraction: f64,
}

impl Default for CalibrationToml {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            folds: default_folds(),
            p: default_p(),
            budget_per_param: default_budget_per_param(),
            lhs_fraction: default_lhs_fraction(),
            fix_quantitative_weights: true,
            stop_fraction: default_stop_fraction(),
        }
    }
}

fn default_variant() -> String {
    "embedding".to_string()
}
fn default_folds() -> usize {
    3
}
fn default_p() -> f64 {
    2.0
}
fn default_budget_per_param() -> usize {
    50
}
fn default_lhs_fraction() -> f64 {
    0.33
}
fn default_true() -> bool {
    true
}
fn default_stop_fraction() -> f64 {
    0.20
}

/// Loads the configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG`] is read if
/// present, otherwise every setting takes its default.
pub fn load(path: Option<&Path>) -> Result<CatdistConfig> {
    let path = match path {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => return Ok(CatdistConfig::default()),
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse TOML config: {}", path.display()))
}
