use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Learned categorical distances for mixed-variable blackbox optimization.
#[derive(Parser)]
#[command(
    name = "catdist",
    version,
    about = "Calibrate categorical distances and propose categorical neighbors"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Calibrate the distance metric on the evaluation history and persist it.
    Calibrate(CalibrateArgs),
    /// Rank categorical neighbors of the current point and write directions.
    Neighbors(NeighborsArgs),
}

/// Arguments for the `calibrate` subcommand.
#[derive(clap::Args)]
pub struct CalibrateArgs {
    /// Path to TOML configuration file (default: catdist.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override cache file path from config.
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Override calibrated-parameters output path from config.
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Override the RNG seed from config and cache.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `neighbors` subcommand.
#[derive(clap::Args)]
pub struct NeighborsArgs {
    /// Path to TOML configuration file (default: catdist.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override cache file path from config.
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Override calibrated-parameters input path from config.
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Override directions output path from config.
    #[arg(short, long)]
    pub directions: Option<PathBuf>,

    /// Override the neighbor count read from the cache.
    #[arg(short = 'm', long)]
    pub count: Option<usize>,
}
