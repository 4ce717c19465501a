mod calibrate_cmd;
mod cli;
mod config;
mod convert;
mod logging;
mod neighbors_cmd;

use std::process;

use clap::Parser;

use cli::{Cli, Command};

/// Exit code for any failure.
const EXIT_FAILURE: i32 = 2;

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Work done; the host keeps going as usual.
    Done,
    /// Parameters were persisted and the host should stop recalibrating.
    BudgetReached,
}

impl Status {
    fn exit_code(self) -> i32 {
        match self {
            Status::Done => 0,
            Status::BudgetReached => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(status) => process::exit(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(command: Command) -> anyhow::Result<Status> {
    match command {
        Command::Calibrate(args) => calibrate_cmd::run(args),
        Command::Neighbors(args) => neighbors_cmd::run(args),
    }
}
