//! engine-argparse-check
//!
//! Checks how the engine's argument parser accepts and rejects flags.

use clap::Parser;
use std::process::ExitCode;
use engine_check::{ArgparseCase, HarnessArgs};

#[derive(Parser, Debug)]
#[command(name = "engine-argparse-check")]
#[command(version)]
#[command(about = "Check engine argument parsing against its CLI contract")]
struct Cli {
    /// Case to run
    #[arg(long, value_enum, required_unless_present = "list_cases")]
    case: Option<ArgparseCase>,

    #[command(flatten)]
    harness: HarnessArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    engine_check::cli::run(cli.case, cli.harness)
}
