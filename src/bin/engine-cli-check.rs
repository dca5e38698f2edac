//! engine-cli-check
//!
//! Checks the engine's help, version and validation behavior.

use clap::Parser;
use std::process::ExitCode;
use engine_check::{CliCase, HarnessArgs};

#[derive(Parser, Debug)]
#[command(name = "engine-cli-check")]
#[command(version)]
#[command(about = "Check engine help, version and validation against its CLI contract")]
struct Cli {
    /// Case to run
    #[arg(long, value_enum, required_unless_present = "list_cases")]
    case: Option<CliCase>,

    #[command(flatten)]
    harness: HarnessArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    engine_check::cli::run(cli.case, cli.harness)
}
