//! Argument-parsing behavior of the engine
//!
//! Flags that must be accepted or rejected before the engine does any work.
//! Rejections must print help (a `Usage` or `Options` marker) on stdout.

use clap::ValueEnum;
use crate::cases::{path_arg, Case, CaseContext, FixtureRole};
use crate::error::CheckError;
use crate::expect::{self, Stream};

const HELP_MARKERS: &[&str] = &["Usage", "Options"];
const FILE_NOT_FOUND: &str = "File not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArgparseCase {
    #[value(name = "unknown_flag")]
    UnknownFlag,
    #[value(name = "missing_arg_run")]
    MissingArgRun,
    #[value(name = "mode_network_ok")]
    ModeNetworkOk,
    #[value(name = "mode_invalid")]
    ModeInvalid,
    /// Accepted by `--case` but no scenario is defined for it.
    #[value(name = "mode_noarg_defaults")]
    ModeNoargDefaults,
    #[value(name = "run_valid_file")]
    RunValidFile,
    #[value(name = "validate_missing_file")]
    ValidateMissingFile,
    #[value(name = "config_missing_file")]
    ConfigMissingFile,
}

impl Case for ArgparseCase {
    fn name(&self) -> &'static str {
        match self {
            Self::UnknownFlag => "unknown_flag",
            Self::MissingArgRun => "missing_arg_run",
            Self::ModeNetworkOk => "mode_network_ok",
            Self::ModeInvalid => "mode_invalid",
            Self::ModeNoargDefaults => "mode_noarg_defaults",
            Self::RunValidFile => "run_valid_file",
            Self::ValidateMissingFile => "validate_missing_file",
            Self::ConfigMissingFile => "config_missing_file",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::UnknownFlag => "unknown flag is rejected with help",
            Self::MissingArgRun => "--run without a path is rejected with help",
            Self::ModeNetworkOk => "--mode network is accepted",
            Self::ModeInvalid => "--mode badmode is rejected with help",
            Self::ModeNoargDefaults => "no scenario defined",
            Self::RunValidFile => "--run <existing file> succeeds",
            Self::ValidateMissingFile => "--validate <missing file> reports File not found",
            Self::ConfigMissingFile => "--config <missing file> reports File not found",
        }
    }

    fn fixture_role(&self) -> Option<FixtureRole> {
        match self {
            Self::RunValidFile => Some(FixtureRole::Automata),
            _ => None,
        }
    }

    fn is_implemented(&self) -> bool {
        !matches!(self, Self::ModeNoargDefaults)
    }

    fn run(&self, ctx: &CaseContext<'_>) -> Result<(), CheckError> {
        match self {
            Self::UnknownFlag => rejected_with_help(ctx, &["--does-not-exist"], "unknown flag"),
            Self::MissingArgRun => rejected_with_help(ctx, &["--run"], "missing arg for --run"),
            Self::ModeNetworkOk => {
                let observed = ctx.run_engine(["--mode", "network"])?;
                expect::succeeded(&observed, "--mode network")
            }
            Self::ModeInvalid => {
                rejected_with_help(ctx, &["--mode", "badmode"], "invalid --mode value")
            }
            Self::ModeNoargDefaults => Err(CheckError::unknown_case(self.name())),
            Self::RunValidFile => {
                let file = ctx.existing_fixture("automata file")?;
                let observed = ctx.run_engine(["--run".to_string(), path_arg(file)])?;
                expect::succeeded(&observed, "--run with existing file")
            }
            Self::ValidateMissingFile => {
                let missing = ctx.absent_path(&ctx.config.missing_validate_path)?;
                missing_file_reported(ctx, "--validate", &path_arg(missing))
            }
            Self::ConfigMissingFile => {
                let missing = ctx.absent_path(&ctx.config.missing_config_path)?;
                missing_file_reported(ctx, "--config", &path_arg(missing))
            }
        }
    }
}

// ──────────────────────────────────────────────────────────
// Shared helpers
// ──────────────────────────────────────────────────────────

fn rejected_with_help(ctx: &CaseContext<'_>, args: &[&str], what: &str) -> Result<(), CheckError> {
    let observed = ctx.run_engine(args.iter().copied())?;
    expect::failed(&observed, what)?;
    expect::contains_any(
        &observed,
        Stream::Stdout,
        HELP_MARKERS,
        &format!("help text not shown for {}", what),
    )
}

fn missing_file_reported(ctx: &CaseContext<'_>, flag: &str, path: &str) -> Result<(), CheckError> {
    let observed = ctx.run_engine([flag, path])?;
    expect::failed(&observed, &format!("{} with missing file", flag))?;
    expect::contains_any(
        &observed,
        Stream::Stdout,
        &[FILE_NOT_FOUND],
        "expected 'File not found' message",
    )
}
