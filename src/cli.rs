//! Harness command line shared by both drivers
//!
//! Each driver binary declares its own `--case` enumeration and flattens
//! [`HarnessArgs`] for the rest.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use clap::{Args, ValueEnum};
use crate::cases::Case;
use crate::config::{parse_timeout_ms, HarnessConfig};
use crate::error::CheckError;
use crate::logging;
use crate::runner::CaseRunner;

#[derive(Args, Debug)]
pub struct HarnessArgs {
    /// Engine binary under test
    #[arg(long, required_unless_present = "list_cases")]
    pub binary: Option<PathBuf>,

    /// Fixture file for cases that need one
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Per-invocation timeout in milliseconds [env: ENGINE_CHECK_TIMEOUT_MS]
    #[arg(long = "timeout-ms", value_parser = parse_timeout_ms)]
    pub timeout: Option<Duration>,

    /// Verbose output: log every engine invocation to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// List available cases and exit
    #[arg(long = "list-cases")]
    pub list_cases: bool,
}

/// Driver entry point: run `case` and map the outcome to an exit status.
pub fn run<C: Case>(case: Option<C>, args: HarnessArgs) -> ExitCode {
    if args.list_cases {
        print_cases::<C>();
        return ExitCode::SUCCESS;
    }

    match execute(case, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute<C: Case>(case: Option<C>, args: HarnessArgs) -> Result<(), CheckError> {
    let Some(binary) = args.binary else {
        return Err(CheckError::usage("--binary is required"));
    };
    let Some(case) = case else {
        return Err(CheckError::usage("--case is required"));
    };

    let mut config = HarnessConfig::from_env(binary)?;
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    config.verbose |= args.verbose;
    logging::init(if config.verbose { "debug" } else { "warn" });

    tracing::debug!(case = case.name(), binary = %config.binary.display(), "running case");
    CaseRunner::new(config).run_case(case, args.file.as_deref())
}

fn print_cases<C: Case>() {
    println!("Cases:");
    println!();
    for case in C::value_variants() {
        let file = if case.needs_file() { " (needs --file)" } else { "" };
        println!("  {:<24} {}{}", case.name(), case.summary(), file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::ArgparseCase;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[arg(long, value_enum, required_unless_present = "list_cases")]
        case: Option<ArgparseCase>,
        #[command(flatten)]
        harness: HarnessArgs,
    }

    #[test]
    fn test_parses_full_command_line() {
        let cli = TestCli::try_parse_from([
            "check", "--binary", "./engine", "--case", "run_valid_file",
            "--file", "tests/data/valid.yaml", "--timeout-ms", "500",
        ])
        .unwrap();
        assert_eq!(cli.case, Some(ArgparseCase::RunValidFile));
        assert_eq!(cli.harness.binary, Some(PathBuf::from("./engine")));
        assert_eq!(cli.harness.file, Some(PathBuf::from("tests/data/valid.yaml")));
        assert_eq!(cli.harness.timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_rejects_unlisted_case() {
        let err = TestCli::try_parse_from(["check", "--binary", "./engine", "--case", "bogus"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_binary_and_case_required() {
        assert!(TestCli::try_parse_from(["check", "--case", "unknown_flag"]).is_err());
        assert!(TestCli::try_parse_from(["check", "--binary", "./engine"]).is_err());
        assert!(TestCli::try_parse_from(["check", "--list-cases"]).is_ok());
    }

    #[test]
    fn test_missing_file_exit_code() {
        let cli = TestCli::try_parse_from([
            "check", "--binary", "./no-engine-here", "--case", "run_valid_file",
        ])
        .unwrap();
        let err = execute(cli.case, cli.harness).unwrap_err();
        assert_eq!(err.to_string(), "--file is required for run_valid_file");
        assert_eq!(err.exit_code(), 1);
    }
}
