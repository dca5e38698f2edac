//! engine-check: black-box checks of the automata engine's command line
//!
//! The engine is only ever observed from outside: each case spawns the
//! binary once, captures `(exit code, stdout, stderr)`, and asserts on that
//! triple.
//!
//! # Drivers
//!
//! | Binary | Cases |
//! |--------|-------|
//! | `engine-argparse-check` | `unknown_flag`, `missing_arg_run`, `mode_network_ok`, `mode_invalid`, `mode_noarg_defaults`, `run_valid_file`, `validate_missing_file`, `config_missing_file` |
//! | `engine-cli-check` | `help`, `version`, `validate_valid`, `validate_invalid` |
//!
//! ```text
//! engine-cli-check --binary ./build/engine --case validate_valid --file tests/data/valid.yaml
//! ```
//!
//! Exit status is 0 when every assertion holds and 1 on a failed assertion,
//! harness misuse, or a case with no scenario behind it. Malformed harness
//! arguments are rejected by clap with status 2.
//!
//! `engine-stub` is a minimal engine that satisfies every case; the crate's
//! own tests run the drivers against it.

mod error;
mod invocation;
pub mod expect;
mod config;
mod cases;
mod runner;
mod logging;
pub mod cli;
pub mod stub;

pub use error::{CheckError, ErrorKind};
pub use invocation::{Invocation, Observed};
pub use expect::Stream;
pub use config::{HarnessConfig, HarnessConfigBuilder, TIMEOUT_ENV, VERBOSE_ENV};
pub use cases::{Case, CaseContext, FixtureRole, Fixtures, ArgparseCase, CliCase};
pub use runner::{CaseRunner, CaseResult, SuiteResult, run_and_assert};
pub use cli::HarnessArgs;
