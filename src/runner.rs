//! Case runner
//!
//! Dispatches a named case to its scenario, enforcing the harness-level
//! preconditions first, and runs whole suites sequentially for use from
//! `cargo test`.

use std::path::Path;
use std::time::{Duration, Instant};
use clap::ValueEnum;
use crate::cases::{Case, CaseContext, Fixtures};
use crate::config::HarnessConfig;
use crate::error::CheckError;

/// Result of running a whole suite
#[derive(Debug)]
pub struct SuiteResult {
    /// Individual case results, in run order
    pub cases: Vec<CaseResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResult {
    /// Check if every case that ran passed
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed || c.skipped)
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed && !c.skipped).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed && !c.skipped).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.cases.iter().filter(|c| c.skipped).count()
    }

    /// Format a summary line
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped ({}ms)",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.duration.as_millis(),
        )
    }
}

/// Result of a single case
#[derive(Debug)]
pub struct CaseResult {
    pub name: &'static str,
    pub passed: bool,
    pub skipped: bool,
    /// Why the case failed or was skipped
    pub error: Option<String>,
    pub duration: Duration,
}

/// Runs cases against one engine binary
pub struct CaseRunner {
    config: HarnessConfig,
}

impl CaseRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Run one case. Harness-usage problems are reported before the engine
    /// is ever spawned.
    pub fn run_case<C: Case>(&self, case: C, file: Option<&Path>) -> Result<(), CheckError> {
        let name = case.name();
        if !case.is_implemented() {
            return Err(CheckError::unknown_case(name));
        }
        if case.needs_file() && file.is_none() {
            return Err(CheckError::usage(format!("--file is required for {}", name)));
        }

        let ctx = CaseContext::new(&self.config, file);
        let start = Instant::now();
        let result = case.run(&ctx).map_err(|e| e.with_case(name));
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => tracing::info!(case = name, duration_ms, "case passed"),
            Err(e) => tracing::info!(case = name, duration_ms, kind = ?e.kind, "case failed"),
        }
        result
    }

    /// Run every case of a driver in declaration order. Cases without a
    /// scenario, or whose fixture is not supplied, are skipped.
    pub fn run_suite<C: Case>(&self, fixtures: &Fixtures) -> SuiteResult {
        let start = Instant::now();
        let mut cases = Vec::new();

        for case in C::value_variants() {
            let case_start = Instant::now();
            let name = case.name();

            let skip_reason = if !case.is_implemented() {
                Some("no scenario defined".to_string())
            } else {
                match case.fixture_role() {
                    Some(role) if fixtures.get(role).is_none() => {
                        Some(format!("no {:?} fixture supplied", role))
                    }
                    _ => None,
                }
            };
            if let Some(reason) = skip_reason {
                cases.push(CaseResult {
                    name,
                    passed: true,
                    skipped: true,
                    error: Some(reason),
                    duration: case_start.elapsed(),
                });
                continue;
            }

            let file = case.fixture_role().and_then(|role| fixtures.get(role));
            let result = self.run_case(*case, file);
            cases.push(CaseResult {
                name,
                passed: result.is_ok(),
                skipped: false,
                error: result.err().map(|e| e.to_string()),
                duration: case_start.elapsed(),
            });
        }

        SuiteResult {
            cases,
            duration: start.elapsed(),
        }
    }
}

/// Run every case of a driver and integrate with `#[test]` by panicking on
/// failure.
///
/// Usage in cargo tests:
/// ```rust,ignore
/// #[test]
/// fn engine_argparse() {
///     engine_check::run_and_assert::<engine_check::ArgparseCase>(config, &fixtures);
/// }
/// ```
pub fn run_and_assert<C: Case>(config: HarnessConfig, fixtures: &Fixtures) {
    let runner = CaseRunner::new(config);
    let result = runner.run_suite::<C>(fixtures);

    for case in &result.cases {
        if case.skipped {
            eprintln!("SKIP  {}: {}", case.name, case.error.as_deref().unwrap_or(""));
        } else if case.passed {
            eprintln!("PASS  {} ({}ms)", case.name, case.duration.as_millis());
        } else {
            eprintln!("FAIL  {}", case.name);
            if let Some(ref err) = case.error {
                for line in err.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!("\n{}", result.summary());

    if !result.all_passed() {
        panic!("{} case(s) failed", result.failed_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{ArgparseCase, CliCase};
    use crate::config::HarnessConfigBuilder;
    use crate::error::ErrorKind;

    fn unreachable_engine() -> HarnessConfig {
        HarnessConfigBuilder::new("./no-engine-here").build()
    }

    #[test]
    fn test_missing_file_fails_before_spawn() {
        let runner = CaseRunner::new(unreachable_engine());
        let err = runner.run_case(ArgparseCase::RunValidFile, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Usage);
        assert_eq!(err.to_string(), "--file is required for run_valid_file");

        let err = runner.run_case(CliCase::ValidateInvalid, None).unwrap_err();
        assert_eq!(err.to_string(), "--file is required for validate_invalid");
    }

    #[test]
    fn test_unimplemented_case_is_unknown() {
        let runner = CaseRunner::new(unreachable_engine());
        let err = runner.run_case(ArgparseCase::ModeNoargDefaults, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCase);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_failures_carry_case_name() {
        let runner = CaseRunner::new(unreachable_engine());
        let err = runner.run_case(CliCase::Help, None).unwrap_err();
        assert_eq!(err.case.as_deref(), Some("help"));
        assert!(err.to_string().starts_with("help [./no-engine-here --help]: failed to execute"));
    }

    #[test]
    fn test_suite_skips_unimplemented_and_unsupplied() {
        let runner = CaseRunner::new(unreachable_engine());
        let result = runner.run_suite::<ArgparseCase>(&Fixtures::default());
        assert_eq!(result.cases.len(), 8);
        assert_eq!(result.skipped_count(), 2);
        assert_eq!(result.failed_count(), 6);
        assert!(!result.all_passed());
        assert!(result.summary().starts_with("0 passed, 6 failed, 2 skipped"));

        let skipped: Vec<_> = result.cases.iter().filter(|c| c.skipped).map(|c| c.name).collect();
        assert_eq!(skipped, vec!["mode_noarg_defaults", "run_valid_file"]);
    }

    #[test]
    fn test_empty_suite_passes() {
        let result = SuiteResult {
            cases: Vec::new(),
            duration: Duration::ZERO,
        };
        assert!(result.all_passed());
        assert_eq!(result.summary(), "0 passed, 0 failed, 0 skipped (0ms)");
    }
}
