//! Run both drivers' suites against the bundled engine stub.
//!
//! Usage:
//!   cargo test --test harness
//!   ENGINE_CHECK_VERBOSE=1 cargo test --test harness -- --nocapture

use std::path::PathBuf;
use engine_check::{
    ArgparseCase, CaseRunner, CliCase, ErrorKind, Fixtures, HarnessConfig, HarnessConfigBuilder,
};

fn stub_engine() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_engine-stub"))
}

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn config() -> HarnessConfig {
    HarnessConfigBuilder::new(stub_engine())
        .working_dir(env!("CARGO_MANIFEST_DIR"))
        .build()
}

fn fixtures() -> Fixtures {
    Fixtures {
        automata: Some(data("valid.yaml")),
        valid: Some(data("valid.yaml")),
        invalid: Some(data("invalid.yaml")),
    }
}

#[test]
fn argparse_suite_against_stub() {
    engine_check::run_and_assert::<ArgparseCase>(config(), &fixtures());
}

#[test]
fn cli_suite_against_stub() {
    engine_check::run_and_assert::<CliCase>(config(), &fixtures());
}

#[test]
fn suite_counts() {
    let runner = CaseRunner::new(config());
    let result = runner.run_suite::<ArgparseCase>(&fixtures());
    assert_eq!(result.passed_count(), 7);
    assert_eq!(result.skipped_count(), 1);
    assert_eq!(result.failed_count(), 0);

    let result = runner.run_suite::<CliCase>(&fixtures());
    assert_eq!(result.passed_count(), 4);
    assert!(result.all_passed());
}

#[test]
fn missing_file_cases_are_repeatable() {
    let runner = CaseRunner::new(config());
    for _ in 0..3 {
        runner.run_case(ArgparseCase::ValidateMissingFile, None).unwrap();
        runner.run_case(ArgparseCase::ConfigMissingFile, None).unwrap();
    }
    assert!(!data("this_file_does_not_exist.yaml").exists());
    assert!(!data("this_config_does_not_exist.yaml").exists());
}

#[test]
fn swapped_fixtures_fail_expectations() {
    let runner = CaseRunner::new(config());
    let err = runner
        .run_case(CliCase::ValidateValid, Some(data("invalid.yaml").as_path()))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Expectation);
    assert!(err.message.contains("should succeed"));
    assert!(err.message.contains("invalid automata file"));

    let err = runner
        .run_case(CliCase::ValidateInvalid, Some(data("valid.yaml").as_path()))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Expectation);
    assert!(err.message.contains("should fail"));
}

#[test]
fn run_valid_file_rejects_absent_fixture() {
    let runner = CaseRunner::new(config());
    let err = runner
        .run_case(ArgparseCase::RunValidFile, Some(data("absent.yaml").as_path()))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Usage);
    assert!(err.message.starts_with("automata file not found"));
}
