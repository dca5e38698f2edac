//! Top-level CLI behavior of the engine: help, version, validation

use clap::ValueEnum;
use crate::cases::{path_arg, Case, CaseContext, FixtureRole};
use crate::error::CheckError;
use crate::expect::{self, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliCase {
    #[value(name = "help")]
    Help,
    #[value(name = "version")]
    Version,
    #[value(name = "validate_valid")]
    ValidateValid,
    #[value(name = "validate_invalid")]
    ValidateInvalid,
}

impl Case for CliCase {
    fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Version => "version",
            Self::ValidateValid => "validate_valid",
            Self::ValidateInvalid => "validate_invalid",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Help => "--help prints usage and options",
            Self::Version => "--version prints a version number",
            Self::ValidateValid => "--validate <valid file> succeeds",
            Self::ValidateInvalid => "--validate <invalid file> fails with an error message",
        }
    }

    fn fixture_role(&self) -> Option<FixtureRole> {
        match self {
            Self::ValidateValid => Some(FixtureRole::Valid),
            Self::ValidateInvalid => Some(FixtureRole::Invalid),
            _ => None,
        }
    }

    fn run(&self, ctx: &CaseContext<'_>) -> Result<(), CheckError> {
        match self {
            Self::Help => {
                let observed = ctx.run_engine(["--help"])?;
                expect::succeeded(&observed, "--help")?;
                let what = "--help did not include expected usage/options text";
                expect::contains_any(&observed, Stream::Stdout, &["Usage", "usage"], what)?;
                expect::contains_any(&observed, Stream::Stdout, &["Options", "--validate"], what)
            }
            Self::Version => {
                let observed = ctx.run_engine(["--version"])?;
                expect::succeeded(&observed, "--version")?;
                let what = "--version did not print a version";
                expect::matches(&observed, Stream::Stdout, "[0-9]", what)
            }
            Self::ValidateValid => {
                let file = ctx.existing_fixture("valid YAML")?;
                let observed = ctx.run_engine(["--validate".to_string(), path_arg(file)])?;
                expect::succeeded(&observed, "validation of valid YAML")
            }
            Self::ValidateInvalid => {
                let file = ctx.existing_fixture("invalid YAML")?;
                let observed = ctx.run_engine(["--validate".to_string(), path_arg(file)])?;
                expect::failed(&observed, "validation of invalid YAML")?;
                expect::contains_any_ignore_case(
                    &observed,
                    &[Stream::Stderr, Stream::Stdout],
                    &["error", "invalid"],
                    "expected an error message for invalid YAML",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HarnessConfig, HarnessConfigBuilder};
    use crate::error::ErrorKind;

    #[test]
    fn test_names_match_value_enum() {
        for case in CliCase::value_variants() {
            let pv = case.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), case.name());
            assert!(case.is_implemented());
        }
    }

    #[test]
    fn test_validate_cases_need_distinct_fixtures() {
        assert_eq!(CliCase::ValidateValid.fixture_role(), Some(FixtureRole::Valid));
        assert_eq!(CliCase::ValidateInvalid.fixture_role(), Some(FixtureRole::Invalid));
        assert!(!CliCase::Help.needs_file());
        assert!(!CliCase::Version.needs_file());
    }

    #[test]
    fn test_missing_fixture_never_spawns() {
        // The binary does not exist, so reaching the spawn would be a Launch error.
        let config = HarnessConfigBuilder::new("./no-engine-here").build();
        let missing = std::path::Path::new("tests/data/never-there.yaml");
        let ctx = CaseContext::new(&config, Some(missing));
        let err = CliCase::ValidateValid.run(&ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Usage);
        assert_eq!(err.message, "valid YAML not found: tests/data/never-there.yaml");
    }

    #[cfg(unix)]
    fn script(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-engine");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_version_without_digits_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfigBuilder::new(script(dir.path(), "echo engine")).build();
        let ctx = CaseContext::new(&config, None);
        let err = CliCase::Version.run(&ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expectation);
        assert!(err.message.starts_with("--version did not print a version"));
    }

    #[cfg(unix)]
    #[test]
    fn test_help_requires_options_marker() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            binary: script(dir.path(), "echo 'usage: engine'"),
            ..Default::default()
        };
        let ctx = CaseContext::new(&config, None);
        let err = CliCase::Help.run(&ctx).unwrap_err();
        assert!(err.message.contains("usage/options"));
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_file_accepts_error_on_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("bad.yaml");
        std::fs::write(&fixture, "version: [\n").unwrap();
        let engine = script(dir.path(), "echo 'Error: bad root'; exit 1");
        let config = HarnessConfigBuilder::new(engine).build();
        let ctx = CaseContext::new(&config, Some(fixture.as_path()));
        assert!(CliCase::ValidateInvalid.run(&ctx).is_ok());
    }
}
