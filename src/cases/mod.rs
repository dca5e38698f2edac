//! Engine CLI cases
//!
//! Each driver owns a closed enumeration of cases. A case builds one engine
//! invocation, runs it through the [`CaseContext`], and asserts on the
//! observed `(code, stdout, stderr)` triple.

mod argparse;
mod cli;

use std::path::{Path, PathBuf};
use crate::config::HarnessConfig;
use crate::error::CheckError;
use crate::invocation::{Invocation, Observed};

pub use argparse::ArgparseCase;
pub use cli::CliCase;

/// Which fixture a file-dependent case expects in `--file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureRole {
    /// An existing automata file handed to `--run`
    Automata,
    /// A well-formed automata file handed to `--validate`
    Valid,
    /// A malformed automata file handed to `--validate`
    Invalid,
}

/// Fixture paths for running a whole suite
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub automata: Option<PathBuf>,
    pub valid: Option<PathBuf>,
    pub invalid: Option<PathBuf>,
}

impl Fixtures {
    pub fn get(&self, role: FixtureRole) -> Option<&Path> {
        match role {
            FixtureRole::Automata => self.automata.as_deref(),
            FixtureRole::Valid => self.valid.as_deref(),
            FixtureRole::Invalid => self.invalid.as_deref(),
        }
    }
}

/// A named scenario exercising one engine CLI behavior
pub trait Case: Copy + std::fmt::Debug + clap::ValueEnum + Send + Sync + 'static {
    /// Stable snake_case name, as accepted by `--case`
    fn name(&self) -> &'static str;

    /// One-line description
    fn summary(&self) -> &'static str;

    /// The fixture this case needs in `--file`, if any
    fn fixture_role(&self) -> Option<FixtureRole> {
        None
    }

    /// Whether the case has a scenario behind its name
    fn is_implemented(&self) -> bool {
        true
    }

    /// Run the scenario
    fn run(&self, ctx: &CaseContext<'_>) -> Result<(), CheckError>;

    fn needs_file(&self) -> bool {
        self.fixture_role().is_some()
    }
}

/// What a running case can see: the harness configuration and its fixture
pub struct CaseContext<'a> {
    pub config: &'a HarnessConfig,
    pub file: Option<&'a Path>,
}

impl<'a> CaseContext<'a> {
    pub fn new(config: &'a HarnessConfig, file: Option<&'a Path>) -> Self {
        Self { config, file }
    }

    /// An invocation of the engine under test with the configured cwd and env.
    pub fn engine(&self) -> Invocation {
        let mut inv = Invocation::new(&self.config.binary);
        if let Some(ref dir) = self.config.working_dir {
            inv = inv.current_dir(dir);
        }
        for (k, v) in &self.config.env {
            inv = inv.env(k, v);
        }
        inv
    }

    /// Run the engine with `args` and capture the result.
    pub fn run_engine<I, S>(&self, args: I) -> Result<Observed, CheckError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inv = self.engine().args(args);
        inv.run(self.config.timeout)
            .map_err(|e| e.with_args(inv.tokens()))
    }

    /// The fixture file, which must exist on disk.
    pub fn existing_fixture(&self, what: &str) -> Result<&'a Path, CheckError> {
        let file = self.file.ok_or_else(|| CheckError::usage("--file is required"))?;
        if !self.resolve(file).exists() {
            return Err(CheckError::usage(format!("{} not found: {}", what, file.display())));
        }
        Ok(file)
    }

    /// A path that must be absent so the engine reports it as missing.
    pub fn absent_path<'p>(&self, path: &'p Path) -> Result<&'p Path, CheckError> {
        if self.resolve(path).exists() {
            return Err(CheckError::usage(format!(
                "fixture must not exist: {}", path.display()
            )));
        }
        Ok(path)
    }

    /// Resolve a relative path the way the engine will see it.
    fn resolve(&self, path: &Path) -> PathBuf {
        match self.config.working_dir {
            Some(ref dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Render a path as an engine argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfigBuilder;
    use crate::error::ErrorKind;

    #[test]
    fn test_existing_fixture_requires_file() {
        let config = HarnessConfig::default();
        let ctx = CaseContext::new(&config, None);
        let err = ctx.existing_fixture("automata file").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Usage);
        assert_eq!(err.message, "--file is required");
    }

    #[test]
    fn test_existing_fixture_resolves_against_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yaml"), "version: 1\n").unwrap();
        let config = HarnessConfigBuilder::new("engine").working_dir(dir.path()).build();
        let file = Path::new("a.yaml");
        let ctx = CaseContext::new(&config, Some(file));
        assert_eq!(ctx.existing_fixture("automata file").unwrap(), file);

        let missing = Path::new("b.yaml");
        let ctx = CaseContext::new(&config, Some(missing));
        let err = ctx.existing_fixture("automata file").unwrap_err();
        assert_eq!(err.message, "automata file not found: b.yaml");
    }

    #[test]
    fn test_absent_path_rejects_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = HarnessConfig::default();
        let ctx = CaseContext::new(&config, None);
        let err = ctx.absent_path(file.path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Usage);
        assert!(ctx.absent_path(Path::new("tests/data/nope/never.yaml")).is_ok());
    }

    #[test]
    fn test_engine_invocation_carries_config() {
        let config = HarnessConfigBuilder::new("./engine")
            .working_dir("/srv")
            .env("RUST_LOG", "trace")
            .build();
        let ctx = CaseContext::new(&config, None);
        let inv = ctx.engine().arg("--help");
        assert_eq!(inv.tokens(), vec!["./engine", "--help"]);
        assert_eq!(inv.cwd, Some(PathBuf::from("/srv")));
        assert_eq!(inv.env, vec![("RUST_LOG".to_string(), "trace".to_string())]);
    }

    #[test]
    fn test_fixtures_lookup() {
        let fixtures = Fixtures {
            valid: Some(PathBuf::from("v.yaml")),
            ..Default::default()
        };
        assert_eq!(fixtures.get(FixtureRole::Valid), Some(Path::new("v.yaml")));
        assert_eq!(fixtures.get(FixtureRole::Invalid), None);
    }
}
