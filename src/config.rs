//! Harness configuration

use std::path::PathBuf;
use std::time::Duration;
use crate::error::CheckError;

/// Environment variable overriding the per-invocation timeout (milliseconds)
pub const TIMEOUT_ENV: &str = "ENGINE_CHECK_TIMEOUT_MS";
/// Environment variable enabling verbose logging when set
pub const VERBOSE_ENV: &str = "ENGINE_CHECK_VERBOSE";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration shared by every case in a run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Engine binary under test
    pub binary: PathBuf,
    /// Upper bound on a single engine invocation
    pub timeout: Duration,
    /// Working directory for the engine (inherits the harness's when unset)
    pub working_dir: Option<PathBuf>,
    /// Extra environment for the engine
    pub env: Vec<(String, String)>,
    /// Path handed to `--validate` by the missing-file case; must not exist
    pub missing_validate_path: PathBuf,
    /// Path handed to `--config` by the missing-file case; must not exist
    pub missing_config_path: PathBuf,
    /// Verbose mode — debug-level logging
    pub verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("engine"),
            timeout: DEFAULT_TIMEOUT,
            working_dir: None,
            env: Vec::new(),
            missing_validate_path: PathBuf::from("tests/data/this_file_does_not_exist.yaml"),
            missing_config_path: PathBuf::from("tests/data/this_config_does_not_exist.yaml"),
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Defaults for `binary`, with environment overrides applied.
    pub fn from_env(binary: impl Into<PathBuf>) -> Result<Self, CheckError> {
        Self::from_lookup(binary, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        binary: impl Into<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CheckError> {
        let mut config = Self {
            binary: binary.into(),
            ..Default::default()
        };
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout = parse_timeout_ms(&raw)
                .map_err(|e| CheckError::usage(format!("{}: {}", TIMEOUT_ENV, e)))?;
        }
        if lookup(VERBOSE_ENV).is_some() {
            config.verbose = true;
        }
        Ok(config)
    }
}

/// Parse a positive number of milliseconds.
pub fn parse_timeout_ms(raw: &str) -> Result<Duration, String> {
    let ms: u64 = raw.trim().parse()
        .map_err(|_| format!("invalid timeout {:?}: expected milliseconds", raw))?;
    if ms == 0 {
        return Err("timeout must be at least 1ms".to_string());
    }
    Ok(Duration::from_millis(ms))
}

/// Builder API for convenient configuration
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Start building a configuration for the given engine binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            config: HarnessConfig {
                binary: binary.into(),
                ..Default::default()
            },
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.env.push((key.into(), value.into()));
        self
    }

    pub fn missing_validate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.missing_validate_path = path.into();
        self
    }

    pub fn missing_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.missing_config_path = path.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> HarnessConfig {
        self.config
    }
}
