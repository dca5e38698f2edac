//! A minimal engine that honors the CLI contract the cases check
//!
//! It parses the engine's flags, reports missing files, and validates the
//! top-level shape of an automata YAML file. It does not execute automata.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};

/// Keys every automata document must carry at its root
pub const REQUIRED_KEYS: &[&str] = &["config", "automata", "version"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineMode {
    Detached,
    Network,
}

#[derive(Parser, Debug)]
#[command(name = "engine-stub")]
#[command(version)]
#[command(about = "Automata engine stand-in honoring the engine command line")]
pub struct EngineArgs {
    /// Validate an automata YAML and exit
    #[arg(long, value_name = "FILE")]
    pub validate: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Runs automata
    #[arg(long, value_name = "FILE")]
    pub run: Option<PathBuf>,

    /// Selects mode engine will run in
    #[arg(long, value_enum, default_value_t = EngineMode::Detached)]
    pub mode: EngineMode,

    /// Provides configuration file if running in network mode
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Why an automata document was rejected
#[derive(Debug)]
pub enum AutomataError {
    Parse(serde_yaml::Error),
    NotAMapping,
    MissingKey(&'static str),
}

impl fmt::Display for AutomataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomataError::Parse(e) => write!(f, "malformed YAML: {}", e),
            AutomataError::NotAMapping => write!(f, "root node is not a mapping"),
            AutomataError::MissingKey(key) => write!(f, "missing top-level key '{}'", key),
        }
    }
}

impl std::error::Error for AutomataError {}

/// Check the top-level shape of an automata document.
pub fn validate_automata(content: &str) -> Result<(), AutomataError> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content).map_err(AutomataError::Parse)?;
    let root = doc.as_mapping().ok_or(AutomataError::NotAMapping)?;
    for &key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(AutomataError::MissingKey(key));
        }
    }
    Ok(())
}

/// Run the engine on `argv`, writing to `out` and `err`. Returns the exit
/// status; `Err` only for I/O failures of the engine itself.
pub fn run<I, T>(argv: I, out: &mut impl Write, err: &mut impl Write) -> anyhow::Result<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = match EngineArgs::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                write!(out, "{}", e)?;
                return Ok(0);
            }
            write!(err, "{}", e)?;
            write_help(out)?;
            return Ok(1);
        }
    };

    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    crate::logging::init(level);

    for path in [&args.validate, &args.run, &args.config].into_iter().flatten() {
        if !path.exists() {
            writeln!(out, "File not found: {}", path.display())?;
            write_help(out)?;
            return Ok(1);
        }
    }

    if let Some(ref path) = args.validate {
        return validate_file(path, out, err);
    }

    if let Some(ref path) = args.run {
        tracing::info!(file = %path.display(), mode = ?args.mode, "automata accepted");
    }
    if let Some(ref path) = args.config {
        tracing::debug!(file = %path.display(), "configuration provided");
    }
    Ok(0)
}

fn validate_file(path: &Path, out: &mut impl Write, err: &mut impl Write) -> anyhow::Result<u8> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match validate_automata(&content) {
        Ok(()) => {
            tracing::info!(file = %path.display(), "automata valid");
            writeln!(out, "{}: valid", path.display())?;
            Ok(0)
        }
        Err(e) => {
            writeln!(err, "error: invalid automata file {}: {}", path.display(), e)?;
            Ok(1)
        }
    }
}

fn write_help(out: &mut impl Write) -> anyhow::Result<()> {
    let help = EngineArgs::command().render_help();
    writeln!(out, "{}", help)?;
    Ok(())
}
