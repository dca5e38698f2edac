//! Check errors

use std::fmt;

/// The kind of check error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The harness was invoked incorrectly (missing `--file`, bad fixture precondition)
    Usage,
    /// An observed result did not meet the case's expectations
    Expectation,
    /// The case name is accepted but has no scenario behind it
    UnknownCase,
    /// The engine did not terminate before the deadline
    TimedOut,
    /// The engine binary could not be started
    Launch,
    /// IO error
    Io,
}

impl ErrorKind {
    /// Process exit status the harness reports for this kind of failure.
    /// Argument errors caught by clap exit 2 before any `ErrorKind` exists.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage
            | ErrorKind::Expectation
            | ErrorKind::UnknownCase
            | ErrorKind::TimedOut
            | ErrorKind::Launch
            | ErrorKind::Io => 1,
        }
    }
}

/// A check error with case context
#[derive(Debug)]
pub struct CheckError {
    pub kind: ErrorKind,
    pub message: String,
    pub case: Option<String>,
    pub args: Vec<String>,
}

impl CheckError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            case: None,
            args: Vec::new(),
        }
    }

    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, msg)
    }

    pub fn expectation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Expectation, msg)
    }

    pub fn unknown_case(name: &str) -> Self {
        Self::new(ErrorKind::UnknownCase, format!("Unknown case {}", name))
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::TimedOut
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref case) = self.case {
            if self.args.is_empty() {
                write!(f, "{}: ", case)?;
            } else {
                let quoted = self.args.iter().map(|a| {
                    if a.contains(' ') || a.contains('\t') || a.is_empty() {
                        format!("'{}'", a)
                    } else {
                        a.clone()
                    }
                }).collect::<Vec<_>>().join(" ");
                write!(f, "{} [{}]: ", case, quoted)?;
            }
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CheckError {}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}
