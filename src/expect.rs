//! Expectations over an observed engine run
//!
//! Each check returns `Err(CheckError)` of kind `Expectation` on the first
//! mismatch, so a case stops at its first failed assertion. Failure messages
//! embed what was actually seen.

use crate::error::CheckError;
use crate::invocation::Observed;

/// Which captured stream a check looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }

    fn of(self, observed: &Observed) -> &str {
        match self {
            Stream::Stdout => &observed.stdout,
            Stream::Stderr => &observed.stderr,
        }
    }
}

/// The engine must have exited with status 0.
pub fn succeeded(observed: &Observed, what: &str) -> Result<(), CheckError> {
    if observed.code != 0 {
        return Err(CheckError::expectation(format!(
            "{} should succeed. {}", what, observed.describe()
        )));
    }
    Ok(())
}

/// The engine must have exited with a non-zero status.
pub fn failed(observed: &Observed, what: &str) -> Result<(), CheckError> {
    if observed.code == 0 {
        return Err(CheckError::expectation(format!(
            "{} should fail. {}", what, observed.describe()
        )));
    }
    Ok(())
}

/// `stream` must contain at least one of `needles` (case-sensitive).
pub fn contains_any(
    observed: &Observed,
    stream: Stream,
    needles: &[&str],
    what: &str,
) -> Result<(), CheckError> {
    let content = stream.of(observed);
    if needles.iter().any(|n| content.contains(n)) {
        return Ok(());
    }
    Err(CheckError::expectation(format!(
        "{}: expected {} to contain one of {:?}. {}={}",
        what, stream.name(), needles, stream.name(), content
    )))
}

/// At least one of `streams` must contain at least one of `needles`,
/// compared without regard to case.
pub fn contains_any_ignore_case(
    observed: &Observed,
    streams: &[Stream],
    needles: &[&str],
    what: &str,
) -> Result<(), CheckError> {
    let found = streams.iter().any(|s| {
        let content = s.of(observed).to_lowercase();
        needles.iter().any(|n| content.contains(&n.to_lowercase()))
    });
    if found {
        return Ok(());
    }
    Err(CheckError::expectation(format!(
        "{}: expected one of {:?} (any case). stderr: {} stdout: {}",
        what, needles, observed.stderr, observed.stdout
    )))
}

/// `stream` must match the regular expression `pattern`.
pub fn matches(
    observed: &Observed,
    stream: Stream,
    pattern: &str,
    what: &str,
) -> Result<(), CheckError> {
    let re = compile_regex(pattern)?;
    let content = stream.of(observed);
    if re.is_match(content) {
        return Ok(());
    }
    Err(CheckError::expectation(format!(
        "{}: no match for pattern /{}/ in {}: {}",
        what, pattern, stream.name(), content
    )))
}

/// Compile a regex pattern with multiline mode and a size limit to
/// mitigate ReDoS (CWE-1333).
fn compile_regex(pattern: &str) -> Result<regex::Regex, CheckError> {
    regex::RegexBuilder::new(&format!("(?m){}", pattern))
        .size_limit(1 << 20)
        .build()
        .map_err(|e| CheckError::usage(format!("invalid regex /{}/: {}", pattern, e)))
}
