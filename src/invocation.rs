//! Invocation — run the engine binary once and capture what it did
//!
//! One invocation spawns exactly one child, drains stdout and stderr on
//! reader threads, and waits for exit or the deadline. The child is killed
//! and reaped on every path that leaves before it exits. The deadline also
//! bounds collecting the output, since a process the child left behind can
//! hold the pipes open after the child itself is gone.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use crate::error::{CheckError, ErrorKind};
use crate::expect::Stream;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// An ordered command line: program followed by its arguments
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory for the child (inherits the harness's when unset)
    pub cwd: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment
    pub env: Vec<(String, String)>,
}

/// The captured outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    /// Exit code, or -1 when the child was terminated by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Observed {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// One-line rendering used in failure messages.
    pub fn describe(&self) -> String {
        format!("code={} stdout={} stderr={}", self.code, self.stdout, self.stderr)
    }
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program path and arguments as display tokens.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(self.program.to_string_lossy().to_string());
        tokens.extend(self.args.iter().cloned());
        tokens
    }

    /// Run to completion, bounded by `timeout`.
    pub fn run(&self, timeout: Duration) -> Result<Observed, CheckError> {
        let program = self.program.to_string_lossy().to_string();
        let resolved = look_path(&program).map_err(|e| {
            CheckError::new(ErrorKind::Launch, format!("failed to execute '{}': {}", program, e))
        })?;

        let mut cmd = Command::new(&resolved);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(program = %resolved.display(), args = ?self.args, "spawning engine");
        let start = Instant::now();

        let child = cmd.spawn().map_err(|e| {
            CheckError::new(ErrorKind::Launch, format!("failed to execute '{}': {}", program, e))
        })?;
        let mut guard = ChildGuard { child, armed: true };

        let (tx, rx) = mpsc::channel();
        drain(Stream::Stdout, guard.child.stdout.take(), tx.clone());
        drain(Stream::Stderr, guard.child.stderr.take(), tx);

        let deadline = start + timeout;
        let status = loop {
            if let Some(status) = guard.child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    program = %program,
                    timeout_ms = timeout.as_millis() as u64,
                    "engine timed out, killing"
                );
                // Readers are left detached: a grandchild may still hold the pipes.
                drop(guard);
                return Err(timed_out(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        };
        guard.disarm();

        let Some((stdout, stderr)) = collect_output(&rx, deadline)? else {
            tracing::warn!(
                program = %program,
                timeout_ms = timeout.as_millis() as u64,
                "engine exited but its output pipes are still open"
            );
            return Err(timed_out(timeout));
        };
        let code = status.code().unwrap_or(-1);

        tracing::debug!(
            code,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "engine exited"
        );

        Ok(Observed { code, stdout, stderr })
    }
}

/// Kills and reaps the wrapped child unless disarmed.
struct ChildGuard {
    child: Child,
    armed: bool,
}

impl ChildGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

type Drained = (Stream, std::io::Result<String>);

fn drain<R: Read + Send + 'static>(stream: Stream, pipe: Option<R>, tx: Sender<Drained>) {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buf).map(|_| ()),
            None => Ok(()),
        };
        let _ = tx.send((stream, result.map(|()| String::from_utf8_lossy(&buf).to_string())));
    });
}

/// Wait for both readers to reach end of file. `None` when `deadline`
/// passes first.
fn collect_output(
    rx: &Receiver<Drained>,
    deadline: Instant,
) -> Result<Option<(String, String)>, CheckError> {
    let mut stdout = None;
    let mut stderr = None;
    while stdout.is_none() || stderr.is_none() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((Stream::Stdout, text)) => stdout = Some(text?),
            Ok((Stream::Stderr, text)) => stderr = Some(text?),
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(CheckError::new(ErrorKind::Io, "output reader thread panicked"));
            }
        }
    }
    Ok(stdout.zip(stderr))
}

fn timed_out(timeout: Duration) -> CheckError {
    CheckError::new(ErrorKind::TimedOut, format!("timed out after {}ms", timeout.as_millis()))
}

/// Resolve a program name: paths are used as given, bare names are looked
/// up in `PATH`.
fn look_path(command: &str) -> Result<PathBuf, String> {
    let command_path = Path::new(command);

    if command.contains(std::path::MAIN_SEPARATOR) || command.contains('/') {
        // Absolute, so a `current_dir` on the child cannot change what runs.
        return command_path
            .canonicalize()
            .map_err(|e| format!("{}: {}", command, e));
    }

    let path_env = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_env) {
        if dir.as_os_str().is_empty() {
            continue;
        }

        #[cfg(windows)]
        {
            for ext in ["", ".exe", ".com", ".bat", ".cmd"] {
                let path = dir.join(format!("{}{}", command, ext));
                if path.is_file() {
                    return Ok(path);
                }
            }
        }

        #[cfg(not(windows))]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = dir.join(command);
            if let Ok(meta) = std::fs::metadata(&path) {
                if meta.is_file() && meta.permissions().mode() & 0o111 != 0 {
                    return Ok(path);
                }
            }
        }
    }

    Err(format!("executable not found: {}", command))
}
