//! Child processes under a hard wall-clock limit.
//!
//! A hung tool is a tooling failure, not a state to wait out: the child is
//! polled until it exits or the limit passes, then killed and reaped. On unix
//! the child leads its own process group and the whole group is killed, so
//! wrappers like `sh -c` or `mvn` take their JVMs down with them.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use amplify_core::errors::ToolingError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A command line to run, with placeholders already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
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
        self.working_dir = Some(dir.into());
        self
    }

    /// Copy of this spec with `{key}` placeholders in the arguments replaced.
    pub fn expanded(&self, vars: &[(&str, &str)]) -> Self {
        Self {
            program: self.program.clone(),
            args: expand_args(&self.args, vars),
            working_dir: self.working_dir.clone(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    /// Last `lines` lines of stderr, falling back to stdout when stderr is
    /// empty. Used for error messages.
    pub fn diagnostics(&self, lines: usize) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let all: Vec<&str> = source.lines().collect();
        all[all.len().saturating_sub(lines)..].join("\n")
    }
}

/// Replace every `{key}` in `args` with its value.
pub fn expand_args(args: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
        })
        .collect()
}

/// Run `spec` to completion, killing it if it outlives `timeout`.
///
/// A non-zero exit is not an error here; callers decide what it means.
pub fn run_with_timeout(
    spec: &CommandSpec,
    timeout: Duration,
) -> Result<ProcessOutput, ToolingError> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &spec.working_dir {
        command.current_dir(dir);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    tracing::debug!(command = %spec, timeout_secs = timeout.as_secs(), "spawning");
    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| ToolingError::Spawn {
        command: spec.to_string(),
        message: e.to_string(),
    })?;

    // Drain both pipes on their own threads so a chatty child cannot block
    // on a full pipe while we poll.
    let stdout = child.stdout.take().map(|pipe| thread::spawn(move || drain(pipe)));
    let stderr = child.stderr.take().map(|pipe| thread::spawn(move || drain(pipe)));

    let collect = |handle: Option<thread::JoinHandle<String>>| {
        handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    };

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_tree(&mut child);
                    // The group is gone, so both pipes are closed.
                    collect(stdout);
                    collect(stderr);
                    tracing::warn!(
                        command = %spec,
                        timeout_secs = timeout.as_secs(),
                        "killed after timeout"
                    );
                    return Err(ToolingError::Timeout {
                        command: spec.to_string(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                kill_tree(&mut child);
                return Err(ToolingError::io(format!("waiting for `{spec}`"), e));
            }
        }
    };
    let output = ProcessOutput {
        success: status.success(),
        status_code: status.code(),
        stdout: collect(stdout),
        stderr: collect(stderr),
        duration: start.elapsed(),
    };
    tracing::debug!(
        command = %spec,
        success = output.success,
        duration_ms = output.duration.as_millis() as u64,
        "process finished"
    );
    Ok(output)
}

/// Kill `child` and everything in its process group, then reap it.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
            tracing::debug!(pid = child.id(), error = %e, "killpg failed, killing child only");
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

fn drain(mut pipe: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
