// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External process execution.
//!
//! Every build-tool invocation goes through [`ProcessAdapter`] so the compdb
//! pipeline can be driven by a scripted fake in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::status::StatusSink;

/// Messages sudo prints when it cannot authenticate.
const CREDENTIAL_FAILURE_MARKERS: &[&str] = &["a password is required", "incorrect password attempt"];

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{program}`: {source}")]
    SpawnFailed { program: String, source: std::io::Error },

    #[error("`{command}` exited with status {}: {stderr}", status_label(.code))]
    AbnormalExit { command: String, code: Option<i32>, stderr: String },

    /// The privilege wrapper rejected the supplied (or missing) credentials.
    #[error("invalid credentials for `{command}`")]
    InvalidCredential { command: String },

    #[error("i/o error while running `{command}`: {source}")]
    Io { command: String, source: std::io::Error },
}

fn status_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code, or -1 when terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self { status: 0, stdout: stdout.into(), stderr: String::new() }
    }
}

/// A command to run.
#[derive(Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    /// Return the output instead of failing when the exit status is non-zero.
    pub ignore_nonzero_exit: bool,
    /// Run through the privilege-escalation wrapper.
    pub privileged: bool,
    /// Receives stdout and stderr line by line while the command runs.
    pub log: Option<Arc<dyn StatusSink>>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            ignore_nonzero_exit: false,
            privileged: false,
            log: None,
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

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn ignore_nonzero_exit(mut self) -> Self {
        self.ignore_nonzero_exit = true;
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn log_to(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.log = Some(sink);
        self
    }

    /// Shell-like rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut out = String::new();
        if self.privileged {
            out.push_str("sudo ");
        }
        out.push_str(&self.program);
        for arg in &self.args {
            out.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                out.push('\'');
                out.push_str(arg);
                out.push('\'');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("cwd", &self.cwd)
            .field("env", &self.env)
            .field("ignore_nonzero_exit", &self.ignore_nonzero_exit)
            .field("privileged", &self.privileged)
            .field("log", &self.log.is_some())
            .finish()
    }
}

/// Runs external commands.
#[async_trait]
pub trait ProcessAdapter: Send + Sync + 'static {
    async fn exec(&self, spec: &CommandSpec) -> Result<ExecOutput, ExecError>;
}

/// Runs commands on the local machine with tokio.
///
/// Privileged commands are wrapped in non-interactive `sudo`, so they fail
/// fast with [`ExecError::InvalidCredential`] instead of blocking on a
/// password prompt nobody can answer.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalProcessAdapter;

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn exec(&self, spec: &CommandSpec) -> Result<ExecOutput, ExecError> {
        let command = spec.display();
        let mut cmd = if spec.privileged {
            let mut cmd = tokio::process::Command::new("sudo");
            cmd.arg("--non-interactive").arg("--").arg(&spec.program);
            cmd
        } else {
            tokio::process::Command::new(&spec.program)
        };
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(%command, cwd = ?spec.cwd, "running command");
        let mut child = cmd.spawn().map_err(|source| ExecError::SpawnFailed {
            program: if spec.privileged { "sudo".to_string() } else { spec.program.clone() },
            source,
        })?;

        let io_err = |source| ExecError::Io { command: command.clone(), source };
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let log = spec.log.as_deref();
        let (stdout, stderr) =
            tokio::try_join!(collect_lines(stdout, log), collect_lines(stderr, log))
                .map_err(io_err)?;
        let status = child.wait().await.map_err(io_err)?;

        let output = ExecOutput { status: status.code().unwrap_or(-1), stdout, stderr };
        if status.success() {
            return Ok(output);
        }
        if spec.privileged && is_credential_failure(&output.stderr) {
            return Err(ExecError::InvalidCredential { command });
        }
        if spec.ignore_nonzero_exit {
            return Ok(output);
        }
        Err(ExecError::AbnormalExit { command, code: status.code(), stderr: output.stderr })
    }
}

/// Read a pipe to the end, forwarding each line to `log`.
async fn collect_lines<R>(
    pipe: Option<R>,
    log: Option<&dyn StatusSink>,
) -> Result<String, std::io::Error>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(pipe) = pipe else {
        return Ok(collected);
    };
    let mut lines = BufReader::new(pipe).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(log) = log {
            log.append(&line);
        }
        collected.push_str(&line);
        collected.push('\n');
    }
    Ok(collected)
}

fn is_credential_failure(stderr: &str) -> bool {
    stderr.lines().any(|line| {
        line.starts_with("sudo:") && CREDENTIAL_FAILURE_MARKERS.iter().any(|m| line.contains(m))
    }) || stderr.contains("Sorry, try again")
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CommandSpec, ExecError, ExecOutput, ProcessAdapter};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Handler = dyn Fn(&CommandSpec) -> Result<ExecOutput, ExecError> + Send + Sync;

    /// Scripted process adapter.
    ///
    /// Records every command and answers through a handler closure, which
    /// may also touch the filesystem to simulate a build tool's side effects.
    /// Without a handler every command succeeds with empty output.
    #[derive(Clone, Default)]
    pub struct FakeProcessAdapter {
        calls: Arc<Mutex<Vec<CommandSpec>>>,
        handler: Option<Arc<Handler>>,
    }

    impl FakeProcessAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_handler(
            handler: impl Fn(&CommandSpec) -> Result<ExecOutput, ExecError> + Send + Sync + 'static,
        ) -> Self {
            Self { calls: Arc::default(), handler: Some(Arc::new(handler)) }
        }

        /// All commands executed so far.
        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().clone()
        }

        /// Rendered command lines executed so far.
        pub fn command_lines(&self) -> Vec<String> {
            self.calls.lock().iter().map(CommandSpec::display).collect()
        }
    }

    #[async_trait]
    impl ProcessAdapter for FakeProcessAdapter {
        async fn exec(&self, spec: &CommandSpec) -> Result<ExecOutput, ExecError> {
            self.calls.lock().push(spec.clone());
            let result = match &self.handler {
                Some(handler) => handler(spec),
                None => Ok(ExecOutput::default()),
            };
            if let (Ok(output), Some(log)) = (&result, &spec.log) {
                for line in output.stdout.lines().chain(output.stderr.lines()) {
                    log.append(line);
                }
            }
            result
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessAdapter;

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
