//! Command executor seam for external processes.
//!
//! Every process the pipeline starts (git, the Gradle wrapper) goes through a
//! [`CommandExecutor`], so the sequencing logic can be exercised with
//! [`crate::fakes::ScriptedExecutor`] instead of real subprocesses.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;

/// A single external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run.
    pub program: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Working directory, or the current directory when `None`.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Runs external commands to completion and captures their output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `invocation` and wait for it to exit. A non-zero exit is not an
    /// error here; only a failure to start the process is.
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecError>;
}

/// Executor backed by real child processes.
///
/// No timeout is applied: a hung command blocks until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecError> {
        if invocation.program.is_empty() {
            return Err(ExecError::EmptyProgram);
        }

        let start = Instant::now();
        debug!(command = %invocation, "Spawning process");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ExecError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("./gradlew").args(["clean", "check"]);
        assert_eq!(inv.to_string(), "./gradlew clean check");
    }

    #[test]
    fn test_combined_output() {
        let out = CommandOutput {
            exit_code: 0,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            duration_ms: 1,
        };
        assert_eq!(out.combined(), "out\nerr");
        assert_eq!(CommandOutput::ok("only").combined(), "only");
        assert_eq!(CommandOutput::failed(1, "boom").combined(), "boom");
    }

    #[tokio::test]
    async fn test_execute_simple_command() {
        let inv = Invocation::new("echo").arg("hello");
        let result = ProcessExecutor.execute(&inv).await.expect("execute failed");
        assert!(result.success());
        assert!(result.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let inv = Invocation::new("false");
        let result = ProcessExecutor.execute(&inv).await.expect("execute failed");
        assert!(!result.success());
        assert_ne!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_execute_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let inv = Invocation::new("ls").current_dir(dir.path());
        let result = ProcessExecutor.execute(&inv).await.unwrap();
        assert!(result.stdout.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_error() {
        let inv = Invocation::new("/nonexistent-binary-that-does-not-exist");
        let err = ProcessExecutor.execute(&inv).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_empty_program_rejected() {
        let err = ProcessExecutor
            .execute(&Invocation::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::EmptyProgram));
    }
}
