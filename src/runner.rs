//! External generator invocation
//!
//! The generator is driven by handing it a single card file. Every launch is
//! synchronous and yields a [`ToolOutcome`] carrying the exit status and the
//! captured output, so failures are visible to the caller.

use crate::environment::EnvVars;
use crate::error::SessionError;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// One launch of the generator executable against a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub executable: PathBuf,
    pub card: PathBuf,
    pub working_dir: PathBuf,
    pub env: EnvVars,
}

/// Result of a completed launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn succeeded() -> Self {
        Self {
            status: Some(0),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Launches the generator. Implemented by [`SystemRunner`] and by test doubles.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, SessionError>;
}

/// Runs the generator as an OS process and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, SessionError> {
        debug!(
            executable = %invocation.executable.display(),
            card = %invocation.card.display(),
            working_dir = %invocation.working_dir.display(),
            env_vars = invocation.env.len(),
            "Launching generator"
        );

        let output = Command::new(&invocation.executable)
            .arg(&invocation.card)
            .current_dir(&invocation.working_dir)
            .envs(invocation.env.iter())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SessionError::ExecutableNotFound(invocation.executable.clone()),
                _ => SessionError::Io(e),
            })?;

        Ok(ToolOutcome {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
