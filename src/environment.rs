//! Environment preparation before generator launches.
//!
//! Installations often ship a shell setup script (compilers, LHAPDF, ROOT
//! paths). Sourcing it in a throwaway shell has no effect on later processes,
//! so [`SetupScript`] captures the environment the script produces and hands
//! it to the launch instead.

use crate::error::SessionError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Default setup script, relative to the working directory.
pub const DEFAULT_SETUP_SCRIPT: &str = "../setup.sh";

/// Environment variables applied to a generator launch, in capture order.
///
/// Setting a name twice keeps its first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: IndexMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Parse the NUL-separated `NAME=value` records printed by `env -0`.
    pub fn parse_env0(raw: &[u8]) -> Self {
        let mut vars = EnvVars::new();
        for record in raw.split(|b| *b == 0) {
            if record.is_empty() {
                continue;
            }
            let record = String::from_utf8_lossy(record);
            if let Some((name, value)) = record.split_once('=') {
                if !name.is_empty() {
                    vars.push(name, value);
                }
            }
        }
        vars
    }
}

/// Produces the environment for generator launches.
pub trait EnvironmentPreparer: Send + Sync {
    fn prepare(&self, working_dir: &Path) -> Result<EnvVars, SessionError>;
}

/// Leaves the inherited environment untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnvironment;

impl EnvironmentPreparer for NoopEnvironment {
    fn prepare(&self, _working_dir: &Path) -> Result<EnvVars, SessionError> {
        Ok(EnvVars::new())
    }
}

/// Sources a shell script, if present, and exports what it sets.
#[derive(Debug, Clone)]
pub struct SetupScript {
    path: PathBuf,
}

impl SetupScript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, working_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            working_dir.join(&self.path)
        }
    }
}

impl Default for SetupScript {
    fn default() -> Self {
        Self::new(DEFAULT_SETUP_SCRIPT)
    }
}

impl EnvironmentPreparer for SetupScript {
    fn prepare(&self, working_dir: &Path) -> Result<EnvVars, SessionError> {
        let script = self.resolve(working_dir);
        if !script.is_file() {
            debug!(script = %script.display(), "No setup script found, using inherited environment");
            return Ok(EnvVars::new());
        }

        let output = Command::new("bash")
            .arg("-c")
            .arg("source \"$0\" >/dev/null && env -0")
            .arg(&script)
            .current_dir(working_dir)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let vars = EnvVars::parse_env0(&output.stdout);
                debug!(script = %script.display(), vars = vars.len(), "Sourced setup script");
                Ok(vars)
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    script = %script.display(),
                    status = ?output.status.code(),
                    stderr = %stderr.trim(),
                    "Setup script failed, using inherited environment"
                );
                Ok(EnvVars::new())
            }
            Err(e) => {
                warn!(
                    script = %script.display(),
                    error = %e,
                    "Could not source setup script, using inherited environment"
                );
                Ok(EnvVars::new())
            }
        }
    }
}
