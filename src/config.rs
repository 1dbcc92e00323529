//! Configuration System
//!
//! Layered configuration for the generator installation, collision defaults,
//! batch failure policy and logging. Sources are merged by the `config` crate
//! and deserialized with serde.

use crate::batch::FailurePolicy;
use crate::environment::{NoopEnvironment, SetupScript, DEFAULT_SETUP_SCRIPT};
use crate::logging::LoggingConfig;
use crate::runner::SystemRunner;
use crate::session::{GeneratorSession, DEFAULT_EXECUTABLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvgenConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub collisions: CollisionDefaults,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the generator lives and how it is launched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Installation root; the executable is `<install_path>/bin/<executable>`.
    /// A relative path is resolved against the working directory
    /// (`--workspace`), not the directory evgen was started from.
    #[serde(default = "default_install_path")]
    pub install_path: PathBuf,

    #[serde(default = "default_executable")]
    pub executable: String,

    /// Shell script sourced before launches, relative to the working
    /// directory. Empty disables sourcing.
    #[serde(default = "default_setup_script")]
    pub setup_script: String,

    /// Report a non-zero generator exit as an error
    #[serde(default = "default_true")]
    pub check_exit_status: bool,
}

fn default_install_path() -> PathBuf {
    PathBuf::from("../MG5_aMC")
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

fn default_setup_script() -> String {
    DEFAULT_SETUP_SCRIPT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            install_path: default_install_path(),
            executable: default_executable(),
            setup_script: default_setup_script(),
            check_exit_status: default_true(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.install_path.as_os_str().is_empty() {
            return Err("Install path cannot be empty".to_string());
        }
        if self.executable.trim().is_empty() {
            return Err("Executable name cannot be empty".to_string());
        }
        if self.executable.contains('/') {
            return Err(format!(
                "Executable name '{}' must be a file name inside <install_path>/bin",
                self.executable
            ));
        }
        Ok(())
    }

    /// Session running the real executable from `working_dir`.
    pub fn build_session(&self, working_dir: &Path) -> GeneratorSession {
        let session = GeneratorSession::new(&self.install_path)
            .with_executable(&self.executable)
            .with_working_dir(working_dir)
            .with_runner(Box::new(SystemRunner))
            .with_exit_status_check(self.check_exit_status);

        if self.setup_script.trim().is_empty() {
            session.with_environment(Box::new(NoopEnvironment))
        } else {
            session.with_environment(Box::new(SetupScript::new(&self.setup_script)))
        }
    }
}

/// Defaults applied to collisions that do not say otherwise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionDefaults {
    /// Emit lpp1/lpp2 PDF codes with the beam parameters
    #[serde(default)]
    pub include_pdf_codes: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Generator(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Generator(msg) => write!(f, "Generator: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl EvgenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.generator.validate() {
            errors.push(ValidationError::Generator(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
