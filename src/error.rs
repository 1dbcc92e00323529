//! Error types for collision description, generator sessions and batch driving.

use std::path::PathBuf;
use thiserror::Error;

/// Collision description errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollisionError {
    #[error("There are {count} particles in the initial state '{initial_state}', while it should be two")]
    InvalidInitialState { count: usize, initial_state: String },
}

/// Errors raised by a generator session operation
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Process directory not found: {0}. Materialize the process before generating events.")]
    MissingProcessDirectory(PathBuf),

    #[error("Generator executable not found: {0}")]
    ExecutableNotFound(PathBuf),

    #[error("Generator failed on {} (exit status: {}): {}", .card.display(), display_status(.status), .stderr)]
    ToolFailed {
        card: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Generator did not create process directory {0}")]
    ProcessDirectoryNotCreated(PathBuf),

    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level errors for the library and CLI
#[derive(Debug, Error)]
pub enum EvgenError {
    #[error("Invalid collision: {0}")]
    Collision(#[from] CollisionError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Run plan error: {0}")]
    PlanError(String),

    #[error("Batch aborted at '{directory}': {source}")]
    BatchAborted {
        directory: String,
        #[source]
        source: SessionError,
    },
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl From<config::ConfigError> for EvgenError {
    fn from(err: config::ConfigError) -> Self {
        EvgenError::ConfigError(err.to_string())
    }
}
