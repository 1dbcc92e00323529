//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{EvgenError, SessionError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &EvgenError) -> String {
    match e {
        EvgenError::Session(SessionError::ExecutableNotFound(_))
        | EvgenError::BatchAborted {
            source: SessionError::ExecutableNotFound(_),
            ..
        } => format!(
            "{}\nSet generator.install_path in evgen.toml or pass --install-path.",
            e
        ),
        _ => e.to_string(),
    }
}
