//! Error types for runner-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("failed to set mode on '{path}': {source}")]
    Chmod {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to set ownership on '{path}': {source}")]
    Chown {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to exec '{command}': {source}")]
    Exec {
        command: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
