//! Error types for shellenv-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from shellenv-core
    #[error(transparent)]
    Core(#[from] shellenv_core::Error),

    /// The request file could not be read
    #[error("cannot read request {path}: {source}")]
    ReadRequest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request file is not valid YAML or JSON
    #[error("cannot parse request {path}: {source}")]
    ParseRequest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON output could not be produced
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialized
    #[error("cannot initialize logging: {0}")]
    Logging(String),
}
