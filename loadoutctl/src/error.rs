//! CLI error types.

use std::path::PathBuf;

use loadout_domain::{DomainError, ParseError};
use loadout_engine::EngineError;
use loadout_exec::ExecError;
use thiserror::Error;

/// Errors surfaced by `loadoutctl`.
#[derive(Debug, Error)]
pub enum CtlError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Loadout text could not be parsed
    #[error("Loadout parse error: {0}")]
    Parse(#[from] ParseError),

    /// Resolution failed
    #[error("Resolution error: {0}")]
    Engine(#[from] EngineError),

    /// Execution error
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File content is not the expected JSON
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Paste service request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Loadout source is unusable
    #[error("Invalid loadout source: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for CLI operations.
pub type CtlResult<T> = Result<T, CtlError>;
