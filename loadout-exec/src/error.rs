//! Execution layer error types.

use thiserror::Error;

/// Errors that can occur during execution operations.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Remote call could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote refused the mutation
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Manifest lookup failed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] loadout_domain::DomainError),

    /// Engine error
    #[error("Engine error: {0}")]
    Engine(#[from] loadout_engine::EngineError),
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
