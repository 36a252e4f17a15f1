//! Registry-specific error types.

use thiserror::Error;

/// Errors raised by registries and by folding contributions into snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown registry id: {0}")]
    UnknownId(String),

    #[error("Duplicate registry id: {0}")]
    DuplicateId(String),

    #[error("Contribution from '{source_id}' rejected: {reason}")]
    Rejected { source_id: String, reason: String },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
