//! Error taxonomy for the research ledger.
//!
//! Library code returns [`LedgerError`]; the CLI converts to `anyhow` at the
//! boundary and exits non-zero. None of these are recovered internally:
//! retry policy, where wanted, belongs to the caller or the provider wrapper.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Identifier is empty or contains characters outside `[A-Za-z0-9_-]`.
    /// Raised before any filesystem access; identifiers double as file
    /// names, so this check is what prevents path traversal.
    #[error("invalid research id: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidIdentifier(String),

    #[error("research not found: {0}")]
    NotFound(String),

    #[error("version {requested} not found for '{id}'. Available: 1-{available}")]
    VersionOutOfRange {
        id: String,
        requested: u32,
        available: usize,
    },

    /// The embedding provider failed or returned malformed output.
    #[error("embedding provider error: {0}")]
    Oracle(String),

    /// The findings provider failed or returned malformed output.
    #[error("findings provider error: {0}")]
    Producer(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
