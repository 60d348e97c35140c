//! Unified error taxonomy for the storage subsystem.
//!
//! Every backend reports outcomes through [`StoreError`], so callers see one
//! shape regardless of which backend is bound. Only the PostgreSQL backend
//! ever produces [`StoreError::Duplicate`]; the in-memory and file backends
//! always succeed on save.

use thiserror::Error;

/// Errors produced by the storage contract and its backends.
///
/// Mapping guidance for HTTP-facing callers: `Duplicate` → 409,
/// `NotFound` → 404, `TransientIo`/`SchemaInit` → 500, `InvalidInput` → 400.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No link matches the requested short code (or an owner has no links).
    #[error("short link not found")]
    NotFound,

    /// The original URL is already mapped; carries the pre-existing code.
    #[error("original url already shortened as '{existing_code}'")]
    Duplicate { existing_code: String },

    /// Connection, file I/O, or timeout failure. Never retried internally.
    #[error("storage i/o failure: {0}")]
    TransientIo(String),

    /// Startup migration or log-replay failure. Fatal to backend open.
    #[error("storage initialization failed: {0}")]
    SchemaInit(String),

    /// Caller handed the generator or a backend an unusable argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    pub fn transient_io(message: impl Into<String>) -> Self {
        Self::TransientIo(message.into())
    }

    pub fn schema_init(message: impl Into<String>) -> Self {
        Self::SchemaInit(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns the pre-existing short code when the error is a duplicate.
    pub fn existing_code(&self) -> Option<&str> {
        match self {
            Self::Duplicate { existing_code } => Some(existing_code),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::TransientIo(e.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for StoreError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::TransientIo("operation timed out".to_string())
    }
}
