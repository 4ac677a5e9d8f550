//! Error types for the channel cache.

use querypay_types::ErrorCode;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lock poisoning error.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    /// Create a lock poisoned error.
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        StoreError::LockPoisoned(msg.into())
    }

    /// Map to a protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::InternalError
    }
}
