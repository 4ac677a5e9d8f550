//! Error types for wallet operations.

use querypay_types::{ChannelId, ErrorCode};
use thiserror::Error;

/// Result type alias for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet does not know the channel.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// A signature on an incoming state did not verify.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// An incoming state is older than the wallet's latest.
    #[error("stale state: have turn {current}, got turn {submitted}")]
    StaleState {
        /// Latest supported turn
        current: u64,
        /// Turn number that was submitted
        submitted: u64,
    },

    /// The wallet refused the operation.
    #[error("operation rejected: {0}")]
    Rejected(String),

    /// State encoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The wallet backend is unreachable (retryable).
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    /// The wallet did not answer in time (retryable).
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Internal error (lock poisoning, unexpected state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create a new InvalidSignature error.
    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        Self::InvalidSignature(msg.into())
    }

    /// Create a new StaleState error.
    pub fn stale_state(current: u64, submitted: u64) -> Self {
        Self::StaleState { current, submitted }
    }

    /// Create a new Rejected error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a new Encoding error.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a new Unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new Timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if the caller may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    /// Map to a protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ChannelNotFound(_) => ErrorCode::ChannelNotFound,
            Self::InvalidSignature(_) => ErrorCode::InvalidSignature,
            Self::StaleState { .. } | Self::Rejected(_) => ErrorCode::WalletRejected,
            Self::Encoding(_) => ErrorCode::InvalidMessage,
            Self::Unavailable(_) | Self::Timeout(_) => ErrorCode::WalletUnavailable,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<querypay_wire::EncodeError> for WalletError {
    fn from(e: querypay_wire::EncodeError) -> Self {
        Self::Encoding(e.to_string())
    }
}
