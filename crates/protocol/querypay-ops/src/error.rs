//! Error types for the operations layer.
//!
//! This module defines the `OpsError` enum returned by every
//! `ChannelManager` operation.

use querypay_types::{ChannelId, ChannelStatus, ErrorCode};
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = std::result::Result<T, OpsError>;

/// Errors that can occur during channel operations.
///
/// None of these are retried internally. The caller decides whether to
/// resend the inbound message or abandon the channel.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpsError {
    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// The wallet returned no channel result for an inbound message.
    #[error("inbound message produced no channel update")]
    NoChannelUpdate,

    /// Joining produced an outbox that is not one or two items with states.
    #[error("join produced a malformed outbox of {len} items")]
    MalformedJoinOutbox {
        /// Number of outbox items returned.
        len: usize,
    },

    /// The channel does not hold exactly one allocation.
    #[error("unsupported allocation shape: expected 1 allocation, found {count}")]
    UnsupportedAllocationShape {
        /// Number of allocations found.
        count: usize,
    },

    /// Neither the zero-value shortcut nor funding yielded a post-fund state.
    #[error("no post-fund state after joining")]
    UndefinedPostFundState,

    /// The channel status and outbox size match no lifecycle branch.
    #[error("unrecognized protocol transition: status {status} with {outbox_len} outbox items")]
    UnrecognizedProtocolTransition {
        /// Channel status after ingestion.
        status: ChannelStatus,
        /// Number of outbox items after ingestion.
        outbox_len: usize,
    },

    /// The wallet applied an inbound message to a channel other than the
    /// one its first state addresses.
    #[error("inbound message for channel {expected} updated channel {actual}")]
    ChannelMismatch {
        /// Channel addressed by the message (and locked).
        expected: ChannelId,
        /// Channel reported by the wallet.
        actual: ChannelId,
    },

    /// Channel funding overflowed the amount type.
    #[error("channel funding overflows the amount type")]
    AmountOverflow,

    // =========================================================================
    // Settlement Errors
    // =========================================================================
    /// The channel is unknown to the cache and the wallet.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// The channel exists but is not running.
    #[error("channel {channel_id} is {status}, not running")]
    ChannelNotRunning {
        /// The channel.
        channel_id: ChannelId,
        /// Its current status.
        status: ChannelStatus,
    },

    /// The attestation is missing a response CID or signature.
    #[error("invalid attestation: {0}")]
    InvalidAttestation(String),

    /// A channel update produced no outbound message.
    #[error("channel update produced no outbox item")]
    MissingOutboxItem,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (lock poisoning).
    #[error("internal error: {0}")]
    Internal(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Wallet error.
    #[error("wallet error: {0}")]
    Wallet(#[from] querypay_wallet::WalletError),

    /// Cache error.
    #[error("store error: {0}")]
    Store(#[from] querypay_store::StoreError),

    /// Economics error.
    #[error("econ error: {0}")]
    Econ(#[from] querypay_econ::EconError),
}

impl OpsError {
    /// Create an invalid attestation error.
    pub fn invalid_attestation(msg: impl Into<String>) -> Self {
        OpsError::InvalidAttestation(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        OpsError::Internal(msg.into())
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NoChannelUpdate => ErrorCode::NoChannelUpdate,
            Self::MalformedJoinOutbox { .. } => ErrorCode::MalformedJoinOutbox,
            Self::UnsupportedAllocationShape { .. } => ErrorCode::UnsupportedAllocation,
            Self::UndefinedPostFundState => ErrorCode::UndefinedPostFundState,
            Self::UnrecognizedProtocolTransition { .. } => ErrorCode::UnrecognizedTransition,
            Self::ChannelMismatch { .. } => ErrorCode::ChannelMismatch,
            Self::AmountOverflow => ErrorCode::AmountOverflow,
            Self::ChannelNotFound(_) => ErrorCode::ChannelNotFound,
            Self::ChannelNotRunning { .. } => ErrorCode::ChannelNotRunning,
            Self::InvalidAttestation(_) => ErrorCode::InvalidAttestation,
            Self::MissingOutboxItem => ErrorCode::MissingOutboxItem,
            Self::Internal(_) => ErrorCode::InternalError,

            // Wrapped errors - delegate to inner type
            Self::Wallet(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Econ(e) => e.error_code(),
        }
    }

    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &'static str {
        self.error_code()
            .suggestion()
            .unwrap_or("An internal error occurred. Please report this issue.")
    }

    /// Returns true if the operation may succeed when the caller retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Wallet(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Metric labels for monitoring integration.
    pub fn metric_labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::NoChannelUpdate => ("ops", "no_channel_update"),
            Self::MalformedJoinOutbox { .. } => ("ops", "malformed_join_outbox"),
            Self::UnsupportedAllocationShape { .. } => ("ops", "unsupported_allocation"),
            Self::UndefinedPostFundState => ("ops", "undefined_post_fund_state"),
            Self::UnrecognizedProtocolTransition { .. } => ("ops", "unrecognized_transition"),
            Self::ChannelMismatch { .. } => ("ops", "channel_mismatch"),
            Self::AmountOverflow => ("ops", "amount_overflow"),
            Self::ChannelNotFound(_) => ("ops", "channel_not_found"),
            Self::ChannelNotRunning { .. } => ("ops", "channel_not_running"),
            Self::InvalidAttestation(_) => ("ops", "invalid_attestation"),
            Self::MissingOutboxItem => ("ops", "missing_outbox_item"),
            Self::Internal(_) => ("ops", "internal"),
            Self::Wallet(_) => ("ops", "wallet"),
            Self::Store(_) => ("ops", "store"),
            Self::Econ(_) => ("ops", "econ"),
        }
    }
}
