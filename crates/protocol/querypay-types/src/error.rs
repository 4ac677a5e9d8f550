//! Protocol error codes.
//!
//! Every operational error in the workspace maps onto one of these codes,
//! so callers can report failures uniformly regardless of which crate
//! detected them.

use serde::{Deserialize, Serialize};

/// Protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Channel Errors (0x0100 - 0x01FF)
    // =========================================================================
    /// Channel is unknown to the cache and the wallet
    ChannelNotFound = 0x0100,
    /// Channel exists but does not accept application updates
    ChannelNotRunning = 0x0101,
    /// Inbound message did not update any channel
    NoChannelUpdate = 0x0102,
    /// Channel status and outbox match no lifecycle branch
    UnrecognizedTransition = 0x0103,
    /// Join produced an outbox of unexpected shape
    MalformedJoinOutbox = 0x0104,
    /// Funding did not yield a post-fund state
    UndefinedPostFundState = 0x0105,
    /// Wallet update produced no outbox item
    MissingOutboxItem = 0x0106,
    /// Wallet reported a channel other than the one the message addressed
    ChannelMismatch = 0x0107,

    // =========================================================================
    // Query Errors (0x0200 - 0x02FF)
    // =========================================================================
    /// Attestation is missing its response or signature
    InvalidAttestation = 0x0200,
    /// App data is not a valid query state
    InvalidAppData = 0x0201,
    /// Query round is not in a state that can be answered
    InvalidQueryState = 0x0202,
    /// Payer allocation cannot cover the payment
    InsufficientFunds = 0x0203,

    // =========================================================================
    // Validation Errors (0x0300 - 0x03FF)
    // =========================================================================
    /// Allocation layout is not supported
    UnsupportedAllocation = 0x0300,
    /// Amount arithmetic overflowed
    AmountOverflow = 0x0301,
    /// Message could not be encoded or decoded
    InvalidMessage = 0x0302,
    /// Signature verification failed
    InvalidSignature = 0x0303,

    // =========================================================================
    // Wallet Errors (0x0400 - 0x04FF)
    // =========================================================================
    /// Wallet rejected the operation
    WalletRejected = 0x0400,
    /// Wallet is temporarily unavailable
    WalletUnavailable = 0x0401,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error
    InternalError = 0xFFFF,
}

impl ErrorCode {
    /// Returns true if this is a channel error (0x0100-0x01FF)
    pub fn is_channel_error(&self) -> bool {
        (0x0100..=0x01FF).contains(&self.code())
    }

    /// Returns true if this is a query error (0x0200-0x02FF)
    pub fn is_query_error(&self) -> bool {
        (0x0200..=0x02FF).contains(&self.code())
    }

    /// Returns true if this is a validation error (0x0300-0x03FF)
    pub fn is_validation_error(&self) -> bool {
        (0x0300..=0x03FF).contains(&self.code())
    }

    /// Returns true if this is a wallet error (0x0400-0x04FF)
    pub fn is_wallet_error(&self) -> bool {
        (0x0400..=0x04FF).contains(&self.code())
    }

    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get a user-facing hint for recovering from this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ChannelNotFound => {
                Some("The channel must be proposed by the payer before it can be used.")
            }
            Self::ChannelNotRunning => {
                Some("Wait for the post-fund exchange to finish, or open a new channel.")
            }
            Self::NoChannelUpdate => Some("The message was already applied or is stale."),
            Self::UnrecognizedTransition => {
                Some("The counterparty sent a message out of order. Resend or abandon the channel.")
            }
            Self::ChannelMismatch => {
                Some("Send one message per channel. Each message must address a single channel.")
            }
            Self::MalformedJoinOutbox | Self::UndefinedPostFundState | Self::MissingOutboxItem => {
                Some("The wallet produced unexpected output. Check the wallet version.")
            }
            Self::InvalidAttestation => Some("Provide both a response CID and a signature."),
            Self::InvalidAppData => Some("The payer's app data is not a query state."),
            Self::InvalidQueryState => Some("Only an open query request can be answered."),
            Self::InsufficientFunds => Some("The payer must deposit more before querying."),
            Self::UnsupportedAllocation => {
                Some("Query channels use a single allocation with one item per participant.")
            }
            Self::AmountOverflow => Some("Channel amounts exceed the supported range."),
            Self::InvalidMessage => Some("Check the message framing and protocol version."),
            Self::InvalidSignature => Some("Signature verification failed. Check your keys."),
            Self::WalletRejected => Some("Inspect the wallet logs for the rejection reason."),
            Self::WalletUnavailable => Some("Retry once the wallet is reachable."),
            Self::InternalError => Some("An internal error occurred. Please report this issue."),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        if self.is_channel_error() {
            "Channel"
        } else if self.is_query_error() {
            "Query"
        } else if self.is_validation_error() {
            "Validation"
        } else if self.is_wallet_error() {
            "Wallet"
        } else {
            "Internal"
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::ChannelNotFound => "CHANNEL_NOT_FOUND",
            ErrorCode::ChannelNotRunning => "CHANNEL_NOT_RUNNING",
            ErrorCode::NoChannelUpdate => "NO_CHANNEL_UPDATE",
            ErrorCode::UnrecognizedTransition => "UNRECOGNIZED_TRANSITION",
            ErrorCode::MalformedJoinOutbox => "MALFORMED_JOIN_OUTBOX",
            ErrorCode::UndefinedPostFundState => "UNDEFINED_POST_FUND_STATE",
            ErrorCode::MissingOutboxItem => "MISSING_OUTBOX_ITEM",
            ErrorCode::ChannelMismatch => "CHANNEL_MISMATCH",
            ErrorCode::InvalidAttestation => "INVALID_ATTESTATION",
            ErrorCode::InvalidAppData => "INVALID_APP_DATA",
            ErrorCode::InvalidQueryState => "INVALID_QUERY_STATE",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::UnsupportedAllocation => "UNSUPPORTED_ALLOCATION",
            ErrorCode::AmountOverflow => "AMOUNT_OVERFLOW",
            ErrorCode::InvalidMessage => "INVALID_MESSAGE",
            ErrorCode::InvalidSignature => "INVALID_SIGNATURE",
            ErrorCode::WalletRejected => "WALLET_REJECTED",
            ErrorCode::WalletUnavailable => "WALLET_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ChannelNotFound as u16, 0x0100);
        assert_eq!(ErrorCode::MissingOutboxItem as u16, 0x0106);
        assert_eq!(ErrorCode::InvalidAttestation as u16, 0x0200);
        assert_eq!(ErrorCode::UnsupportedAllocation as u16, 0x0300);
        assert_eq!(ErrorCode::WalletRejected as u16, 0x0400);
        assert_eq!(ErrorCode::InternalError as u16, 0xFFFF);
    }

    #[test]
    fn test_error_code_categories() {
        assert!(ErrorCode::ChannelNotRunning.is_channel_error());
        assert!(!ErrorCode::ChannelNotRunning.is_query_error());
        assert!(ErrorCode::InsufficientFunds.is_query_error());
        assert!(ErrorCode::AmountOverflow.is_validation_error());
        assert!(ErrorCode::WalletUnavailable.is_wallet_error());

        assert_eq!(ErrorCode::UndefinedPostFundState.category(), "Channel");
        assert_eq!(ErrorCode::InvalidAppData.category(), "Query");
        assert_eq!(ErrorCode::InvalidMessage.category(), "Validation");
        assert_eq!(ErrorCode::WalletRejected.category(), "Wallet");
        assert_eq!(ErrorCode::InternalError.category(), "Internal");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ChannelNotFound.to_string(), "CHANNEL_NOT_FOUND");
        assert_eq!(
            ErrorCode::UnrecognizedTransition.to_string(),
            "UNRECOGNIZED_TRANSITION"
        );
    }

    #[test]
    fn test_every_code_has_suggestion() {
        for code in [
            ErrorCode::ChannelNotFound,
            ErrorCode::NoChannelUpdate,
            ErrorCode::InvalidAttestation,
            ErrorCode::AmountOverflow,
            ErrorCode::WalletUnavailable,
            ErrorCode::InternalError,
        ] {
            assert!(code.suggestion().is_some(), "{} has no suggestion", code);
        }
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&ErrorCode::ChannelNotRunning).unwrap();
        let decoded: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, ErrorCode::ChannelNotRunning);
    }
}
