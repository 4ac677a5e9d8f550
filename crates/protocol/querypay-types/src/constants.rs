//! Protocol constants.
//!
//! These constants define wire limits and the fixed turn numbers of the
//! two-party channel setup.

// =============================================================================
// Protocol Version
// =============================================================================

/// Protocol magic byte (first byte of every framed message)
pub const PROTOCOL_MAGIC: u8 = 0x51;

/// Current protocol version
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Wallet protocol version carried in message payloads
pub const WALLET_VERSION: &str = "querypay-wallet/0.3";

// =============================================================================
// Limits
// =============================================================================

/// Maximum framed message size: 1 MB
pub const MAX_MESSAGE_SIZE: u64 = 1_048_576;

/// Number of participants in a query channel (payer and provider)
pub const CHANNEL_PARTICIPANTS: usize = 2;

// =============================================================================
// Channel Setup
// =============================================================================

/// Turn number of the pre-fund setup state
pub const PRE_FUND_TURN_NUM: u64 = 0;

/// Turn number of the post-fund setup state
///
/// The last setup turn; application states start at the next turn.
pub const POST_FUND_TURN_NUM: u64 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_turns_ordered() {
        assert!(PRE_FUND_TURN_NUM < POST_FUND_TURN_NUM);
        assert_eq!(
            POST_FUND_TURN_NUM + 1,
            2 * CHANNEL_PARTICIPANTS as u64
        );
    }

    #[test]
    fn test_message_limit() {
        assert_eq!(MAX_MESSAGE_SIZE, 1024 * 1024);
    }
}
