//! Wallet request and response types.

use querypay_crypto::Address;
use querypay_types::{Allocation, Amount, ChannelId, ChannelResult};
use querypay_wire::OutboxItem;
use serde::{Deserialize, Serialize};

/// Record that a channel has been funded on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FundingRequest {
    /// Channel to mark as funded
    pub channel_id: ChannelId,
    /// Funding token
    pub token: Address,
    /// Total amount deposited
    pub amount: Amount,
}

/// Propose a new application state for a running channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateChannelRequest {
    /// Channel to update
    pub channel_id: ChannelId,
    /// Encoded app data of the new state
    pub app_data: Vec<u8>,
    /// Outcome of the new state
    pub allocations: Vec<Allocation>,
}

/// Outcome of ingesting a counterparty message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushMessageResult {
    /// Channels the message updated
    pub channel_results: Vec<ChannelResult>,
    /// Directives to send back as a direct consequence
    pub outbox: Vec<OutboxItem>,
}

/// Outcome of a wallet operation on a single channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletOutput {
    /// Channel snapshot after the operation
    pub channel_result: ChannelResult,
    /// Directives to send to the counterparty
    pub outbox: Vec<OutboxItem>,
}

impl WalletOutput {
    /// Create a new output.
    pub fn new(channel_result: ChannelResult, outbox: Vec<OutboxItem>) -> Self {
        Self {
            channel_result,
            outbox,
        }
    }
}
