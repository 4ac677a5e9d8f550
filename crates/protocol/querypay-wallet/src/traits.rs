//! Wallet trait definition.

use async_trait::async_trait;
use querypay_types::{ChannelId, ChannelResult};
use querypay_wire::Payload;

use crate::error::WalletResult;
use crate::types::{FundingRequest, PushMessageResult, UpdateChannelRequest, WalletOutput};

/// The cryptographic wallet that owns channel state.
///
/// The wallet holds the signing key, verifies counterparty signatures,
/// enforces turn ordering and persists channel history. Callers treat it
/// as the authority on channel state and keep only cached copies of its
/// results.
///
/// All methods are async and return `WalletResult`. Implementations are
/// expected to serialize access to their own persistent state.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ingest a counterparty message.
    ///
    /// Validates and merges the signed states it carries, then returns the
    /// affected channels and anything that must be sent back immediately.
    async fn push_message(&self, payload: &Payload) -> WalletResult<PushMessageResult>;

    /// Join a proposed channel by countersigning its pre-fund state.
    ///
    /// The outbox holds the countersigned pre-fund state and, for channels
    /// that need no deposit, the post-fund state as well.
    async fn join_channel(&self, channel: &ChannelResult) -> WalletResult<WalletOutput>;

    /// Record funding and sign the post-fund state.
    async fn update_channel_funding(&self, request: &FundingRequest)
        -> WalletResult<WalletOutput>;

    /// Sign the next application state of a running channel.
    async fn update_channel(&self, request: &UpdateChannelRequest) -> WalletResult<WalletOutput>;

    /// Fetch the latest channel result.
    ///
    /// Returns `None` if the wallet does not know the channel.
    async fn get_state(&self, channel_id: &ChannelId) -> WalletResult<Option<ChannelResult>>;
}
