//! Channel lifecycle controller.
//!
//! Inbound wallet-protocol messages drive a channel from proposal to
//! closure. After the wallet ingests a message, the channel's status and
//! the size of the wallet's outbox decide what happens next:
//!
//! | status     | outbox | action                                        |
//! |------------|--------|-----------------------------------------------|
//! | `proposed` | 0      | join, fund, reply with `[pre-fund, post-fund]` |
//! | `running`  | 0      | counterparty acknowledged, no reply           |
//! | `closed`   | 1      | forward the wallet's countersigned final state |
//! | otherwise  |        | `UnrecognizedProtocolTransition`              |

use querypay_econ::StateTransition;
use querypay_store::ChannelCache;
use querypay_types::{Allocation, ChannelId, ChannelResult, ChannelStatus, SignedState};
use querypay_wallet::{FundingRequest, PushMessageResult};
use querypay_wire::{Message, OutboxItem, Payload};
use tracing::{debug, info};

use crate::error::{OpsError, OpsResult};
use crate::manager::ChannelManager;

/// What an inbound message did to its channel.
///
/// Decided once per message from the channel status and outbox size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolTransition {
    /// A new channel was proposed to us.
    ProposedEmpty,
    /// The counterparty countersigned the post-fund state.
    RunningEmpty,
    /// The channel closed and the wallet countersigned the final state.
    ClosedSingle,
    /// Anything else.
    Other,
}

impl ProtocolTransition {
    /// Classify a channel status and outbox size.
    pub fn classify(status: ChannelStatus, outbox_len: usize) -> Self {
        match (status, outbox_len) {
            (ChannelStatus::Proposed, 0) => Self::ProposedEmpty,
            (ChannelStatus::Running, 0) => Self::RunningEmpty,
            (ChannelStatus::Closed, 1) => Self::ClosedSingle,
            _ => Self::Other,
        }
    }
}

impl<T, C> ChannelManager<T, C>
where
    T: StateTransition,
    C: ChannelCache,
{
    /// Handle an inbound message from the counterparty.
    ///
    /// Returns the message to send back, if any. The wallet must report
    /// the channel addressed by the message's first state; any other
    /// channel is rejected with `ChannelMismatch` before it is cached.
    pub async fn handle_inbound_message(&self, message: &Message) -> OpsResult<Option<Message>> {
        let addressed = message.first_state().map(SignedState::channel_id);
        let _guard = match addressed {
            Some(channel_id) => Some(self.locks.lock(&channel_id).await?),
            None => None,
        };

        let PushMessageResult {
            channel_results,
            outbox,
        } = self.wallet.push_message(&message.data).await?;
        let channel_result = channel_results
            .into_iter()
            .next()
            .ok_or(OpsError::NoChannelUpdate)?;

        // A stateless message cannot name its channel up front
        let _reported_guard = match addressed {
            Some(expected) if expected != channel_result.channel_id => {
                return Err(OpsError::ChannelMismatch {
                    expected,
                    actual: channel_result.channel_id,
                });
            }
            Some(_) => None,
            None => Some(self.locks.lock(&channel_result.channel_id).await?),
        };

        let channel = self.cache_result(channel_result)?;
        let transition = ProtocolTransition::classify(channel.status, outbox.len());
        debug!(
            channel_id = %channel.channel_id,
            status = %channel.status,
            outbox_len = outbox.len(),
            transition = ?transition,
            "Classified inbound message"
        );

        match transition {
            ProtocolTransition::ProposedEmpty => {
                self.join_proposed_channel(&channel).await.map(Some)
            }
            ProtocolTransition::RunningEmpty => Ok(None),
            ProtocolTransition::ClosedSingle => {
                let reply = outbox.into_iter().next().map(|item| item.params);
                info!(channel_id = %channel.channel_id, "Channel closed");
                Ok(reply)
            }
            ProtocolTransition::Other => Err(OpsError::UnrecognizedProtocolTransition {
                status: channel.status,
                outbox_len: outbox.len(),
            }),
        }
    }

    /// Find the known channel an inbound message belongs to.
    ///
    /// Returns `None` when the message carries no signed state or the
    /// channel is unknown to both the cache and the wallet.
    pub async fn resolve_channel_for_message(
        &self,
        message: &Message,
    ) -> OpsResult<Option<ChannelId>> {
        let Some(channel_id) = message.first_state().map(SignedState::channel_id) else {
            return Ok(None);
        };

        let _guard = self.locks.lock(&channel_id).await?;
        Ok(self
            .resolve_channel(&channel_id)
            .await?
            .map(|channel| channel.channel_id))
    }

    /// Join a proposed channel and produce the setup reply.
    async fn join_proposed_channel(&self, channel: &ChannelResult) -> OpsResult<Message> {
        let allocation = sole_allocation(&channel.allocations)?;
        let total = allocation.total().ok_or(OpsError::AmountOverflow)?;

        let joined = self.wallet.join_channel(channel).await?;
        self.cache_result(joined.channel_result)?;
        let outbox = joined.outbox;

        let len = outbox.len();
        if !(1..=2).contains(&len) {
            return Err(OpsError::MalformedJoinOutbox { len });
        }
        let pre_fund_item = &outbox[0];
        let pre_fund = pre_fund_item
            .first_state()
            .cloned()
            .ok_or(OpsError::MalformedJoinOutbox { len })?;

        let post_fund = if total == 0 && self.config.zero_value_shortcut && len == 2 {
            debug!(channel_id = %channel.channel_id, "Zero-value channel, skipping funding");
            outbox[1].first_state().cloned()
        } else {
            let request = FundingRequest {
                channel_id: channel.channel_id,
                token: allocation.token,
                amount: total,
            };
            debug!(
                channel_id = %channel.channel_id,
                token = %request.token,
                amount = request.amount,
                "Recording channel funding"
            );
            let funded = self.wallet.update_channel_funding(&request).await?;
            self.cache_result(funded.channel_result)?;
            funded.outbox.first().and_then(OutboxItem::first_state).cloned()
        }
        .ok_or(OpsError::UndefinedPostFundState)?;

        let reply = Message::new(
            pre_fund_item.params.sender,
            pre_fund_item.params.recipient,
            Payload {
                wallet_version: pre_fund_item.params.data.wallet_version.clone(),
                signed_states: vec![pre_fund, post_fund],
            },
        );

        info!(
            channel_id = %channel.channel_id,
            total_funding = total,
            counterparty = %reply.recipient,
            "Channel created"
        );
        Ok(reply)
    }
}

/// The single allocation of a query channel.
fn sole_allocation(allocations: &[Allocation]) -> OpsResult<&Allocation> {
    match allocations {
        [allocation] => Ok(allocation),
        _ => Err(OpsError::UnsupportedAllocationShape {
            count: allocations.len(),
        }),
    }
}
