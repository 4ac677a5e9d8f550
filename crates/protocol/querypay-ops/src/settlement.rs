//! Query settlement.
//!
//! Once a channel is running, the provider answers each query either by
//! attesting to a response, which releases the locked payment, or by
//! declining it. Both advance the channel by one application state.

use querypay_econ::{StateTransition, TransitionRequest};
use querypay_store::ChannelCache;
use querypay_types::{Attestation, ChannelId};
use querypay_wallet::UpdateChannelRequest;
use querypay_wire::Message;
use tracing::debug;

use crate::error::{OpsError, OpsResult};
use crate::manager::ChannelManager;

impl<T, C> ChannelManager<T, C>
where
    T: StateTransition,
    C: ChannelCache,
{
    /// Attest to a query response and collect the payment.
    ///
    /// Returns the message carrying the new state to the payer.
    ///
    /// # Errors
    ///
    /// `InvalidAttestation` if the response CID or signature is empty,
    /// plus everything [`decline_query`](Self::decline_query) can return.
    pub async fn provide_attestation(
        &self,
        channel_id: &ChannelId,
        attestation: Attestation,
    ) -> OpsResult<Message> {
        if attestation.response_cid.is_empty() {
            return Err(OpsError::invalid_attestation("response CID is empty"));
        }
        if attestation.signature.is_empty() {
            return Err(OpsError::invalid_attestation("signature is empty"));
        }

        self.advance_query_state(channel_id, TransitionRequest::attest(attestation))
            .await
    }

    /// Decline the open query.
    ///
    /// # Errors
    ///
    /// - `ChannelNotFound` if the channel is unknown
    /// - `ChannelNotRunning` if the channel is not running
    /// - `Econ` if the transition rejects the current state
    /// - `MissingOutboxItem` if the wallet produced no message
    pub async fn decline_query(&self, channel_id: &ChannelId) -> OpsResult<Message> {
        self.advance_query_state(channel_id, TransitionRequest::decline())
            .await
    }

    async fn advance_query_state(
        &self,
        channel_id: &ChannelId,
        request: TransitionRequest,
    ) -> OpsResult<Message> {
        let _guard = self.locks.lock(channel_id).await?;

        let channel = self
            .resolve_channel(channel_id)
            .await?
            .ok_or(OpsError::ChannelNotFound(*channel_id))?;
        if !channel.is_running() {
            return Err(OpsError::ChannelNotRunning {
                channel_id: *channel_id,
                status: channel.status,
            });
        }

        let next = self.transition.compute_next_state(
            &channel.app_data,
            &channel.allocations,
            &request,
        )?;

        debug!(
            channel_id = %channel_id,
            turn_num = channel.turn_num,
            state_type = ?request.to_state_type,
            "Updating channel"
        );
        let output = self
            .wallet
            .update_channel(&UpdateChannelRequest {
                channel_id: *channel_id,
                app_data: next.app_data,
                allocations: vec![next.allocation],
            })
            .await?;

        self.cache_result(output.channel_result)?;
        output
            .outbox
            .into_iter()
            .next()
            .map(|item| item.params)
            .ok_or(OpsError::MissingOutboxItem)
    }
}
