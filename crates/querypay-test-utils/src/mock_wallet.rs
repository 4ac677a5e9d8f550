//! Mock implementation of the `Wallet` trait for testing.
//!
//! Simulates the provider's wallet for a two-party query channel. It signs
//! with a real Ed25519 key, tracks channel status and turn numbers in
//! memory, and records every call. Individual responses can be scripted to
//! exercise malformed wallet output.

use async_trait::async_trait;
use querypay_crypto::{address_from_public_key, Address, PrivateKey};
use querypay_types::{
    Allocation, ChannelId, ChannelResult, ChannelStatus, SignedState, POST_FUND_TURN_NUM,
    PRE_FUND_TURN_NUM,
};
use querypay_wallet::{
    FundingRequest, PushMessageResult, UpdateChannelRequest, Wallet, WalletError, WalletOutput,
    WalletResult,
};
use querypay_wire::{sign_state, Message, OutboxItem, Payload};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::helpers::provider_identity;

struct MockChannel {
    /// Latest state the mock knows for the channel.
    latest: SignedState,
    /// Current status.
    status: ChannelStatus,
}

impl MockChannel {
    fn result(&self) -> ChannelResult {
        ChannelResult::from_state(&self.latest, self.status)
    }
}

#[derive(Default)]
struct Scripts {
    push: VecDeque<PushMessageResult>,
    join: VecDeque<WalletOutput>,
    funding: VecDeque<WalletOutput>,
    update: VecDeque<WalletOutput>,
}

struct MockWalletInner {
    /// Signing key of the wallet owner.
    private_key: PrivateKey,
    /// Address of the wallet owner.
    address: Address,
    /// Known channels.
    channels: HashMap<ChannelId, MockChannel>,
    /// Scripted responses, consumed before simulating.
    scripts: Scripts,
    /// Record of all pushed payloads.
    pushed: Vec<Payload>,
    /// Record of all joined channels.
    joined: Vec<ChannelId>,
    /// Record of all funding requests.
    funding_requests: Vec<FundingRequest>,
    /// Record of all update requests.
    update_requests: Vec<UpdateChannelRequest>,
    /// Record of all state fetches.
    state_fetches: Vec<ChannelId>,
    /// When true, all operations return Unavailable.
    should_fail: bool,
    /// When true, `get_state` reports unknown channels as ChannelNotFound.
    not_found_as_error: bool,
    /// Delay applied before every update_channel answer.
    update_latency: Option<Duration>,
}

/// A mock implementation of the `Wallet` trait for testing.
///
/// Uses `Arc<RwLock<...>>` internally, so it is cheap to clone and all
/// clones share the same state.
#[derive(Clone)]
pub struct MockWallet {
    inner: Arc<RwLock<MockWalletInner>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    /// Create a new MockWallet owned by the test provider identity.
    pub fn new() -> Self {
        let (private_key, public_key) = provider_identity();
        Self::with_identity(private_key, address_from_public_key(&public_key))
    }

    /// Create a MockWallet with a specific signing identity.
    pub fn with_identity(private_key: PrivateKey, address: Address) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockWalletInner {
                private_key,
                address,
                channels: HashMap::new(),
                scripts: Scripts::default(),
                pushed: Vec::new(),
                joined: Vec::new(),
                funding_requests: Vec::new(),
                update_requests: Vec::new(),
                state_fetches: Vec::new(),
                should_fail: false,
                not_found_as_error: false,
                update_latency: None,
            })),
        }
    }

    /// Configure the mock to fail all operations.
    pub fn with_failure(self) -> Self {
        self.inner.write().unwrap().should_fail = true;
        self
    }

    /// Report unknown channels from `get_state` as `ChannelNotFound`.
    pub fn with_not_found_errors(self) -> Self {
        self.inner.write().unwrap().not_found_as_error = true;
        self
    }

    /// Delay every `update_channel` answer.
    pub fn with_update_latency(self, latency: Duration) -> Self {
        self.inner.write().unwrap().update_latency = Some(latency);
        self
    }

    /// Seed a known channel.
    pub fn with_channel(self, state: SignedState, status: ChannelStatus) -> Self {
        self.insert_channel(state, status);
        self
    }

    /// Set the failure mode at runtime.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.inner.write().unwrap().should_fail = should_fail;
    }

    /// Seed a known channel at runtime.
    pub fn insert_channel(&self, state: SignedState, status: ChannelStatus) {
        let channel_id = state.channel_id();
        self.inner.write().unwrap().channels.insert(
            channel_id,
            MockChannel {
                latest: state,
                status,
            },
        );
    }

    // =========================================================================
    // Scripted Responses
    // =========================================================================

    /// Answer the next `push_message` with `result`.
    pub fn queue_push_response(&self, result: PushMessageResult) {
        self.inner.write().unwrap().scripts.push.push_back(result);
    }

    /// Answer the next `join_channel` with `output`.
    pub fn queue_join_response(&self, output: WalletOutput) {
        self.inner.write().unwrap().scripts.join.push_back(output);
    }

    /// Answer the next `update_channel_funding` with `output`.
    pub fn queue_funding_response(&self, output: WalletOutput) {
        self.inner.write().unwrap().scripts.funding.push_back(output);
    }

    /// Answer the next `update_channel` with `output`.
    pub fn queue_update_response(&self, output: WalletOutput) {
        self.inner.write().unwrap().scripts.update.push_back(output);
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// Address of the wallet owner.
    pub fn address(&self) -> Address {
        self.inner.read().unwrap().address
    }

    /// Get all pushed payloads.
    pub fn pushed(&self) -> Vec<Payload> {
        self.inner.read().unwrap().pushed.clone()
    }

    /// Get the ids of all joined channels.
    pub fn joined(&self) -> Vec<ChannelId> {
        self.inner.read().unwrap().joined.clone()
    }

    /// Get all funding requests.
    pub fn funding_requests(&self) -> Vec<FundingRequest> {
        self.inner.read().unwrap().funding_requests.clone()
    }

    /// Get all update requests.
    pub fn update_requests(&self) -> Vec<UpdateChannelRequest> {
        self.inner.read().unwrap().update_requests.clone()
    }

    /// Get the ids of all state fetches.
    pub fn state_fetches(&self) -> Vec<ChannelId> {
        self.inner.read().unwrap().state_fetches.clone()
    }

    /// Get the mock's current view of a channel.
    pub fn channel(&self, channel_id: &ChannelId) -> Option<ChannelResult> {
        self.inner
            .read()
            .unwrap()
            .channels
            .get(channel_id)
            .map(MockChannel::result)
    }

    /// Get the number of known channels.
    pub fn channel_count(&self) -> usize {
        self.inner.read().unwrap().channels.len()
    }
}

fn configured_failure() -> WalletError {
    WalletError::unavailable("mock: configured to fail")
}

/// Sign `state` as the wallet owner and queue it for the counterparty.
fn countersign(inner: &MockWalletInner, mut state: SignedState) -> WalletResult<OutboxItem> {
    sign_state(&mut state, &inner.private_key, inner.address)?;
    let recipient = state
        .participants
        .iter()
        .find(|p| **p != inner.address)
        .copied()
        .unwrap_or_default();
    Ok(OutboxItem::queued(Message::new(
        inner.address,
        recipient,
        Payload::new(vec![state]),
    )))
}

/// The post-fund setup state following `state`.
fn post_fund_state(state: &SignedState) -> SignedState {
    SignedState {
        turn_num: POST_FUND_TURN_NUM,
        signatures: Vec::new(),
        ..state.clone()
    }
}

fn total_funding(allocations: &[Allocation]) -> u64 {
    allocations
        .iter()
        .filter_map(Allocation::total)
        .fold(0, u64::saturating_add)
}

#[async_trait]
impl Wallet for MockWallet {
    async fn push_message(&self, payload: &Payload) -> WalletResult<PushMessageResult> {
        let mut inner = self.inner.write().unwrap();
        if inner.should_fail {
            return Err(configured_failure());
        }
        inner.pushed.push(payload.clone());
        if let Some(scripted) = inner.scripts.push.pop_front() {
            return Ok(scripted);
        }

        let Some(state) = payload.signed_states.iter().max_by_key(|s| s.turn_num) else {
            return Ok(PushMessageResult::default());
        };
        let channel_id = state.channel_id();

        let status = match inner.channels.get(&channel_id) {
            None if state.turn_num == PRE_FUND_TURN_NUM => ChannelStatus::Proposed,
            None => return Err(WalletError::ChannelNotFound(channel_id)),
            Some(known) if state.turn_num < known.latest.turn_num => {
                return Err(WalletError::stale_state(
                    known.latest.turn_num,
                    state.turn_num,
                ));
            }
            Some(_) if state.is_final => ChannelStatus::Closed,
            Some(_) if state.turn_num >= POST_FUND_TURN_NUM => ChannelStatus::Running,
            Some(known) => known.status,
        };

        let outbox = if status == ChannelStatus::Closed {
            vec![countersign(&inner, state.clone())?]
        } else {
            Vec::new()
        };
        let latest = outbox
            .first()
            .and_then(OutboxItem::first_state)
            .cloned()
            .unwrap_or_else(|| state.clone());

        let channel = MockChannel { latest, status };
        let result = channel.result();
        inner.channels.insert(channel_id, channel);

        Ok(PushMessageResult {
            channel_results: vec![result],
            outbox,
        })
    }

    async fn join_channel(&self, channel: &ChannelResult) -> WalletResult<WalletOutput> {
        let mut inner = self.inner.write().unwrap();
        if inner.should_fail {
            return Err(configured_failure());
        }
        inner.joined.push(channel.channel_id);
        if let Some(scripted) = inner.scripts.join.pop_front() {
            return Ok(scripted);
        }

        let known = inner
            .channels
            .get(&channel.channel_id)
            .ok_or(WalletError::ChannelNotFound(channel.channel_id))?;
        if known.status != ChannelStatus::Proposed {
            return Err(WalletError::rejected(format!(
                "cannot join a {} channel",
                known.status
            )));
        }
        let pre_fund = known.latest.clone();

        let mut outbox = vec![countersign(&inner, pre_fund.clone())?];
        let (latest, status) = if total_funding(&pre_fund.outcome) == 0 {
            let post_fund = countersign(&inner, post_fund_state(&pre_fund))?;
            let latest = post_fund.first_state().cloned().unwrap_or(pre_fund);
            outbox.push(post_fund);
            (latest, ChannelStatus::Opening)
        } else {
            (pre_fund, ChannelStatus::Funding)
        };

        let updated = MockChannel { latest, status };
        let result = updated.result();
        inner.channels.insert(channel.channel_id, updated);
        Ok(WalletOutput::new(result, outbox))
    }

    async fn update_channel_funding(&self, request: &FundingRequest) -> WalletResult<WalletOutput> {
        let mut inner = self.inner.write().unwrap();
        if inner.should_fail {
            return Err(configured_failure());
        }
        inner.funding_requests.push(request.clone());
        if let Some(scripted) = inner.scripts.funding.pop_front() {
            return Ok(scripted);
        }

        let known = inner
            .channels
            .get(&request.channel_id)
            .ok_or(WalletError::ChannelNotFound(request.channel_id))?;
        let post_fund = countersign(&inner, post_fund_state(&known.latest))?;
        let latest = post_fund
            .first_state()
            .cloned()
            .ok_or_else(|| WalletError::internal("mock: post-fund item has no state"))?;

        let updated = MockChannel {
            latest,
            status: ChannelStatus::Opening,
        };
        let result = updated.result();
        inner.channels.insert(request.channel_id, updated);
        Ok(WalletOutput::new(result, vec![post_fund]))
    }

    async fn update_channel(&self, request: &UpdateChannelRequest) -> WalletResult<WalletOutput> {
        let latency = {
            let mut inner = self.inner.write().unwrap();
            if inner.should_fail {
                return Err(configured_failure());
            }
            inner.update_requests.push(request.clone());
            inner.update_latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.inner.write().unwrap();
        if let Some(scripted) = inner.scripts.update.pop_front() {
            return Ok(scripted);
        }

        let known = inner
            .channels
            .get(&request.channel_id)
            .ok_or(WalletError::ChannelNotFound(request.channel_id))?;
        if !known.status.is_running() {
            return Err(WalletError::rejected(format!(
                "cannot update a {} channel",
                known.status
            )));
        }
        let next = SignedState {
            turn_num: known.latest.turn_num + 1,
            outcome: request.allocations.clone(),
            app_data: request.app_data.clone(),
            signatures: Vec::new(),
            ..known.latest.clone()
        };

        let item = countersign(&inner, next)?;
        let latest = item
            .first_state()
            .cloned()
            .ok_or_else(|| WalletError::internal("mock: update item has no state"))?;
        let updated = MockChannel {
            latest,
            status: ChannelStatus::Running,
        };
        let result = updated.result();
        inner.channels.insert(request.channel_id, updated);
        Ok(WalletOutput::new(result, vec![item]))
    }

    async fn get_state(&self, channel_id: &ChannelId) -> WalletResult<Option<ChannelResult>> {
        let mut inner = self.inner.write().unwrap();
        if inner.should_fail {
            return Err(configured_failure());
        }
        inner.state_fetches.push(*channel_id);

        match inner.channels.get(channel_id) {
            Some(channel) => Ok(Some(channel.result())),
            None if inner.not_found_as_error => Err(WalletError::ChannelNotFound(*channel_id)),
            None => Ok(None),
        }
    }
}
