//! Helper functions for creating test fixtures.
//!
//! Provides deterministic payer and provider identities, channel states and
//! messages signed by the payer, and a pre-configured `ChannelManager`
//! backed by a [`MockWallet`].

use querypay_crypto::{
    address_from_public_key, identity_from_seed, Address, PrivateKey, PublicKey, ZERO_ADDRESS,
};
use querypay_econ::encode_app_data;
use querypay_ops::{DefaultChannelManager, OpsConfig};
use querypay_types::{
    Allocation, AllocationItem, Amount, ChannelConstants, ChannelId, QueryAppData, SignedState,
    POST_FUND_TURN_NUM, PRE_FUND_TURN_NUM,
};
use querypay_wire::{sign_state, Message, Payload};
use std::sync::Arc;

use crate::MockWallet;

/// Chain id used by all fixtures.
pub const TEST_CHAIN_ID: u64 = 1337;

/// Challenge duration used by all fixtures.
pub const TEST_CHALLENGE_DURATION: u64 = 86_400;

/// Turn number of the first query request after setup.
pub const FIRST_QUERY_TURN_NUM: u64 = POST_FUND_TURN_NUM + 1;

/// Deterministic payer identity.
pub fn payer_identity() -> (PrivateKey, PublicKey) {
    identity_from_seed([1u8; 32])
}

/// Deterministic provider identity (the owner of [`MockWallet::new`]).
pub fn provider_identity() -> (PrivateKey, PublicKey) {
    identity_from_seed([2u8; 32])
}

/// Address of the test payer.
pub fn payer_address() -> Address {
    address_from_public_key(&payer_identity().1)
}

/// Address of the test provider.
pub fn provider_address() -> Address {
    address_from_public_key(&provider_identity().1)
}

/// Application definition address used by all fixtures.
pub fn test_app_definition() -> Address {
    Address([0xAAu8; 20])
}

/// Channel constants between the test payer and provider.
pub fn test_constants(nonce: u64) -> ChannelConstants {
    ChannelConstants::new(
        TEST_CHAIN_ID,
        vec![payer_address(), provider_address()],
        nonce,
        TEST_CHALLENGE_DURATION,
    )
}

/// Id of the test channel with the given nonce.
pub fn test_channel_id(nonce: u64) -> ChannelId {
    test_constants(nonce).channel_id()
}

/// A single-token allocation paying the payer and provider.
pub fn test_allocation(payer_amount: Amount, provider_amount: Amount) -> Allocation {
    Allocation::new(
        ZERO_ADDRESS,
        vec![
            AllocationItem::new(payer_address(), payer_amount),
            AllocationItem::new(provider_address(), provider_amount),
        ],
    )
}

/// Encoded app data for an open query.
pub fn query_requested_app_data(payment: Amount) -> Vec<u8> {
    encode_app_data(&QueryAppData::requested("QmRequest", payment)).unwrap()
}

/// A channel state signed by the payer.
pub fn test_state(
    nonce: u64,
    turn_num: u64,
    outcome: Vec<Allocation>,
    app_data: Vec<u8>,
) -> SignedState {
    let constants = test_constants(nonce);
    let mut state = SignedState {
        chain_id: constants.chain_id,
        participants: constants.participants,
        channel_nonce: constants.channel_nonce,
        challenge_duration: constants.challenge_duration,
        app_definition: test_app_definition(),
        turn_num,
        is_final: false,
        outcome,
        app_data,
        signatures: Vec::new(),
    };
    sign_state(&mut state, &payer_identity().0, payer_address()).unwrap();
    state
}

/// Wrap states in a message from the payer to the provider.
pub fn payer_message(states: Vec<SignedState>) -> Message {
    Message::new(payer_address(), provider_address(), Payload::new(states))
}

/// The payer's channel proposal (pre-fund state).
pub fn proposal_message(nonce: u64, allocation: Allocation) -> Message {
    payer_message(vec![test_state(
        nonce,
        PRE_FUND_TURN_NUM,
        vec![allocation],
        Vec::new(),
    )])
}

/// The payer's countersignature on the post-fund state.
pub fn post_fund_ack_message(nonce: u64, allocation: Allocation) -> Message {
    payer_message(vec![test_state(
        nonce,
        POST_FUND_TURN_NUM,
        vec![allocation],
        Vec::new(),
    )])
}

/// The payer asks a query, locking `payment`.
pub fn query_request_message(
    nonce: u64,
    turn_num: u64,
    allocation: Allocation,
    payment: Amount,
) -> Message {
    payer_message(vec![test_state(
        nonce,
        turn_num,
        vec![allocation],
        query_requested_app_data(payment),
    )])
}

/// The payer's final state closing the channel.
pub fn closing_message(nonce: u64, turn_num: u64, allocation: Allocation) -> Message {
    let mut state = test_state(nonce, turn_num, vec![allocation], Vec::new());
    state.is_final = true;
    state.signatures.clear();
    sign_state(&mut state, &payer_identity().0, payer_address()).unwrap();
    payer_message(vec![state])
}

/// A state for a channel that is already running with an open query.
pub fn running_query_state(nonce: u64, allocation: Allocation, payment: Amount) -> SignedState {
    test_state(
        nonce,
        FIRST_QUERY_TURN_NUM,
        vec![allocation],
        query_requested_app_data(payment),
    )
}

/// Create a channel manager backed by a fresh mock wallet.
///
/// Returns the manager and the mock (for assertions and scripting).
pub fn create_test_manager() -> (DefaultChannelManager, MockWallet) {
    create_test_manager_with_config(OpsConfig::default())
}

/// Create a channel manager with a specific configuration.
pub fn create_test_manager_with_config(config: OpsConfig) -> (DefaultChannelManager, MockWallet) {
    create_test_manager_with_wallet(MockWallet::new(), config)
}

/// Create a channel manager around an existing mock wallet.
pub fn create_test_manager_with_wallet(
    wallet: MockWallet,
    config: OpsConfig,
) -> (DefaultChannelManager, MockWallet) {
    let manager = DefaultChannelManager::with_config(Arc::new(wallet.clone()), config);
    (manager, wallet)
}

/// Drive a funded channel through setup and open a query on it.
///
/// Returns the channel id. The channel is running with `payment` locked
/// at turn [`FIRST_QUERY_TURN_NUM`].
pub async fn open_running_channel(
    manager: &DefaultChannelManager,
    nonce: u64,
    payer_deposit: Amount,
    payment: Amount,
) -> ChannelId {
    let allocation = test_allocation(payer_deposit, 0);

    manager
        .handle_inbound_message(&proposal_message(nonce, allocation.clone()))
        .await
        .unwrap();
    manager
        .handle_inbound_message(&post_fund_ack_message(nonce, allocation.clone()))
        .await
        .unwrap();
    manager
        .handle_inbound_message(&query_request_message(
            nonce,
            FIRST_QUERY_TURN_NUM,
            allocation,
            payment,
        ))
        .await
        .unwrap();

    test_channel_id(nonce)
}
