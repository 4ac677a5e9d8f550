//! Query settlement integration tests.
//!
//! These tests exercise `provide_attestation` and `decline_query` on
//! channels driven through setup by the `MockWallet`.

use std::sync::Arc;
use std::time::Duration;

use querypay_econ::{decode_app_data, EconError, PAYER_INDEX, PROVIDER_INDEX};
use querypay_ops::{OpsConfig, OpsError};
use querypay_store::ChannelCache;
use querypay_test_utils::*;
use querypay_types::{Attestation, ChannelStatus, ErrorCode, QueryStateType};
use querypay_wallet::WalletOutput;

// =========================================================================
// Attestation
// =========================================================================

#[tokio::test]
async fn test_attestation_on_running_channel() {
    let (manager, wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 1, 100, 25).await;
    let before = manager.get_channel_result(&channel_id).await.unwrap();

    let message = manager
        .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
        .await
        .unwrap();

    assert_eq!(message.state_count(), 1);
    assert_eq!(message.recipient, payer_address());

    let after = manager.get_channel_result(&channel_id).await.unwrap();
    assert_eq!(after.turn_num, before.turn_num + 1);

    let items = &after.allocations[0].items;
    assert_eq!(items[PAYER_INDEX].amount, 75);
    assert_eq!(items[PROVIDER_INDEX].amount, 25);

    let data = decode_app_data(&after.app_data).unwrap();
    assert_eq!(data.state_type, QueryStateType::AttestationProvided);
    assert_eq!(data.response_cid, "Qm123");
    assert_eq!(data.signature, "0xabc");

    let updates = wallet.update_requests();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].channel_id, channel_id);
    assert_eq!(updates[0].allocations.len(), 1);
}

#[tokio::test]
async fn test_attestation_state_is_signed_by_provider() {
    let (manager, _wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 2, 100, 5).await;

    let message = manager
        .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
        .await
        .unwrap();

    let state = message.first_state().unwrap();
    assert_eq!(state.channel_id(), channel_id);
    assert!(state.is_signed_by(&provider_address()));
}

#[tokio::test]
async fn test_attestation_requires_response_cid_and_signature() {
    let (manager, wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 3, 100, 5).await;

    for attestation in [
        Attestation::new("", "0xabc"),
        Attestation::new("Qm123", ""),
        Attestation::empty(),
    ] {
        let result = manager.provide_attestation(&channel_id, attestation).await;
        assert!(matches!(result, Err(OpsError::InvalidAttestation(_))));
    }
    assert!(wallet.update_requests().is_empty());
}

#[tokio::test]
async fn test_attestation_insufficient_funds() {
    let (manager, wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 4, 10, 50).await;

    let err = manager
        .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OpsError::Econ(EconError::InsufficientFunds {
            available: 10,
            required: 50
        })
    ));
    assert_eq!(err.error_code(), ErrorCode::InsufficientFunds);
    assert!(wallet.update_requests().is_empty());
}

#[tokio::test]
async fn test_second_attestation_needs_new_query() {
    let (manager, _wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 5, 100, 10).await;

    manager
        .provide_attestation(&channel_id, Attestation::new("Qm1", "0x01"))
        .await
        .unwrap();
    let again = manager
        .provide_attestation(&channel_id, Attestation::new("Qm2", "0x02"))
        .await;
    assert!(matches!(
        again,
        Err(OpsError::Econ(EconError::UnexpectedStateType { .. }))
    ));

    // The payer opens the next query on top of the attested state
    let current = manager.get_channel_result(&channel_id).await.unwrap();
    let next_query = query_request_message(
        5,
        current.turn_num + 1,
        current.allocations[0].clone(),
        10,
    );
    assert!(manager
        .handle_inbound_message(&next_query)
        .await
        .unwrap()
        .is_none());

    manager
        .provide_attestation(&channel_id, Attestation::new("Qm2", "0x02"))
        .await
        .unwrap();
    let after = manager.get_channel_result(&channel_id).await.unwrap();
    assert_eq!(after.allocations[0].items[PROVIDER_INDEX].amount, 20);
}

// =========================================================================
// Decline
// =========================================================================

#[tokio::test]
async fn test_decline_keeps_balances() {
    let (manager, _wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 6, 100, 10).await;
    let before = manager.get_channel_result(&channel_id).await.unwrap();

    let message = manager.decline_query(&channel_id).await.unwrap();
    assert_eq!(message.state_count(), 1);

    let after = manager.get_channel_result(&channel_id).await.unwrap();
    assert_eq!(after.turn_num, before.turn_num + 1);
    assert_eq!(after.allocations, before.allocations);
    let data = decode_app_data(&after.app_data).unwrap();
    assert_eq!(data.state_type, QueryStateType::QueryDeclined);
    assert!(data.attestation().is_empty());
}

#[tokio::test]
async fn test_decline_unknown_channel() {
    let (manager, wallet) = create_test_manager();
    let channel_id = test_channel_id(404);

    let result = manager.decline_query(&channel_id).await;

    assert!(matches!(result, Err(OpsError::ChannelNotFound(id)) if id == channel_id));
    assert_eq!(wallet.state_fetches(), vec![channel_id]);
    assert!(wallet.update_requests().is_empty());
}

// =========================================================================
// Preconditions and Wallet Output
// =========================================================================

#[tokio::test]
async fn test_update_on_non_running_channel_makes_no_wallet_call() {
    let (manager, wallet) = create_test_manager();
    manager
        .handle_inbound_message(&proposal_message(7, test_allocation(100, 0)))
        .await
        .unwrap();
    let channel_id = test_channel_id(7);

    let result = manager
        .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
        .await;

    assert!(matches!(
        result,
        Err(OpsError::ChannelNotRunning {
            status: ChannelStatus::Opening,
            ..
        })
    ));
    assert!(wallet.update_requests().is_empty());
}

#[tokio::test]
async fn test_update_on_closed_channel() {
    let wallet = MockWallet::new().with_channel(
        running_query_state(8, test_allocation(100, 0), 10),
        ChannelStatus::Closed,
    );
    let (manager, wallet) = create_test_manager_with_wallet(wallet, OpsConfig::default());

    let err = manager.decline_query(&test_channel_id(8)).await.unwrap_err();

    assert_eq!(err.error_code(), ErrorCode::ChannelNotRunning);
    assert!(wallet.update_requests().is_empty());
}

#[tokio::test]
async fn test_update_without_outbox_item() {
    let (manager, wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 9, 100, 10).await;
    let mut advanced = (*manager.get_channel_result(&channel_id).await.unwrap()).clone();
    advanced.turn_num += 1;
    wallet.queue_update_response(WalletOutput::new(advanced, Vec::new()));

    let result = manager.decline_query(&channel_id).await;

    assert!(matches!(result, Err(OpsError::MissingOutboxItem)));
    // The wallet's result is cached even though no message came back
    let cached = manager.cache().get(&channel_id).unwrap().unwrap();
    assert_eq!(cached.turn_num, 5);
}

#[tokio::test]
async fn test_update_wallet_failure_is_transient() {
    let (manager, wallet) = create_test_manager();
    let channel_id = open_running_channel(&manager, 10, 100, 10).await;
    wallet.set_should_fail(true);

    let err = manager.decline_query(&channel_id).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.metric_labels(), ("ops", "wallet"));
}

// =========================================================================
// Cache
// =========================================================================

#[tokio::test]
async fn test_cached_result_is_reused() {
    let wallet = MockWallet::new().with_channel(
        running_query_state(11, test_allocation(100, 0), 10),
        ChannelStatus::Running,
    );
    let (manager, wallet) = create_test_manager_with_wallet(wallet, OpsConfig::default());
    let channel_id = test_channel_id(11);

    let first = manager.get_channel_result(&channel_id).await.unwrap();
    let second = manager.get_channel_result(&channel_id).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(wallet.state_fetches().len(), 1);
}

#[tokio::test]
async fn test_get_unknown_channel_result() {
    let (manager, _wallet) = create_test_manager();
    let result = manager.get_channel_result(&test_channel_id(12)).await;
    assert!(matches!(result, Err(OpsError::ChannelNotFound(_))));
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attestations_on_one_channel_are_serialized() {
    let wallet = MockWallet::new().with_update_latency(Duration::from_millis(20));
    let (manager, wallet) = create_test_manager_with_wallet(wallet, OpsConfig::default());
    let manager = Arc::new(manager);
    let channel_id = open_running_channel(&manager, 13, 100, 10).await;

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .provide_attestation(&channel_id, Attestation::new(format!("Qm{i}"), "0xabc"))
                    .await
            })
        })
        .collect();
    let results = futures::future::join_all(tasks).await;

    let succeeded = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(succeeded, 1);
    assert_eq!(wallet.update_requests().len(), 1);

    let after = manager.get_channel_result(&channel_id).await.unwrap();
    assert_eq!(after.allocations[0].items[PROVIDER_INDEX].amount, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_channels_settle_in_parallel() {
    let wallet = MockWallet::new().with_update_latency(Duration::from_millis(10));
    let (manager, wallet) = create_test_manager_with_wallet(wallet, OpsConfig::default());
    let manager = Arc::new(manager);

    let mut channel_ids = Vec::new();
    for nonce in 100..104 {
        channel_ids.push(open_running_channel(&manager, nonce, 100, 10).await);
    }

    let tasks: Vec<_> = channel_ids
        .iter()
        .copied()
        .map(|channel_id| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .provide_attestation(&channel_id, Attestation::new("Qm123", "0xabc"))
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        assert_eq!(result.unwrap().unwrap().state_count(), 1);
    }
    assert_eq!(wallet.update_requests().len(), channel_ids.len());
    assert_eq!(manager.cache().len().unwrap(), channel_ids.len());
}
