//! Session controller scenarios against the in-memory chain.

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use whitelist_dapp::blockchain::BlockchainError;
use whitelist_dapp::session::{
    Notice, SessionController, SessionError, SessionStatus, WhitelistSessionState,
};
use whitelist_dapp::ui::{render_button, render_page, ButtonView};

mod common;
use common::{fast_policy, user, MockChain, MockTransport};

fn others(n: u8) -> Vec<Address> {
    (1..=n).map(Address::repeat_byte).collect()
}

fn controller(
    chain: &MockChain,
    contract: Address,
) -> (SessionController<MockTransport>, mpsc::UnboundedReceiver<Notice>) {
    SessionController::new(Arc::new(chain.gateway(4)), contract, fast_policy())
}

async fn connect_and_settle(controller: &SessionController<MockTransport>) {
    let refreshes = controller.connect_wallet().await.expect("connect should succeed");
    tokio::time::timeout(Duration::from_secs(2), refreshes)
        .await
        .expect("refreshes should settle")
        .unwrap();
}

#[tokio::test]
async fn test_fresh_mount_shows_count_and_join_control() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(5));
    let (controller, _notices) = controller(&chain, contract);

    assert_eq!(controller.state(), WhitelistSessionState::default());
    connect_and_settle(&controller).await;

    let state = controller.state();
    assert!(state.wallet_connected);
    assert!(!state.joined_whitelist);
    assert_eq!(state.whitelisted_count, 5);
    assert_eq!(render_button(&state), ButtonView::JoinWhitelist);

    let page = render_page(&state, None);
    assert!(page.contains("5 have already joined the Whitelist"));
    assert!(page.contains("Join the Whitelist"));
}

#[tokio::test]
async fn test_wrong_network_keeps_session_disconnected() {
    let (chain, contract) = MockChain::new(1).with_whitelist(10, &others(5));
    let (controller, mut notices) = controller(&chain, contract);

    let err = controller.connect_wallet().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Blockchain(BlockchainError::WrongNetwork {
            expected: 4,
            actual: 1
        })
    ));
    assert_eq!(controller.state(), WhitelistSessionState::default());

    match notices.try_recv().unwrap() {
        Notice::Alert(text) => assert!(text.contains("chain ID 4")),
        other => panic!("expected alert, got {:?}", other),
    }
}

#[tokio::test]
async fn test_switching_to_required_network_allows_connect() {
    let (chain, contract) = MockChain::new(1).with_whitelist(10, &[]);
    let (controller, _notices) = controller(&chain, contract);

    assert!(controller.connect_wallet().await.is_err());
    chain.set_chain_id(4);
    connect_and_settle(&controller).await;
    assert!(controller.state().wallet_connected);
}

#[tokio::test]
async fn test_connect_reflects_existing_membership() {
    let mut members = others(2);
    members.push(user());
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &members);
    let (controller, _notices) = controller(&chain, contract);

    connect_and_settle(&controller).await;
    let state = controller.state();
    assert!(state.joined_whitelist);
    assert_eq!(state.whitelisted_count, 3);
    assert_eq!(state.status(), SessionStatus::Joined);
}

#[tokio::test]
async fn test_refresh_count_is_idempotent() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(7));
    let (controller, _notices) = controller(&chain, contract);

    let first = controller.refresh_count().await.unwrap();
    let second = controller.refresh_count().await.unwrap();
    assert_eq!(first, 7);
    assert_eq!(first, second);
    assert_eq!(controller.state().whitelisted_count, 7);
}

#[tokio::test]
async fn test_join_whitelist_confirms_and_updates_count() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(5));
    let (controller, _notices) = controller(&chain, contract);
    connect_and_settle(&controller).await;

    chain.set_pending_polls(3);
    let receipt = controller.join_whitelist().await.unwrap();
    assert!(receipt.success);

    let state = controller.state();
    assert!(state.joined_whitelist);
    assert!(!state.loading);
    assert_eq!(state.whitelisted_count, 6);
    assert!(chain.is_member(contract, user()));
}

#[tokio::test]
async fn test_join_when_already_whitelisted_reverts_without_state_change() {
    let mut members = others(5);
    members.push(user());
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &members);
    let (controller, mut notices) = controller(&chain, contract);

    // Connected, but membership has not been read yet.
    controller.connect_wallet().await.unwrap().abort();
    let before = controller.state();
    assert!(!before.joined_whitelist);

    let err = controller.join_whitelist().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Blockchain(BlockchainError::Reverted(ref reason))
            if reason.contains("already been whitelisted")
    ));

    let after = controller.state();
    assert!(!after.joined_whitelist);
    assert!(!after.loading);
    assert!(chain.is_member(contract, user()));

    let mut saw_error = false;
    while let Ok(notice) = notices.try_recv() {
        if let Notice::Error(text) = notice {
            saw_error |= text.starts_with("join_whitelist failed");
        }
    }
    assert!(saw_error);
}

#[tokio::test]
async fn test_join_when_full_reverts() {
    let (chain, contract) = MockChain::new(4).with_whitelist(2, &others(2));
    let (controller, _notices) = controller(&chain, contract);
    connect_and_settle(&controller).await;

    let err = controller.join_whitelist().await.unwrap_err();
    assert!(err.to_string().contains("limit reached"));
    assert_eq!(controller.state().whitelisted_count, 2);
    assert!(!controller.state().joined_whitelist);
}

#[tokio::test]
async fn test_failed_inclusion_clears_loading() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(5));
    let (controller, _notices) = controller(&chain, contract);
    connect_and_settle(&controller).await;

    chain.set_revert_on_inclusion(true);
    let err = controller.join_whitelist().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Blockchain(BlockchainError::TransactionFailed(_))
    ));

    let state = controller.state();
    assert!(!state.loading);
    assert!(!state.joined_whitelist);
    assert_eq!(state.whitelisted_count, 5);
    assert_eq!(render_button(&state), ButtonView::JoinWhitelist);
}

#[tokio::test]
async fn test_loading_is_visible_while_waiting_for_receipt() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &[]);
    let (controller, _notices) = controller(&chain, contract);
    connect_and_settle(&controller).await;

    let mut updates = controller.subscribe();
    chain.set_pending_polls(20);
    let join = tokio::spawn({
        let controller = controller.clone();
        async move { controller.join_whitelist().await }
    });

    let loading = tokio::time::timeout(
        Duration::from_secs(2),
        updates.wait_for(|s| s.loading),
    )
    .await
    .expect("loading should be published")
    .map(|s| s.status())
    .unwrap();
    assert_eq!(loading, SessionStatus::Loading);

    join.await.unwrap().unwrap();
    assert_eq!(controller.state().status(), SessionStatus::Joined);
}

#[tokio::test]
async fn test_join_before_connect_fails_fast() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &[]);
    let (controller, _notices) = controller(&chain, contract);

    let err = controller.join_whitelist().await.unwrap_err();
    assert!(matches!(err, SessionError::NotConnected));
    assert_eq!(chain.transports_created(), 0);
    assert_eq!(chain.member_count(contract), 0);
}

#[tokio::test]
async fn test_network_error_leaves_state_unchanged() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(4));
    let (controller, mut notices) = controller(&chain, contract);
    connect_and_settle(&controller).await;
    let before = controller.state();

    chain.set_offline(true);
    let err = controller.refresh_count().await.unwrap_err();
    assert!(matches!(err, SessionError::Blockchain(BlockchainError::Rpc(_))));
    assert!(controller.join_whitelist().await.is_err());
    assert_eq!(controller.state(), before);

    let mut errors = 0;
    while let Ok(notice) = notices.try_recv() {
        if matches!(notice, Notice::Error(_)) {
            errors += 1;
        }
    }
    assert_eq!(errors, 2);
}

#[tokio::test]
async fn test_every_snapshot_is_consistent() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(5));
    let (controller, _notices) = controller(&chain, contract);

    let mut updates = controller.subscribe();
    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let state = *updates.borrow_and_update();
            seen.push(state);
            if state.joined_whitelist {
                break;
            }
        }
        seen
    });

    connect_and_settle(&controller).await;
    controller.join_whitelist().await.unwrap();

    let seen = tokio::time::timeout(Duration::from_secs(2), watcher)
        .await
        .unwrap()
        .unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|s| s.is_consistent()));
}

#[tokio::test]
async fn test_wallet_prompted_once_per_transport() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &others(1));
    let (controller, _notices) = controller(&chain, contract);

    connect_and_settle(&controller).await;
    controller.refresh_count().await.unwrap();
    controller.refresh_membership().await.unwrap();
    controller.join_whitelist().await.unwrap();

    assert_eq!(chain.transports_created(), 1);
    assert_eq!(chain.account_requests(), 1);
}

#[tokio::test]
async fn test_capacity() {
    let (chain, contract) = MockChain::new(4).with_whitelist(10, &[]);
    let (controller, _notices) = controller(&chain, contract);
    assert_eq!(controller.capacity().await.unwrap(), 10);
    assert_eq!(controller.state(), WhitelistSessionState::default());
}
