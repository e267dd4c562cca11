//! Whitelist session controller.
//!
//! Drives connect → verify network → query state → join. State snapshots are
//! published through a `watch` channel; user-facing messages go out on an
//! unbounded `mpsc` channel of [`Notice`]s.
//!
//! # Failure handling
//! - Wrong network: an [`Notice::Alert`] is emitted and the state is untouched
//! - Any other failure: logged, emitted as [`Notice::Error`], state untouched
//! - `loading` is cleared on every exit path once a transaction is in flight
//! - A failed join leaves `joined_whitelist` as it was, even when the revert
//!   means the address is already whitelisted

use alloy::primitives::Address;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::blockchain::{
    BlockchainError, ConfirmationPolicy, ProviderGateway, Receipt, WalletTransport,
    WhitelistContract,
};
use crate::observability::metrics;
use crate::session::state::{SessionEvent, WhitelistSessionState};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `join_whitelist` was called before a wallet was connected.
    #[error("Wallet is not connected")]
    NotConnected,

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking warning the user must act on (wrong network).
    Alert(String),
    /// Failure that was logged and abandoned.
    Error(String),
}

/// Alert text shown when the wallet is on an unsupported chain.
pub fn wrong_network_alert(expected: u64) -> String {
    format!(
        "Must use the network with chain ID {} - please change your network.",
        expected
    )
}

/// Owns the session state and runs the whitelist workflow.
pub struct SessionController<T: WalletTransport> {
    gateway: Arc<ProviderGateway<T>>,
    contract_address: Address,
    confirmation: ConfirmationPolicy,
    state: Arc<watch::Sender<WhitelistSessionState>>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl<T: WalletTransport> Clone for SessionController<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            contract_address: self.contract_address,
            confirmation: self.confirmation,
            state: self.state.clone(),
            notices: self.notices.clone(),
        }
    }
}

/// Clears `loading` when dropped.
struct InFlightGuard<'a> {
    state: &'a watch::Sender<WhitelistSessionState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| *s = s.apply(SessionEvent::TransactionSettled));
    }
}

impl<T: WalletTransport> SessionController<T> {
    /// Create a controller in the initial (disconnected) state.
    ///
    /// Returns the controller and the receiver for user notices.
    pub fn new(
        gateway: Arc<ProviderGateway<T>>,
        contract_address: Address,
        confirmation: ConfirmationPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (state, _) = watch::channel(WhitelistSessionState::default());
        let (notices, notice_rx) = mpsc::unbounded_channel();

        (
            Self {
                gateway,
                contract_address,
                confirmation,
                state: Arc::new(state),
                notices,
            },
            notice_rx,
        )
    }

    /// Current state snapshot.
    pub fn state(&self) -> WhitelistSessionState {
        *self.state.borrow()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<WhitelistSessionState> {
        self.state.subscribe()
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    fn dispatch(&self, event: SessionEvent) {
        self.state.send_modify(|s| *s = s.apply(event));
        tracing::debug!(?event, state = ?self.state(), "Session event applied");
    }

    fn report(&self, operation: &'static str, err: &SessionError) {
        let notice = match err {
            SessionError::Blockchain(BlockchainError::WrongNetwork { expected, .. }) => {
                Notice::Alert(wrong_network_alert(*expected))
            }
            other => {
                tracing::error!(operation, error = %other, "Session operation failed");
                Notice::Error(format!("{} failed: {}", operation, other))
            }
        };
        // Nobody listening is fine; the failure is already logged.
        let _ = self.notices.send(notice);
    }

    async fn bind(&self, needs_signer: bool) -> Result<WhitelistContract<T>, BlockchainError> {
        let accessor = self.gateway.acquire(needs_signer).await?;
        Ok(WhitelistContract::bind(self.contract_address, accessor)
            .with_confirmation(self.confirmation))
    }

    /// Connect the wallet and start refreshing membership and count.
    ///
    /// Returns once the session is marked connected; the refreshes run on the
    /// returned task, unordered relative to each other.
    pub async fn connect_wallet(&self) -> SessionResult<JoinHandle<()>> {
        if let Err(e) = self.gateway.acquire(false).await {
            let err = SessionError::from(e);
            self.report("connect_wallet", &err);
            return Err(err);
        }

        self.dispatch(SessionEvent::WalletConnected);
        tracing::info!(contract = %self.contract_address, "Wallet connected");

        let this = self.clone();
        Ok(tokio::spawn(async move {
            let _ = tokio::join!(this.refresh_membership(), this.refresh_count());
        }))
    }

    async fn load_count(&self) -> Result<u32, BlockchainError> {
        let contract = self.bind(false).await?;
        let count = u32::from(contract.num_addresses_whitelisted().await?);
        self.dispatch(SessionEvent::CountLoaded(count));
        metrics::record_whitelisted(count);
        Ok(count)
    }

    /// Read `numAddressesWhitelisted()` into the state.
    pub async fn refresh_count(&self) -> SessionResult<u32> {
        let result = self.load_count().await.map_err(SessionError::from);
        metrics::record_refresh("count", result.is_ok());
        if let Err(e) = &result {
            self.report("refresh_count", e);
        }
        result
    }

    async fn load_membership(&self) -> Result<bool, BlockchainError> {
        let contract = self.bind(true).await?;
        let account = contract
            .accessor()
            .signer_address()
            .ok_or(BlockchainError::SignerRequired)?;
        let joined = contract.is_whitelisted(account).await?;
        self.dispatch(SessionEvent::MembershipLoaded(joined));
        Ok(joined)
    }

    /// Read `whitelistedAddresses(signer)` into the state.
    pub async fn refresh_membership(&self) -> SessionResult<bool> {
        let result = self.load_membership().await.map_err(SessionError::from);
        metrics::record_refresh("membership", result.is_ok());
        if let Err(e) = &result {
            self.report("refresh_membership", e);
        }
        result
    }

    /// Capacity of the whitelist. Does not touch the state.
    pub async fn capacity(&self) -> SessionResult<u32> {
        let contract = self.bind(false).await?;
        Ok(u32::from(contract.max_whitelisted_addresses().await?))
    }

    /// Submit `addAddressToWhitelist()` and wait for it to be mined.
    ///
    /// Fails fast with [`SessionError::NotConnected`] when no wallet is
    /// connected.
    pub async fn join_whitelist(&self) -> SessionResult<Receipt> {
        if !self.state().wallet_connected {
            tracing::warn!("join_whitelist called before the wallet was connected");
            return Err(SessionError::NotConnected);
        }

        let result = self.submit_join().await.map_err(SessionError::from);
        if let Err(e) = &result {
            self.report("join_whitelist", e);
        }
        result
    }

    async fn submit_join(&self) -> Result<Receipt, BlockchainError> {
        let contract = self.bind(true).await?;
        let pending = match contract.add_address_to_whitelist().await {
            Ok(pending) => pending,
            Err(e) => {
                metrics::record_transaction(e.kind());
                return Err(e);
            }
        };
        metrics::record_transaction("submitted");

        self.dispatch(SessionEvent::TransactionSubmitted);
        let guard = InFlightGuard { state: &self.state };
        let outcome = pending.await_confirmation().await;
        drop(guard);

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(e) => {
                metrics::record_transaction(e.kind());
                return Err(e);
            }
        };
        metrics::record_transaction("confirmed");

        // A failed count refresh is reported on its own and does not undo the join.
        let _ = self.refresh_count().await;
        self.dispatch(SessionEvent::JoinedWhitelist);
        tracing::info!(tx_hash = %receipt.tx_hash, "Joined the whitelist");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_network_alert_text() {
        assert_eq!(
            wrong_network_alert(4),
            "Must use the network with chain ID 4 - please change your network."
        );
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::NotConnected.to_string(), "Wallet is not connected");
        let err = SessionError::from(BlockchainError::Timeout(10));
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
    }

    #[test]
    fn test_in_flight_guard_clears_loading() {
        let (state, _) = watch::channel(
            WhitelistSessionState::default()
                .apply(SessionEvent::WalletConnected)
                .apply(SessionEvent::TransactionSubmitted),
        );
        assert!(state.borrow().loading);
        {
            let _guard = InFlightGuard { state: &state };
        }
        assert!(!state.borrow().loading);
        assert!(state.borrow().wallet_connected);
    }
}
