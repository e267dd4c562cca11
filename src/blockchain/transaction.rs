//! Pending transactions and confirmation monitoring.

use alloy::primitives::TxHash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::transport::WalletTransport;
use crate::blockchain::types::{BlockchainError, BlockchainResult, NetworkConfig, Receipt};

/// How receipts are polled while waiting for a transaction to be mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl ConfirmationPolicy {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            // tokio intervals panic on a zero period
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            timeout,
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(300))
    }
}

impl From<&NetworkConfig> for ConfirmationPolicy {
    fn from(config: &NetworkConfig) -> Self {
        Self::new(
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_secs(config.confirmation_timeout_secs),
        )
    }
}

/// A broadcast transaction that has not been confirmed yet.
pub struct PendingTransaction<T: WalletTransport> {
    transport: Arc<T>,
    tx_hash: TxHash,
    policy: ConfirmationPolicy,
}

impl<T: WalletTransport> PendingTransaction<T> {
    pub fn new(transport: Arc<T>, tx_hash: TxHash, policy: ConfirmationPolicy) -> Self {
        Self {
            transport,
            tx_hash,
            policy,
        }
    }

    /// Hash of the broadcast transaction.
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait until the transaction is included in a block.
    ///
    /// Fails with [`BlockchainError::TransactionFailed`] when the receipt
    /// reports reverted execution, and with
    /// [`BlockchainError::ConfirmationTimeout`] when the policy deadline passes.
    /// Transport errors while polling abort the wait.
    pub async fn await_confirmation(self) -> BlockchainResult<Receipt> {
        let tx_hash = self.tx_hash;
        let result = timeout(self.policy.timeout, async {
            let mut ticker = interval(self.policy.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.transport.transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.success {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        block_number = ?receipt.block_number,
                        "Transaction reverted on-chain"
                    );
                    return Err(BlockchainError::TransactionFailed(tx_hash));
                }

                tracing::info!(
                    tx_hash = %tx_hash,
                    block_number = ?receipt.block_number,
                    "Transaction confirmed"
                );
                return Ok(receipt);
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: self.policy.timeout.as_secs(),
            }),
        }
    }
}

impl<T: WalletTransport> std::fmt::Debug for PendingTransaction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("tx_hash", &self.tx_hash)
            .field("policy", &self.policy)
            .finish()
    }
}
