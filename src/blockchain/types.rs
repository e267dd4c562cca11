//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::NetworkConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The wallet is connected to a chain other than the required one.
    #[error("Wrong network: expected chain ID {expected}, got {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The contract rejected the call before broadcast or during simulation.
    #[error("Execution reverted: {0}")]
    Reverted(String),

    /// The transaction was mined but its execution reverted.
    #[error("Transaction {0} failed on-chain")]
    TransactionFailed(TxHash),

    /// Transaction was not mined within the configured deadline.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Invalid private key, rejected authorization, or no accounts.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A state-changing call was attempted through a read-only accessor.
    #[error("Operation requires a signer")]
    SignerRequired,

    /// Contract output did not match the expected ABI.
    #[error("Failed to decode contract response: {0}")]
    Decode(String),
}

impl BlockchainError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockchainError::WrongNetwork { .. } => "wrong_network",
            BlockchainError::Rpc(_) | BlockchainError::Timeout(_) => "network",
            BlockchainError::Reverted(_) => "revert",
            BlockchainError::TransactionFailed(_) => "transaction_failed",
            BlockchainError::ConfirmationTimeout { .. } => "confirmation_timeout",
            BlockchainError::Wallet(_) | BlockchainError::SignerRequired => "wallet",
            BlockchainError::Decode(_) => "decode",
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// False when execution reverted.
    pub success: bool,
    /// Set for contract creation transactions.
    pub contract_address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(4u64);
        assert_eq!(chain_id.0, 4);
        assert_eq!(u64::from(chain_id), 4);
        assert_eq!(chain_id.to_string(), "4");
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::WrongNetwork {
            expected: 4,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Wrong network: expected chain ID 4, got 1");

        let err = BlockchainError::Reverted("Sender has already been whitelisted".to_string());
        assert!(err.to_string().contains("already been whitelisted"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(BlockchainError::Timeout(10).kind(), "network");
        assert_eq!(BlockchainError::Rpc("down".into()).kind(), "network");
        assert_eq!(
            BlockchainError::TransactionFailed(TxHash::ZERO).kind(),
            "transaction_failed"
        );
        assert_eq!(BlockchainError::SignerRequired.kind(), "wallet");
    }
}
