//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + NetworkConfig (RPC URL, chain ID)
//!     → wallet.rs (key loading)
//!     → transport.rs (RPC connection with timeouts, signing)
//!     → gateway.rs (lazy transport, wallet prompt, network gating)
//!     → contract.rs (Whitelist ABI bound to an accessor)
//!     → transaction.rs (confirmation monitoring)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod contract;
pub mod gateway;
pub mod transaction;
pub mod transport;
pub mod types;
pub mod wallet;

pub use contract::{Whitelist, WhitelistContract};
pub use gateway::{Accessor, ProviderGateway};
pub use transaction::{ConfirmationPolicy, PendingTransaction};
pub use transport::{RpcTransport, WalletTransport};
pub use types::{BlockchainError, BlockchainResult, ChainId, Receipt};
pub use wallet::Wallet;
