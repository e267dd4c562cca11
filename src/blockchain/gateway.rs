//! Provider gateway: hands out accessors bound to the required network.
//!
//! # Responsibilities
//! - Own the wallet transport, created lazily on the first acquire and
//!   reused for the rest of the session
//! - Prompt the wallet for authorization once per transport instance
//! - Reject any chain other than the required one
//! - Produce a read-only or a signing accessor
//!
//! There is no retry here; callers re-invoke `acquire`.

use alloy::primitives::Address;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::blockchain::transport::WalletTransport;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::observability::metrics;

/// Creates the transport on first use.
pub type TransportFactory<T> = Box<dyn Fn() -> BlockchainResult<T> + Send + Sync>;

/// Capability handed to callers for a single call chain.
pub enum Accessor<T> {
    /// Read-only queries.
    Reader(Arc<T>),
    /// Queries plus state-changing calls from `address`.
    Signer { transport: Arc<T>, address: Address },
}

impl<T> Accessor<T> {
    /// The underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        match self {
            Accessor::Reader(transport) => transport,
            Accessor::Signer { transport, .. } => transport,
        }
    }

    /// Controlling address, only for signers.
    pub fn signer_address(&self) -> Option<Address> {
        match self {
            Accessor::Reader(_) => None,
            Accessor::Signer { address, .. } => Some(*address),
        }
    }

    pub fn is_signer(&self) -> bool {
        matches!(self, Accessor::Signer { .. })
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Reader(transport) => Accessor::Reader(transport.clone()),
            Accessor::Signer { transport, address } => Accessor::Signer {
                transport: transport.clone(),
                address: *address,
            },
        }
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Reader(_) => f.write_str("Accessor::Reader"),
            Accessor::Signer { address, .. } => {
                f.debug_struct("Accessor::Signer").field("address", address).finish()
            }
        }
    }
}

/// Gateway owning the session's single wallet transport.
pub struct ProviderGateway<T: WalletTransport> {
    factory: TransportFactory<T>,
    transport: OnceCell<Arc<T>>,
    account: OnceCell<Address>,
    required_chain: ChainId,
}

impl<T: WalletTransport> ProviderGateway<T> {
    /// Create a gateway that builds its transport with `factory` on first use.
    pub fn new<F>(required_chain: ChainId, factory: F) -> Self
    where
        F: Fn() -> BlockchainResult<T> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            transport: OnceCell::new(),
            account: OnceCell::new(),
            required_chain,
        }
    }

    /// The only chain this gateway accepts.
    pub fn required_chain(&self) -> ChainId {
        self.required_chain
    }

    /// Whether the transport has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.transport.initialized()
    }

    async fn transport(&self) -> BlockchainResult<Arc<T>> {
        self.transport
            .get_or_try_init(|| async {
                let transport = (self.factory)()?;
                tracing::debug!("Wallet transport created");
                Ok(Arc::new(transport))
            })
            .await
            .cloned()
    }

    async fn authorize(&self, transport: &T) -> BlockchainResult<Address> {
        self.account
            .get_or_try_init(|| async {
                let accounts = transport.request_accounts().await?;
                let account = accounts.first().copied().ok_or_else(|| {
                    BlockchainError::Wallet("Wallet returned no accounts".to_string())
                })?;
                tracing::info!(address = %account, "Wallet authorized");
                Ok(account)
            })
            .await
            .copied()
    }

    /// Connect (if needed), check the network and return an accessor.
    pub async fn acquire(&self, needs_signer: bool) -> BlockchainResult<Accessor<T>> {
        let transport = self.transport().await?;
        let address = self.authorize(&transport).await?;

        let actual = transport.chain_id().await?;
        if actual != self.required_chain {
            metrics::record_wrong_network();
            tracing::warn!(
                expected = %self.required_chain,
                actual = %actual,
                "Wallet is connected to an unsupported network"
            );
            return Err(BlockchainError::WrongNetwork {
                expected: self.required_chain.0,
                actual: actual.0,
            });
        }

        Ok(if needs_signer {
            Accessor::Signer { transport, address }
        } else {
            Accessor::Reader(transport)
        })
    }
}

impl<T: WalletTransport> std::fmt::Debug for ProviderGateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderGateway")
            .field("required_chain", &self.required_chain)
            .field("initialized", &self.transport.initialized())
            .field("account", &self.account.get())
            .finish()
    }
}
