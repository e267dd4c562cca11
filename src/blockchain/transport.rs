//! Wallet transport: the link between a wallet and the JSON-RPC network.
//!
//! # Responsibilities
//! - Authorize the session (`request_accounts`, the wallet prompt)
//! - Report the chain the wallet is connected to
//! - Execute read-only calls and broadcast signed transactions
//! - Fetch receipts
//!
//! [`RpcTransport`] is the production implementation: an alloy HTTP
//! provider with the local [`Wallet`] attached as its signer. Every RPC
//! call is bounded by the configured timeout.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, NetworkConfig, Receipt,
};
use crate::blockchain::wallet::Wallet;

/// A live wallet-to-network connection.
pub trait WalletTransport: Send + Sync + 'static {
    /// Ask the wallet to authorize this session; returns its accounts.
    fn request_accounts(&self) -> impl Future<Output = BlockchainResult<Vec<Address>>> + Send;

    /// Chain the wallet is currently connected to.
    fn chain_id(&self) -> impl Future<Output = BlockchainResult<ChainId>> + Send;

    /// Execute a read-only call against `to`.
    fn call(&self, to: Address, input: Bytes)
        -> impl Future<Output = BlockchainResult<Bytes>> + Send;

    /// Sign and broadcast a transaction from `from`. `to = None` deploys
    /// `input` as contract creation code.
    fn send_transaction(
        &self,
        from: Address,
        to: Option<Address>,
        input: Bytes,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Receipt of a mined transaction, `None` while it is pending.
    fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<Option<Receipt>>> + Send;
}

/// Map an RPC failure to a network error or a contract revert.
pub fn classify_rpc_error(err: TransportError) -> BlockchainError {
    if let Some(payload) = err.as_error_resp() {
        // EIP-1474 code 3 is "execution reverted"; some nodes only say so in the message.
        if payload.code == 3 || payload.message.contains("revert") {
            return BlockchainError::Reverted(payload.message.to_string());
        }
    }
    BlockchainError::Rpc(err.to_string())
}

/// JSON-RPC transport backed by an alloy provider and a local signing key.
pub struct RpcTransport {
    provider: Arc<dyn Provider + Send + Sync>,
    wallet: Wallet,
    rpc_url: String,
    timeout_secs: u64,
}

impl RpcTransport {
    /// Build the provider for `config.rpc_url` with `wallet` as signer.
    ///
    /// No network I/O happens here.
    pub fn connect(config: &NetworkConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url);

        tracing::info!(
            rpc_url = %config.rpc_url,
            address = %wallet.address(),
            "Wallet transport connected"
        );

        Ok(Self {
            provider: Arc::new(provider),
            wallet,
            rpc_url: config.rpc_url.clone(),
            timeout_secs: config.rpc_timeout_secs,
        })
    }

    async fn request<F, T>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let err = classify_rpc_error(e);
                tracing::warn!(method, error = %err, "RPC request failed");
                Err(err)
            }
            Err(_) => {
                tracing::warn!(method, timeout_secs = self.timeout_secs, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_secs))
            }
        }
    }
}

impl WalletTransport for RpcTransport {
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        // A local key is authorized by construction.
        Ok(vec![self.wallet.address()])
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.request("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        self.request("eth_call", self.provider.call(tx)).await
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Option<Address>,
        input: Bytes,
    ) -> BlockchainResult<TxHash> {
        if from != self.wallet.address() {
            return Err(BlockchainError::Wallet(format!(
                "No key for sender {}",
                from
            )));
        }

        let tx = match to {
            Some(to) => TransactionRequest::default().with_to(to).with_input(input),
            None => TransactionRequest::default().with_deploy_code(input),
        }
        .with_from(from);

        let pending = self
            .request("eth_sendRawTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        let receipt = self
            .request(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        Ok(receipt.map(|r| Receipt {
            tx_hash: r.transaction_hash,
            block_number: r.block_number,
            success: r.status(),
            contract_address: r.contract_address,
        }))
    }
}

impl std::fmt::Debug for RpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcTransport")
            .field("rpc_url", &self.rpc_url)
            .field("address", &self.wallet.address())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
