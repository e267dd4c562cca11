//! Deployment runner.
//!
//! # Data Flow
//! ```text
//! DeployConfig (artifact path, capacity)
//!     → artifact.rs (creation code)
//!     → constructor(uint8) arguments appended
//!     → gateway signer → contract creation transaction
//!     → receipt → deployed address
//! ```
//!
//! One shot: no retries and nothing to clean up. Either an address comes
//! back or the deployment failed as a whole.

pub mod artifact;

use alloy::primitives::{Address, TxHash};
use alloy::sol_types::SolConstructor;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::blockchain::{
    BlockchainError, ChainId, ConfirmationPolicy, PendingTransaction, ProviderGateway, Receipt,
    RpcTransport, Wallet, WalletTransport, Whitelist,
};
use crate::config::DappConfig;
use crate::observability::metrics;

pub use artifact::ContractArtifact;

/// Errors that abort a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The compiled artifact is missing or unusable.
    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// The creation receipt carried no contract address.
    #[error("Transaction {0} created no contract")]
    MissingContractAddress(TxHash),
}

/// A confirmed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub receipt: Receipt,
}

/// Creation code followed by the ABI-encoded constructor arguments.
pub fn creation_input(
    artifact: &ContractArtifact,
    max_whitelisted_addresses: u8,
) -> Result<Vec<u8>, DeployError> {
    let mut input = artifact.creation_code()?.to_vec();
    input.extend(
        Whitelist::constructorCall {
            maxAddresses: max_whitelisted_addresses,
        }
        .abi_encode(),
    );
    Ok(input)
}

/// Deploy the whitelist contract and wait for it to be mined.
pub async fn deploy_whitelist<T: WalletTransport>(
    gateway: &ProviderGateway<T>,
    artifact: &ContractArtifact,
    max_whitelisted_addresses: u8,
    policy: ConfirmationPolicy,
) -> Result<Deployment, DeployError> {
    let input = creation_input(artifact, max_whitelisted_addresses)?;

    let accessor = gateway.acquire(true).await?;
    let from = accessor
        .signer_address()
        .ok_or(BlockchainError::SignerRequired)?;
    let transport = accessor.transport().clone();

    tracing::info!(
        deployer = %from,
        max_whitelisted_addresses,
        code_size = input.len(),
        "Deploying whitelist contract"
    );

    let tx_hash = transport.send_transaction(from, None, input.into()).await?;
    metrics::record_transaction("submitted");

    let receipt = match PendingTransaction::new(transport, tx_hash, policy)
        .await_confirmation()
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            metrics::record_transaction(e.kind());
            return Err(e.into());
        }
    };
    metrics::record_transaction("confirmed");

    let address = receipt
        .contract_address
        .ok_or(DeployError::MissingContractAddress(tx_hash))?;

    tracing::info!(address = %address, tx_hash = %tx_hash, "Whitelist contract deployed");
    Ok(Deployment { address, receipt })
}

/// Write the line announcing the deployed address.
pub fn write_deployment<W: Write>(out: &mut W, deployment: &Deployment) -> std::io::Result<()> {
    writeln!(out, "Whitelist Contract Address: {}", deployment.address)
}

/// Deploy against the configured network with the key from the environment.
pub async fn run_deployment(config: &DappConfig) -> Result<Deployment, DeployError> {
    let artifact = ContractArtifact::load(Path::new(&config.deploy.artifact_path))?;

    let network = config.network.clone();
    let gateway = ProviderGateway::new(ChainId(network.chain_id), move || {
        let wallet = Wallet::from_env(network.chain_id)?;
        RpcTransport::connect(&network, wallet)
    });

    deploy_whitelist(
        &gateway,
        &artifact,
        config.deploy.max_whitelisted_addresses,
        ConfirmationPolicy::from(&config.network),
    )
    .await
}
