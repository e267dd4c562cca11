//! Whitelist contract binding.
//!
//! Binds the fixed contract address and ABI to an [`Accessor`]. Binding is
//! pure construction; every call goes through the accessor's transport.

use alloy::primitives::Address;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::gateway::Accessor;
use crate::blockchain::transaction::{ConfirmationPolicy, PendingTransaction};
use crate::blockchain::transport::WalletTransport;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Capped whitelist of addresses.
    #[derive(Debug, PartialEq, Eq)]
    contract Whitelist {
        constructor(uint8 maxAddresses);

        /// Adds `msg.sender`. Reverts when already whitelisted or full.
        function addAddressToWhitelist() external;

        /// Number of addresses whitelisted so far.
        function numAddressesWhitelisted() external view returns (uint8);

        /// Whether `account` is whitelisted.
        function whitelistedAddresses(address account) external view returns (bool);

        /// Capacity fixed at deployment.
        function maxWhitelistedAddresses() external view returns (uint8);
    }
}

/// Handle for calling the whitelist contract through an accessor.
pub struct WhitelistContract<T: WalletTransport> {
    address: Address,
    accessor: Accessor<T>,
    confirmation: ConfirmationPolicy,
}

impl<T: WalletTransport> WhitelistContract<T> {
    /// Bind the contract at `address` to `accessor`.
    pub fn bind(address: Address, accessor: Accessor<T>) -> Self {
        Self {
            address,
            accessor,
            confirmation: ConfirmationPolicy::default(),
        }
    }

    /// Use `policy` for transactions submitted through this handle.
    pub fn with_confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn accessor(&self) -> &Accessor<T> {
        &self.accessor
    }

    /// Read-only call.
    pub async fn query<C>(&self, call: C) -> BlockchainResult<C::Return>
    where
        C: SolCall + Send,
    {
        let input = call.abi_encode();
        let output = self
            .accessor
            .transport()
            .call(self.address, input.into())
            .await?;

        C::abi_decode_returns(&output).map_err(|e| {
            BlockchainError::Decode(format!("{}: {}", C::SIGNATURE, e))
        })
    }

    /// State-changing call; returns as soon as the transaction is broadcast.
    pub async fn submit<C>(&self, call: C) -> BlockchainResult<PendingTransaction<T>>
    where
        C: SolCall + Send,
    {
        let from = self
            .accessor
            .signer_address()
            .ok_or(BlockchainError::SignerRequired)?;
        let transport = self.accessor.transport();

        let tx_hash = transport
            .send_transaction(from, Some(self.address), call.abi_encode().into())
            .await?;

        tracing::info!(
            tx_hash = %tx_hash,
            contract = %self.address,
            function = C::SIGNATURE,
            "Transaction submitted"
        );

        Ok(PendingTransaction::new(
            transport.clone(),
            tx_hash,
            self.confirmation,
        ))
    }

    /// `numAddressesWhitelisted()`
    pub async fn num_addresses_whitelisted(&self) -> BlockchainResult<u8> {
        self.query(Whitelist::numAddressesWhitelistedCall {}).await
    }

    /// `whitelistedAddresses(account)`
    pub async fn is_whitelisted(&self, account: Address) -> BlockchainResult<bool> {
        self.query(Whitelist::whitelistedAddressesCall { account }).await
    }

    /// `maxWhitelistedAddresses()`
    pub async fn max_whitelisted_addresses(&self) -> BlockchainResult<u8> {
        self.query(Whitelist::maxWhitelistedAddressesCall {}).await
    }

    /// `addAddressToWhitelist()` from the signer's address.
    pub async fn add_address_to_whitelist(&self) -> BlockchainResult<PendingTransaction<T>> {
        self.submit(Whitelist::addAddressToWhitelistCall {}).await
    }
}
