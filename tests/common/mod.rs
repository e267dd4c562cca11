//! Shared utilities for integration tests: an in-memory chain running the
//! whitelist contract behind the `WalletTransport` seam.

#![allow(dead_code)]

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy::sol_types::{SolInterface, SolValue};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use whitelist_dapp::blockchain::{
    BlockchainError, BlockchainResult, ChainId, ConfirmationPolicy, ProviderGateway, Receipt,
    WalletTransport, Whitelist,
};

/// Anvil's first account.
pub fn user() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn fast_policy() -> ConfirmationPolicy {
    ConfirmationPolicy::new(Duration::from_millis(5), Duration::from_secs(2))
}

#[derive(Default)]
struct WhitelistStorage {
    max: u8,
    members: HashSet<Address>,
}

#[derive(Default)]
struct ChainState {
    chain_id: u64,
    accounts: Vec<Address>,
    contracts: HashMap<Address, WhitelistStorage>,
    receipts: HashMap<TxHash, Receipt>,
    nonce: u64,
    block: u64,
    /// Receipt polls answered with "pending" before the receipt shows up.
    pending_polls: u32,
    /// Mined transactions revert instead of executing.
    revert_on_inclusion: bool,
    /// Every RPC fails.
    offline: bool,
}

/// In-memory chain shared by every transport created from it.
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
    account_requests: Arc<AtomicUsize>,
    transports_created: Arc<AtomicUsize>,
    transactions_sent: Arc<AtomicUsize>,
}

impl MockChain {
    pub fn new(chain_id: u64) -> Self {
        let chain = Self::default();
        {
            let mut state = chain.state.lock().unwrap();
            state.chain_id = chain_id;
            state.accounts = vec![user()];
        }
        chain
    }

    /// Place a whitelist contract at a fixed address with preset members.
    pub fn with_whitelist(self, max: u8, members: &[Address]) -> (Self, Address) {
        let address = Address::repeat_byte(0xaa);
        self.state.lock().unwrap().contracts.insert(
            address,
            WhitelistStorage {
                max,
                members: members.iter().copied().collect(),
            },
        );
        (self, address)
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().unwrap().chain_id = chain_id;
    }

    pub fn set_pending_polls(&self, polls: u32) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    pub fn set_revert_on_inclusion(&self, revert: bool) {
        self.state.lock().unwrap().revert_on_inclusion = revert;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn is_member(&self, contract: Address, account: Address) -> bool {
        self.state.lock().unwrap().contracts[&contract]
            .members
            .contains(&account)
    }

    pub fn member_count(&self, contract: Address) -> usize {
        self.state.lock().unwrap().contracts[&contract].members.len()
    }

    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }

    pub fn transports_created(&self) -> usize {
        self.transports_created.load(Ordering::SeqCst)
    }

    /// Transactions broadcast, including ones that reverted.
    pub fn transactions_sent(&self) -> usize {
        self.transactions_sent.load(Ordering::SeqCst)
    }

    pub fn transport(&self) -> MockTransport {
        self.transports_created.fetch_add(1, Ordering::SeqCst);
        MockTransport {
            chain: self.clone(),
        }
    }

    /// Gateway requiring `required` whose transport talks to this chain.
    pub fn gateway(&self, required: u64) -> ProviderGateway<MockTransport> {
        let chain = self.clone();
        ProviderGateway::new(ChainId(required), move || Ok(chain.transport()))
    }
}

pub struct MockTransport {
    chain: MockChain,
}

fn revert(reason: &str) -> BlockchainError {
    BlockchainError::Reverted(format!("execution reverted: {}", reason))
}

impl ChainState {
    fn check_online(&self) -> BlockchainResult<()> {
        if self.offline {
            Err(BlockchainError::Rpc("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_hash(&mut self) -> TxHash {
        self.nonce += 1;
        keccak256(self.nonce.to_be_bytes())
    }

    fn mine(&mut self, tx_hash: TxHash, success: bool, contract_address: Option<Address>) {
        self.block += 1;
        self.receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                block_number: Some(self.block),
                success,
                contract_address,
            },
        );
    }
}

impl WalletTransport for MockTransport {
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.chain.account_requests.fetch_add(1, Ordering::SeqCst);
        let state = self.chain.state.lock().unwrap();
        state.check_online()?;
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        let state = self.chain.state.lock().unwrap();
        state.check_online()?;
        Ok(ChainId(state.chain_id))
    }

    async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes> {
        let state = self.chain.state.lock().unwrap();
        state.check_online()?;
        let contract = state
            .contracts
            .get(&to)
            .ok_or_else(|| BlockchainError::Decode("no contract code".to_string()))?;

        let call = Whitelist::WhitelistCalls::abi_decode(&input)
            .map_err(|e| revert(&e.to_string()))?;
        let output = match call {
            Whitelist::WhitelistCalls::numAddressesWhitelisted(_) => {
                U256::from(contract.members.len()).abi_encode()
            }
            Whitelist::WhitelistCalls::whitelistedAddresses(c) => {
                contract.members.contains(&c.account).abi_encode()
            }
            Whitelist::WhitelistCalls::maxWhitelistedAddresses(_) => U256::from(contract.max).abi_encode(),
            Whitelist::WhitelistCalls::addAddressToWhitelist(_) => Vec::new(),
        };
        Ok(output.into())
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Option<Address>,
        input: Bytes,
    ) -> BlockchainResult<TxHash> {
        self.chain.transactions_sent.fetch_add(1, Ordering::SeqCst);
        let mut state = self.chain.state.lock().unwrap();
        state.check_online()?;
        if !state.accounts.contains(&from) {
            return Err(BlockchainError::Wallet(format!("unknown sender {}", from)));
        }

        let Some(to) = to else {
            // Contract creation: the last word is the uint8 capacity.
            let max = *input.last().ok_or_else(|| revert("empty creation code"))?;
            let tx_hash = state.next_hash();
            let address = from.create(state.nonce);
            state.contracts.insert(
                address,
                WhitelistStorage {
                    max,
                    members: HashSet::new(),
                },
            );
            state.mine(tx_hash, true, Some(address));
            return Ok(tx_hash);
        };

        match Whitelist::WhitelistCalls::abi_decode(&input) {
            Ok(Whitelist::WhitelistCalls::addAddressToWhitelist(_)) => {}
            _ => return Err(revert("unsupported call")),
        }

        let revert_on_inclusion = state.revert_on_inclusion;
        let contract = state
            .contracts
            .get_mut(&to)
            .ok_or_else(|| revert("no contract code"))?;
        if contract.members.contains(&from) {
            return Err(revert("Sender has already been whitelisted"));
        }
        if contract.members.len() >= usize::from(contract.max) {
            return Err(revert("More addresses cant be added, limit reached"));
        }

        let success = !revert_on_inclusion;
        if success {
            contract.members.insert(from);
        }
        let tx_hash = state.next_hash();
        state.mine(tx_hash, success, None);
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        let mut state = self.chain.state.lock().unwrap();
        state.check_online()?;
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            return Ok(None);
        }
        Ok(state.receipts.get(&tx_hash).cloned())
    }
}
