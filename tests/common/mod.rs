//! Shared in-memory chain and scripted wallet for integration tests.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolValue;
use async_trait::async_trait;

use readwrite_client::blockchain::{
    BlockchainError, BlockchainResult, ChainId, ChainReader, ReceiptSummary, WalletCapability,
};
use readwrite_client::config::ChainConfig;
use readwrite_client::ContractClient;

pub const CONTRACT: Address = Address::repeat_byte(0xc0);
pub const ACCOUNT: Address = Address::repeat_byte(0xa1);

/// Chain holding one stored message. Counts every request it serves.
pub struct MockChain {
    pub message: Mutex<String>,
    pub fail_reads: AtomicBool,
    pub revert_writes: AtomicBool,
    /// Reported by `eth_chainId`; defaults to the Anvil chain.
    pub chain_id: AtomicU64,
    pub chain_id_lookups: AtomicU32,
    pub requests: AtomicU32,
}

impl MockChain {
    pub fn with_message(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: Mutex::new(message.to_string()),
            fail_reads: AtomicBool::new(false),
            revert_writes: AtomicBool::new(false),
            chain_id: AtomicU64::new(31337),
            chain_id_lookups: AtomicU32::new(0),
            requests: AtomicU32::new(0),
        })
    }

    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.hit();
        assert_eq!(tx.to.and_then(|kind| kind.to().copied()), Some(CONTRACT));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("execution reverted".into()));
        }
        let message = self.message.lock().unwrap().clone();
        Ok((message,).abi_encode_params().into())
    }

    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.hit();
        self.chain_id_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(ChainId(self.chain_id.load(Ordering::SeqCst)))
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.hit();
        Ok(7)
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.hit();
        Ok(1_000_000_000)
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> BlockchainResult<u64> {
        self.hit();
        Ok(50_000)
    }

    async fn get_receipt(&self, _tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        self.hit();
        Ok(Some(ReceiptSummary {
            success: !self.revert_writes.load(Ordering::SeqCst),
            block_number: Some(7),
        }))
    }
}

/// Wallet whose answers are fixed up front.
pub struct MockWallet {
    /// Answer to the silent account lookup.
    pub authorized: Vec<Address>,
    /// Answer to an explicit account request.
    pub granted: Vec<Address>,
    /// Make the silent account lookup itself fail.
    pub fail_lookup: bool,
    pub reject_requests: bool,
    pub send_delay: Duration,
    pub account_requests: AtomicU32,
    pub sent: Mutex<Vec<TransactionRequest>>,
}

impl MockWallet {
    pub fn connected() -> Self {
        Self {
            authorized: vec![ACCOUNT],
            granted: vec![ACCOUNT],
            fail_lookup: false,
            reject_requests: false,
            send_delay: Duration::ZERO,
            account_requests: AtomicU32::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Installed, but this client has never been authorized.
    pub fn unauthorized() -> Self {
        Self {
            authorized: Vec::new(),
            ..Self::connected()
        }
    }

    pub fn request_count(&self) -> u32 {
        self.account_requests.load(Ordering::SeqCst)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletCapability for MockWallet {
    fn kind(&self) -> &'static str {
        "mock"
    }

    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        if self.fail_lookup {
            return Err(BlockchainError::Wallet("eth_accounts failed: wallet locked".into()));
        }
        Ok(self.authorized.clone())
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        if self.reject_requests {
            return Err(BlockchainError::Wallet("User rejected the request".into()));
        }
        Ok(self.granted.clone())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        tokio::time::sleep(self.send_delay).await;
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(B256::repeat_byte(sent.len() as u8))
    }
}

pub fn chain_config() -> ChainConfig {
    ChainConfig {
        confirmation_timeout_secs: 2,
        poll_interval_ms: 5,
        ..ChainConfig::default()
    }
}

pub fn client(wallet: Option<Arc<MockWallet>>, chain: Arc<MockChain>) -> ContractClient {
    let wallet = wallet.map(|w| w as Arc<dyn WalletCapability>);
    ContractClient::new(wallet, chain, CONTRACT, chain_config())
}
