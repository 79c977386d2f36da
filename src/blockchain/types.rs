//! Chain-specific types, seam traits and error definitions.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

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

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed with {0} confirmation(s) in time")]
    ConfirmationTimeout(u32),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Wallet refused, failed to sign, or key material is invalid.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Contract returned data that does not match the ABI.
    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Final outcome of a confirmation wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction was mined but reverted.
    Failed(String),
}

/// The parts of a receipt the client acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Read-only chain access.
///
/// [`BlockchainClient`](crate::blockchain::BlockchainClient) is the RPC-backed
/// implementation; tests substitute an in-memory chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute an `eth_call` and return the raw return data.
    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes>;

    async fn get_chain_id(&self) -> BlockchainResult<ChainId>;

    async fn get_block_number(&self) -> BlockchainResult<u64>;

    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64>;

    /// `None` while the transaction is still pending.
    async fn get_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>>;
}

/// An injected wallet: account access plus transaction signing.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// Short human label for logs ("rpc", "local").
    fn kind(&self) -> &'static str;

    /// Accounts already authorized for this client. Never prompts.
    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Ask for account access. May prompt the wallet's user.
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Sign and broadcast `tx`, returning its hash once accepted by the node.
    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(137u64);
        assert_eq!(chain_id.0, 137);
        assert_eq!(u64::from(chain_id), 137);
    }

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation_blocks, 1);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert!(err.to_string().contains("600"));

        let err = BlockchainError::ChainMismatch {
            expected: 137,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Chain ID mismatch: expected 137, got 1");
    }
}
