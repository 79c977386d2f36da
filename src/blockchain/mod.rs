//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet config / environment (endpoint URL, private key)
//!     → wallet.rs (capability detection, account access, signing)
//! RPC URL (+ failovers)
//!     → client.rs (read-only RPC with timeouts)
//!     → contract.rs (ReadWrite ABI: getMessage / setMessage)
//!     → transaction.rs (build, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::MessageContract;
pub use transaction::TxBuilder;
pub use types::{
    BlockchainError, BlockchainResult, ChainId, ChainReader, ConfirmationStatus, ReceiptSummary,
    WalletCapability,
};
pub use wallet::{LocalWallet, RpcWallet, WalletSource};
