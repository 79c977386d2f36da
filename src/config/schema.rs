//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so an empty file plus a contract address is
//! a working configuration against a local node.

use serde::{Deserialize, Serialize};

/// Root configuration for the read/write client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Target contract.
    pub contract: ContractConfig,

    /// Wallet capability sources.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection and transaction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 137 for Polygon, 80002 for Amoy, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of confirmations a write waits for. 1 = included in a block.
    pub confirmation_blocks: u32,

    /// Upper bound on the wait for confirmations, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = estimated, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// The deployed ReadWrite contract.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address (hex). Empty means "not configured".
    pub address: String,
}

/// Where the wallet capability comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// EIP-1193 style wallet endpoint (e.g. a desktop wallet's local RPC).
    /// Takes precedence over the private key when set.
    pub endpoint: Option<String>,

    /// Name of the environment variable holding a local private key.
    pub private_key_env: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            private_key_env: "READWRITE_PRIVATE_KEY".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
