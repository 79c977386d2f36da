//! Wallet capabilities: detection, account access and transaction signing.
//!
//! # Sources
//! - `RpcWallet`: an external wallet speaking EIP-1193 over JSON-RPC
//!   (`eth_accounts`, `eth_requestAccounts`, `eth_sendTransaction`).
//!   The wallet holds the keys and may prompt its user.
//! - `LocalWallet`: a private key loaded from an environment variable,
//!   signing locally. Its only account is always authorized.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, WalletCapability};
use crate::config::schema::{ChainConfig, WalletConfig};

/// Where a wallet capability was found in the environment.
#[derive(Clone, PartialEq, Eq)]
pub enum WalletSource {
    /// EIP-1193 endpoint URL.
    Endpoint(String),
    /// Hex private key read from the environment.
    PrivateKey(String),
}

impl WalletSource {
    /// Inspect configuration and the private-key variable's value.
    ///
    /// A configured endpoint wins over a key. Returns `None` when neither
    /// is available, which callers treat as "no wallet installed".
    pub fn detect(config: &WalletConfig, key_from_env: Option<String>) -> Option<Self> {
        if let Some(endpoint) = config.endpoint.as_ref().filter(|e| !e.trim().is_empty()) {
            return Some(Self::Endpoint(endpoint.clone()));
        }
        key_from_env
            .filter(|k| !k.trim().is_empty())
            .map(Self::PrivateKey)
    }

    /// [`detect`](Self::detect) against the process environment.
    pub fn detect_from_env(config: &WalletConfig) -> Option<Self> {
        Self::detect(config, std::env::var(&config.private_key_env).ok())
    }

    /// Build the capability. Does not touch the network.
    pub fn connect(&self, chain: &ChainConfig) -> BlockchainResult<Arc<dyn WalletCapability>> {
        let rpc_timeout = Duration::from_secs(chain.rpc_timeout_secs);
        match self {
            Self::Endpoint(endpoint) => {
                let wallet = RpcWallet::new(
                    endpoint,
                    rpc_timeout,
                    Duration::from_secs(chain.confirmation_timeout_secs),
                )?;
                Ok(Arc::new(wallet))
            }
            Self::PrivateKey(key) => {
                let wallet = LocalWallet::from_private_key(key, &chain.rpc_url, chain.chain_id, rpc_timeout)?;
                Ok(Arc::new(wallet))
            }
        }
    }
}

impl std::fmt::Debug for WalletSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Endpoint(url) => f.debug_tuple("Endpoint").field(url).finish(),
            Self::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
        }
    }
}

fn parse_url(value: &str) -> BlockchainResult<url::Url> {
    value
        .parse()
        .map_err(|e| BlockchainError::Wallet(format!("Invalid wallet URL '{}': {}", value, e)))
}

/// Await `fut` for at most `limit`, mapping its error to a wallet error.
async fn bounded<T, E: std::fmt::Display>(
    limit: Duration,
    what: &str,
    fut: impl IntoFuture<Output = Result<T, E>>,
) -> BlockchainResult<T> {
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BlockchainError::Wallet(format!("{} failed: {}", what, e))),
        Err(_) => Err(BlockchainError::Timeout(limit.as_secs())),
    }
}

/// External wallet reached over JSON-RPC.
///
/// Requests go out exactly as built; the wallet fills nonce and signs.
pub struct RpcWallet {
    endpoint: url::Url,
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_timeout: Duration,
    /// Bound on calls that may wait for the user (account request, signing).
    prompt_timeout: Duration,
}

impl RpcWallet {
    pub fn new(endpoint: &str, rpc_timeout: Duration, prompt_timeout: Duration) -> BlockchainResult<Self> {
        let endpoint = parse_url(endpoint)?;
        let provider = Arc::new(
            ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(endpoint.clone()),
        );
        Ok(Self {
            endpoint,
            provider,
            rpc_timeout,
            prompt_timeout,
        })
    }
}

#[async_trait]
impl WalletCapability for RpcWallet {
    fn kind(&self) -> &'static str {
        "rpc"
    }

    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        bounded(self.rpc_timeout, "eth_accounts", self.provider.get_accounts()).await
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        tracing::info!(endpoint = %self.endpoint, "Requesting account access from wallet");
        let call = self
            .provider
            .client()
            .request_noparams::<Vec<Address>>("eth_requestAccounts");
        bounded(self.prompt_timeout, "eth_requestAccounts", call).await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = bounded(
            self.prompt_timeout,
            "eth_sendTransaction",
            self.provider.send_transaction(tx),
        )
        .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// Wallet backed by a local private key.
pub struct LocalWallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Provider that fills nonce, gas and chain ID, then signs with `signer`.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
    rpc_timeout: Duration,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `rpc_url` - Node the signed transactions are broadcast to
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(
        private_key_hex: &str,
        rpc_url: &str,
        chain_id: u64,
        rpc_timeout: Duration,
    ) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let mut signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        signer.set_chain_id(Some(chain_id));

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(parse_url(rpc_url)?);

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Local wallet initialized"
        );

        Ok(Self {
            signer,
            provider: Arc::new(provider),
            chain_id,
            rpc_timeout,
        })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl WalletCapability for LocalWallet {
    fn kind(&self) -> &'static str {
        "local"
    }

    async fn authorized_accounts(&self) -> BlockchainResult<Vec<Address>> {
        Ok(vec![self.address()])
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        Ok(vec![self.address()])
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = bounded(
            self.rpc_timeout,
            "eth_sendRawTransaction",
            self.provider.send_transaction(tx),
        )
        .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
