//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint (primary + failovers)
//! - Serve read-only queries (eth_call, block number, receipts, gas)
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainConfig, ChainId, ChainReader, ReceiptSummary,
};

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Only builds the HTTP providers; no request is sent until the first
    /// query. Fails only on an unparseable primary URL.
    pub fn new(config: ChainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::debug!(
            rpc_url = %config.rpc_url,
            providers = providers.len(),
            "Blockchain client created"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Run `op` against each provider in order until one answers in time.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, op: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }

        match last_error {
            Some(e) => Err(BlockchainError::Rpc(format!(
                "All RPC providers failed for {}: {}",
                method, e
            ))),
            None => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }
}

#[async_trait]
impl ChainReader for BlockchainClient {
    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_failover("eth_blockNumber", |p| async move { p.get_block_number().await })
            .await
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.with_failover("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        self.with_failover("eth_estimateGas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    async fn get_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt = self
            .with_failover("eth_getTransactionReceipt", |p| async move {
                p.get_transaction_receipt(tx_hash).await
            })
            .await?;

        Ok(receipt.map(|r| ReceiptSummary {
            success: r.status(),
            block_number: r.block_number,
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("providers", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
