//! Transaction building and confirmation monitoring.
//!
//! # Responsibilities
//! - Build contract calls with gas estimation and a gas price ceiling
//! - Monitor confirmations
//!
//! Signing and broadcast belong to the wallet capability.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainConfig, ChainReader, ConfirmationStatus,
};

/// Transaction builder for contract calls.
#[derive(Clone)]
pub struct TxBuilder {
    reader: Arc<dyn ChainReader>,
    config: ChainConfig,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(reader: Arc<dyn ChainReader>, config: ChainConfig) -> Self {
        Self { reader, config }
    }

    /// Build a contract call from `from` to `to` carrying `data`.
    ///
    /// Nonce and signature are left to the wallet.
    pub async fn build_call(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> BlockchainResult<TransactionRequest> {
        let gas_price = self.reader.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        if gas_price_gwei > self.config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.config.max_gas_price_gwei,
            });
        }

        // Apply multiplier for safety margin
        let adjusted_gas_price = (gas_price as f64 * self.config.gas_price_multiplier) as u128;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data)
            .with_chain_id(self.config.chain_id);

        let gas_limit = self.reader.estimate_gas(tx.clone()).await?;

        Ok(tx.with_gas_price(adjusted_gas_price).with_gas_limit(gas_limit))
    }

    /// Wait for a transaction to reach the configured confirmation depth.
    ///
    /// The block containing the transaction counts as the first
    /// confirmation. Returns `Failed` for a reverted transaction and
    /// `ConfirmationTimeout` when `confirmation_timeout_secs` elapses.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let required_confirmations = self.config.confirmation_blocks;
        let timeout_duration = Duration::from_secs(self.config.confirmation_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.reader.get_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.success {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.reader.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = confirmation_depth(current_block, tx_block);

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(required_confirmations)),
        }
    }
}

/// Confirmation depth of a transaction mined in `tx_block` when the chain
/// head is `head`. Inclusion counts as one; saturates at `u32::MAX`.
fn confirmation_depth(head: u64, tx_block: u64) -> u32 {
    u32::try_from(head.saturating_sub(tx_block))
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}
