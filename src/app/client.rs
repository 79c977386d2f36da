//! Contract interaction client.
//!
//! # Operations
//! - `check_connection`: authorized account lookup, never prompts
//! - `fetch_message`: read-only `getMessage()` call
//! - `submit_message`: account request → build → sign & send → confirm
//!
//! Every operation checks for a wallet capability first and makes no
//! network call without one. The node's chain ID is checked once, lazily,
//! before the first read or write. Failures are returned as
//! [`ClientError`] and mirrored into `AppState::notice`.

use alloy::primitives::{Address, TxHash};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::app::state::{
    last_update_line, AppState, WalletStatus, EMPTY_MESSAGE_NOTICE, INSTALL_PROMPT,
};
use crate::blockchain::{
    BlockchainClient, BlockchainError, ChainReader, ConfirmationStatus, MessageContract, TxBuilder,
    WalletCapability, WalletSource,
};
use crate::config::validation::{validate_config, ValidationError};
use crate::config::{ChainConfig, ClientConfig, ConfigError};

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no wallet capability available")]
    NoWallet,

    #[error("message is empty")]
    EmptyMessage,

    #[error("a message update is already in flight")]
    WriteInFlight,

    #[error("wallet did not authorize any account")]
    Unauthorized,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Client bound to one contract and, optionally, one wallet.
pub struct ContractClient {
    wallet: Option<Arc<dyn WalletCapability>>,
    reader: Arc<dyn ChainReader>,
    expected_chain_id: u64,
    chain_verified: OnceCell<()>,
    contract: MessageContract,
    tx_builder: TxBuilder,
    write_in_flight: AtomicBool,
}

/// Clears the in-flight flag when a write finishes, however it finishes.
struct WriteGuard<'a>(&'a AtomicBool);

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ContractClient {
    pub fn new(
        wallet: Option<Arc<dyn WalletCapability>>,
        reader: Arc<dyn ChainReader>,
        contract_address: Address,
        chain: ChainConfig,
    ) -> Self {
        Self {
            wallet,
            expected_chain_id: chain.chain_id,
            chain_verified: OnceCell::new(),
            contract: MessageContract::new(contract_address, reader.clone()),
            tx_builder: TxBuilder::new(reader.clone(), chain),
            reader,
            write_in_flight: AtomicBool::new(false),
        }
    }

    /// Wire up the RPC client and whatever wallet the environment offers.
    ///
    /// Sends nothing over the network.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        let address: Address = config.contract.address.trim().parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidContractAddress(
                config.contract.address.clone(),
            )])
        })?;

        let reader = BlockchainClient::new(config.chain.clone())?;

        let wallet = match WalletSource::detect_from_env(&config.wallet) {
            Some(source) => {
                let wallet = source.connect(&config.chain)?;
                tracing::info!(kind = wallet.kind(), "Wallet capability detected");
                Some(wallet)
            }
            None => {
                tracing::info!("No wallet capability detected");
                None
            }
        };

        Ok(Self::new(wallet, Arc::new(reader), address, config.chain.clone()))
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// Guard run before every interaction. Without a wallet the status
    /// becomes `NoCapability` and the notice becomes the install prompt.
    fn require_wallet(&self, state: &mut AppState) -> Result<Arc<dyn WalletCapability>, ClientError> {
        match &self.wallet {
            Some(wallet) => Ok(wallet.clone()),
            None => {
                state.wallet_status = WalletStatus::NoCapability;
                state.notice = Some(INSTALL_PROMPT.to_string());
                Err(ClientError::NoWallet)
            }
        }
    }

    /// Check the node's chain ID against the configured one.
    ///
    /// Runs at most once successfully; a failed check is retried on the
    /// next operation.
    async fn verify_chain(&self) -> Result<(), ClientError> {
        self.chain_verified
            .get_or_try_init(|| async {
                let actual = self.reader.get_chain_id().await?;
                if actual.0 != self.expected_chain_id {
                    return Err(BlockchainError::ChainMismatch {
                        expected: self.expected_chain_id,
                        actual: actual.0,
                    });
                }
                tracing::info!(chain_id = actual.0, "Chain ID verified");
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Look up an already-authorized account without prompting.
    ///
    /// Best effort: any failure just means "not connected".
    pub async fn check_connection(&self, state: &mut AppState) {
        let Ok(wallet) = self.require_wallet(state) else {
            return;
        };

        state.wallet_status = match wallet.authorized_accounts().await {
            Ok(accounts) => {
                state.notice = None;
                match accounts.first() {
                    Some(address) => WalletStatus::Connected(*address),
                    None => WalletStatus::Unauthorized,
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Authorized account lookup failed");
                WalletStatus::Unauthorized
            }
        };
    }

    /// Read the stored message into `state.message`.
    ///
    /// On failure the previous message stays in place.
    pub async fn fetch_message(&self, state: &mut AppState) -> Result<(), ClientError> {
        self.require_wallet(state)?;

        match self.read_message().await {
            Ok(message) => {
                tracing::info!(contract = %self.contract.address(), "Fetched message");
                state.message = message;
                state.notice = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, contract = %self.contract.address(), "Failed to fetch message");
                state.notice = Some(format!("Could not fetch the message: {}", e));
                Err(e)
            }
        }
    }

    async fn read_message(&self) -> Result<String, ClientError> {
        self.verify_chain().await?;
        Ok(self.contract.get_message().await?)
    }

    /// Submit `state.pending_input` and wait for it to be confirmed.
    ///
    /// Rejects a second submission while one is in flight. On success the
    /// last-update line is set and the input cleared; on failure the input
    /// is kept so the user can retry.
    pub async fn submit_message(&self, state: &mut AppState) -> Result<TxHash, ClientError> {
        let wallet = self.require_wallet(state)?;

        if state.pending_input.is_empty() {
            state.notice = Some(EMPTY_MESSAGE_NOTICE.to_string());
            return Err(ClientError::EmptyMessage);
        }

        let Some(_guard) = self.begin_write() else {
            state.notice = Some("An update is already being submitted".to_string());
            return Err(ClientError::WriteInFlight);
        };

        let new_message = state.pending_input.clone();
        match self.write(wallet.as_ref(), &new_message, state).await {
            Ok(tx_hash) => {
                state.last_update = Some(last_update_line(&new_message, &state.message));
                state.pending_input.clear();
                state.notice = None;
                Ok(tx_hash)
            }
            Err(e) => {
                tracing::error!(error = %e, "Message update failed");
                state.notice = Some(format!("Update failed: {}", e));
                Err(e)
            }
        }
    }

    fn begin_write(&self) -> Option<WriteGuard<'_>> {
        self.write_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| WriteGuard(&self.write_in_flight))
    }

    async fn write(
        &self,
        wallet: &dyn WalletCapability,
        message: &str,
        state: &mut AppState,
    ) -> Result<TxHash, ClientError> {
        self.verify_chain().await?;

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                state.wallet_status = WalletStatus::Unauthorized;
                return Err(e.into());
            }
        };
        let Some(&signer) = accounts.first() else {
            state.wallet_status = WalletStatus::Unauthorized;
            return Err(ClientError::Unauthorized);
        };
        state.wallet_status = WalletStatus::Connected(signer);

        let tx = self
            .tx_builder
            .build_call(
                signer,
                self.contract.address(),
                MessageContract::set_message_calldata(message),
            )
            .await?;

        let tx_hash = wallet.send_transaction(tx).await?;
        tracing::info!(tx_hash = %tx_hash, from = %signer, "setMessage submitted");

        match self.tx_builder.wait_for_confirmation(tx_hash).await? {
            ConfirmationStatus::Confirmed { block_number } => {
                tracing::info!(tx_hash = %tx_hash, block_number, "setMessage confirmed");
                Ok(tx_hash)
            }
            ConfirmationStatus::Failed(reason) => Err(BlockchainError::Reverted(format!(
                "{} ({})",
                reason, tx_hash
            ))
            .into()),
        }
    }
}

impl std::fmt::Debug for ContractClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractClient")
            .field("contract", &self.contract.address())
            .field("wallet", &self.wallet.as_ref().map(|w| w.kind()))
            .finish()
    }
}
