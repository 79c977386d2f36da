//! UI state owned by the caller and threaded through every handler.

use alloy::primitives::Address;
use std::fmt;

/// Notice shown when an operation finds no wallet capability.
pub const INSTALL_PROMPT: &str = "You must install a wallet: configure a wallet endpoint \
     ([wallet] endpoint or READWRITE_WALLET_URL) or export READWRITE_PRIVATE_KEY";

/// Shown when a write is attempted with no input.
pub const EMPTY_MESSAGE_NOTICE: &str = "Add a new message first!";

/// Outcome of the most recent connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletStatus {
    /// No connection check has run yet.
    #[default]
    Unknown,
    /// No wallet capability in the environment.
    NoCapability,
    /// Wallet present, no account authorized.
    Unauthorized,
    Connected(Address),
}

impl WalletStatus {
    pub fn connected_address(&self) -> Option<Address> {
        match self {
            WalletStatus::Connected(address) => Some(*address),
            _ => None,
        }
    }
}

impl fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletStatus::Unknown => write!(f, "Checking wallet..."),
            WalletStatus::NoCapability => write!(f, "No wallet capability"),
            WalletStatus::Unauthorized => write!(f, "No wallet connected"),
            WalletStatus::Connected(address) => write!(f, "Connected wallet: {}", address),
        }
    }
}

/// Transient client state. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Last value fetched from the contract.
    pub message: String,
    /// User input not yet submitted.
    pub pending_input: String,
    pub wallet_status: WalletStatus,
    /// Outcome line of the last successful write.
    pub last_update: Option<String>,
    /// Feedback for the user: validation messages and failures.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.pending_input = input.into();
        self
    }
}

/// The "last update" line recorded after a confirmed write.
pub fn last_update_line(new_message: &str, old_message: &str) -> String {
    format!(
        "New message: \"{}\" | Old message: \"{}\"",
        new_message, old_message
    )
}
