//! Terminal client for a deployed ReadWrite message contract.

pub mod app;
pub mod blockchain;
pub mod config;
pub mod observability;

pub use app::{AppState, ClientError, ContractClient, WalletStatus};
pub use config::schema::ClientConfig;
