//! Contract interaction client and its terminal surface.
//!
//! # Data Flow
//! ```text
//! command (CLI or shell line)
//!     → client.rs (wallet guard → connection check / read / write)
//!     → state.rs (AppState updated in place)
//!     → view.rs (rendered to stdout)
//! ```
//!
//! # Wallet status
//! ```text
//! Unknown → NoCapability | Unauthorized | Connected(address)
//! ```
//! Driven only by the connection check and the write path.

pub mod client;
pub mod shell;
pub mod state;
pub mod view;

pub use client::{ClientError, ContractClient};
pub use state::{AppState, WalletStatus};
