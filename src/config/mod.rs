//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (READWRITE_*)
//!     → command line overrides
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{ChainConfig, ClientConfig, ContractConfig, ObservabilityConfig, WalletConfig};
