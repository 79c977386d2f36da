//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Contract address present and well-formed
//! - Endpoint URLs parse
//! - Value ranges (timeouts > 0, confirmations > 0, multiplier >= 1.0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::ClientConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "Please add the deployed contract address to [contract] address or the {0} environment variable"
    )]
    MissingContractAddress(&'static str),

    #[error("invalid contract address '{0}'")]
    InvalidContractAddress(String),

    #[error("invalid URL for {field}: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("gas_price_multiplier must be >= 1.0, got {0}")]
    GasMultiplier(f64),
}

/// Check a loaded configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let address = config.contract.address.trim();
    if address.is_empty() {
        errors.push(ValidationError::MissingContractAddress(
            crate::config::loader::CONTRACT_ADDRESS_ENV_VAR,
        ));
    } else if address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidContractAddress(address.to_string()));
    }

    check_url(&mut errors, "chain.rpc_url", &config.chain.rpc_url);
    for url in &config.chain.failover_urls {
        check_url(&mut errors, "chain.failover_urls", url);
    }
    if let Some(endpoint) = &config.wallet.endpoint {
        check_url(&mut errors, "wallet.endpoint", endpoint);
    }

    let chain = &config.chain;
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("chain.rpc_timeout_secs"));
    }
    if chain.confirmation_blocks == 0 {
        errors.push(ValidationError::ZeroValue("chain.confirmation_blocks"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("chain.confirmation_timeout_secs"));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroValue("chain.poll_interval_ms"));
    }
    if chain.gas_price_multiplier.is_nan() || chain.gas_price_multiplier < 1.0 {
        errors.push(ValidationError::GasMultiplier(chain.gas_price_multiplier));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
