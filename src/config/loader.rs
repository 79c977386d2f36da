//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the deployed contract address.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "READWRITE_CONTRACT_ADDRESS";
/// Environment variable overriding the primary RPC URL.
pub const RPC_URL_ENV_VAR: &str = "READWRITE_RPC_URL";
/// Environment variable overriding the wallet endpoint.
pub const WALLET_URL_ENV_VAR: &str = "READWRITE_WALLET_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values given on the command line. They win over env and file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub contract_address: Option<String>,
    pub rpc_url: Option<String>,
    pub wallet_endpoint: Option<String>,
}

/// Load, layer and validate configuration.
///
/// Precedence: command line, then process environment, then the TOML file
/// (when given), then defaults.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ClientConfig, ConfigError> {
    let base = match path {
        Some(path) => parse_file(path)?,
        None => ClientConfig::default(),
    };

    let config = resolve_config(base, |key| std::env::var(key).ok(), overrides);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment and command line layers on top of `base`.
pub fn resolve_config<F>(mut base: ClientConfig, env: F, overrides: &ConfigOverrides) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |v: String| if v.trim().is_empty() { None } else { Some(v) };

    if let Some(address) = env(CONTRACT_ADDRESS_ENV_VAR).and_then(non_empty) {
        base.contract.address = address;
    }
    if let Some(url) = env(RPC_URL_ENV_VAR).and_then(non_empty) {
        base.chain.rpc_url = url;
    }
    if let Some(url) = env(WALLET_URL_ENV_VAR).and_then(non_empty) {
        base.wallet.endpoint = Some(url);
    }

    if let Some(address) = &overrides.contract_address {
        base.contract.address = address.clone();
    }
    if let Some(url) = &overrides.rpc_url {
        base.chain.rpc_url = url.clone();
    }
    if let Some(url) = &overrides.wallet_endpoint {
        base.wallet.endpoint = Some(url.clone());
    }

    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const ADDR: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            (CONTRACT_ADDRESS_ENV_VAR, ADDR),
            (RPC_URL_ENV_VAR, "https://rpc-amoy.polygon.technology"),
        ]
        .into_iter()
        .collect();

        let config = resolve_config(
            ClientConfig::default(),
            |k| env.get(k).map(|v| v.to_string()),
            &ConfigOverrides::default(),
        );

        assert_eq!(config.contract.address, ADDR);
        assert_eq!(config.chain.rpc_url, "https://rpc-amoy.polygon.technology");
        assert!(config.wallet.endpoint.is_none());
    }

    #[test]
    fn test_cli_overrides_env() {
        let overrides = ConfigOverrides {
            contract_address: Some("0x0000000000000000000000000000000000000001".into()),
            rpc_url: None,
            wallet_endpoint: Some("http://127.0.0.1:1248".into()),
        };
        let config = resolve_config(
            ClientConfig::default(),
            |k| (k == CONTRACT_ADDRESS_ENV_VAR).then(|| ADDR.to_string()),
            &overrides,
        );

        assert_eq!(
            config.contract.address,
            "0x0000000000000000000000000000000000000001"
        );
        assert_eq!(config.wallet.endpoint.as_deref(), Some("http://127.0.0.1:1248"));
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut base = ClientConfig::default();
        base.contract.address = ADDR.to_string();
        let config = resolve_config(base, |_| Some("  ".to_string()), &ConfigOverrides::default());
        assert_eq!(config.contract.address, ADDR);
        assert!(config.wallet.endpoint.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[contract]\naddress = \"{}\"\n\n[chain]\nchain_id = 80002",
            ADDR
        )
        .unwrap();

        let overrides = ConfigOverrides {
            contract_address: Some(ADDR.to_string()),
            ..Default::default()
        };
        let config = load_config(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.chain.chain_id, 80002);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chain\nrpc_url = ").unwrap();
        let result = load_config(Some(file.path()), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
