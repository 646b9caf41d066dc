//! Client configuration.
//!
//! Everything the client needs to reach the chain, read from `ANONVOTE_*`
//! environment variables. Only the contract address is required; everything
//! else has a local-development default. Eligibility and identity-provider
//! settings belong to the CLI arguments.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use anonvote_core::{AccountAddress, ErrorCategory, IdentifierError};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// Configuration for one client session.
///
/// Custom `Debug` implementation redacts the `private_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Voting contract address.
    pub contract_address: AccountAddress,
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// Hex signing key for the local wallet. `None` means no wallet provider.
    pub private_key: Option<Zeroizing<String>>,
    pub chain_id: u64,
    /// Bounded confirmation wait. `None` waits indefinitely.
    pub confirmation_timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("contract_address", &self.contract_address)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("chain_id", &self.chain_id)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ANONVOTE_CONTRACT_ADDRESS` (required)
    /// - `ANONVOTE_RPC_URL` (default: `http://127.0.0.1:8545`)
    /// - `ANONVOTE_PRIVATE_KEY` (optional)
    /// - `ANONVOTE_CHAIN_ID` (default: 31337)
    /// - `ANONVOTE_CONFIRMATION_TIMEOUT_SECS` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let contract_address = get("ANONVOTE_CONTRACT_ADDRESS")
            .ok_or(ConfigError::MissingContractAddress)?;
        let contract_address = AccountAddress::from_hex(&contract_address)?;

        let rpc_raw = get("ANONVOTE_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let rpc_url = Url::parse(&rpc_raw)
            .map_err(|e| ConfigError::InvalidUrl("ANONVOTE_RPC_URL".to_string(), e.to_string()))?;

        let timeout_secs = parse_number(&get, "ANONVOTE_CONFIRMATION_TIMEOUT_SECS")?;

        Ok(Self {
            contract_address,
            rpc_url,
            private_key: get("ANONVOTE_PRIVATE_KEY").map(Zeroizing::new),
            chain_id: parse_number(&get, "ANONVOTE_CHAIN_ID")?.unwrap_or(DEFAULT_CHAIN_ID),
            confirmation_timeout: timeout_secs.map(Duration::from_secs),
        })
    }

    /// Configuration for a local dev chain with the given contract.
    pub fn local(contract_address: AccountAddress) -> Result<Self, ConfigError> {
        let rpc_url = Url::parse(DEFAULT_RPC_URL)
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            contract_address,
            rpc_url,
            private_key: None,
            chain_id: DEFAULT_CHAIN_ID,
            confirmation_timeout: None,
        })
    }
}

fn parse_number(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    get(var)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
        })
        .transpose()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ANONVOTE_CONTRACT_ADDRESS environment variable is required")]
    MissingContractAddress,
    #[error("invalid contract address: {0}")]
    InvalidContractAddress(#[from] IdentifierError),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_with_only_contract_address() {
        let cfg = ClientConfig::from_lookup(lookup(&[("ANONVOTE_CONTRACT_ADDRESS", CONTRACT)]))
            .unwrap();
        assert_eq!(cfg.contract_address.to_hex(), CONTRACT);
        assert_eq!(cfg.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(cfg.chain_id, 31337);
        assert!(cfg.private_key.is_none());
        assert!(cfg.confirmation_timeout.is_none());
    }

    #[test]
    fn test_missing_contract_address_is_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingContractAddress));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_invalid_contract_address_rejected() {
        let err =
            ClientConfig::from_lookup(lookup(&[("ANONVOTE_CONTRACT_ADDRESS", "0x1234")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContractAddress(_)));
    }

    #[test]
    fn test_overrides_parsed() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("ANONVOTE_CONTRACT_ADDRESS", CONTRACT),
            ("ANONVOTE_RPC_URL", "https://rpc.example.org"),
            ("ANONVOTE_CHAIN_ID", "11155111"),
            ("ANONVOTE_CONFIRMATION_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(cfg.chain_id, 11155111);
        assert_eq!(cfg.confirmation_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_bad_number_names_variable() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("ANONVOTE_CONTRACT_ADDRESS", CONTRACT),
            ("ANONVOTE_CHAIN_ID", "mainnet"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ANONVOTE_CHAIN_ID"));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("ANONVOTE_CONTRACT_ADDRESS", CONTRACT),
            ("ANONVOTE_PRIVATE_KEY", "0xdeadbeefcafe"),
        ]))
        .unwrap();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("deadbeefcafe"));
    }
}
