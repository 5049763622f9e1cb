//! EVM ledger client configuration.
//!
//! There are no fallbacks for the RPC endpoint, the contract address or the
//! signing key. A missing or malformed value is a startup error.

use url::Url;

use crate::abi::is_valid_eth_address;
use crate::signer::{KeyError, SigningKeyHex};

/// Chain ID of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`EvmLedgerClient`](crate::EvmLedgerClient).
///
/// `Debug` never prints the signing key.
#[derive(Debug, Clone)]
pub struct EvmLedgerConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Url,
    /// KYC registry contract (0x-prefixed, 40 hex chars).
    pub contract_address: String,
    /// Private key of the account that sends verification transactions.
    pub signing_key: SigningKeyHex,
    /// EIP-155 chain ID (default: Sepolia).
    pub chain_id: u64,
    /// Per-request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl EvmLedgerConfig {
    pub fn new(
        rpc_url: Url,
        contract_address: impl Into<String>,
        signing_key: SigningKeyHex,
    ) -> Result<Self, ConfigError> {
        let contract_address = contract_address.into();
        if !is_valid_eth_address(&contract_address) {
            return Err(ConfigError::InvalidContractAddress(contract_address));
        }
        Ok(Self {
            rpc_url,
            contract_address,
            signing_key,
            chain_id: SEPOLIA_CHAIN_ID,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LEDGER_RPC_URL` (required)
    /// - `LEDGER_CONTRACT_ADDRESS` (required)
    /// - `LEDGER_PRIVATE_KEY` (required, 64 hex chars, optional `0x`)
    /// - `LEDGER_CHAIN_ID` (default: 11155111)
    /// - `LEDGER_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let raw_url = required("LEDGER_RPC_URL")?;
        let rpc_url = Url::parse(raw_url.trim())
            .map_err(|e| ConfigError::InvalidUrl("LEDGER_RPC_URL".to_string(), e.to_string()))?;
        let contract_address = required("LEDGER_CONTRACT_ADDRESS")?.trim().to_string();
        let signing_key = SigningKeyHex::parse(&required("LEDGER_PRIVATE_KEY")?)
            .map_err(ConfigError::InvalidKey)?;

        let chain_id = parse_number(&lookup, "LEDGER_CHAIN_ID", SEPOLIA_CHAIN_ID)?;
        let timeout_secs = parse_number(&lookup, "LEDGER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(rpc_url, contract_address, signing_key)?
            .with_chain_id(chain_id)
            .with_timeout(timeout_secs))
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(name, raw)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid contract address: {0}")]
    InvalidContractAddress(String),
    #[error("invalid LEDGER_PRIVATE_KEY: {0}")]
    InvalidKey(#[source] KeyError),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn complete() -> HashMap<String, String> {
        env(&[
            ("LEDGER_RPC_URL", "https://rpc.sepolia.example"),
            ("LEDGER_CONTRACT_ADDRESS", CONTRACT),
            ("LEDGER_PRIVATE_KEY", &"46".repeat(32)),
        ])
    }

    fn load(vars: &HashMap<String, String>) -> Result<EvmLedgerConfig, ConfigError> {
        EvmLedgerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let cfg = load(&complete()).unwrap();
        assert_eq!(cfg.chain_id, SEPOLIA_CHAIN_ID);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.rpc_url.as_str(), "https://rpc.sepolia.example/");
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = complete();
        vars.insert("LEDGER_CHAIN_ID".into(), "31337".into());
        vars.insert("LEDGER_TIMEOUT_SECS".into(), "5".into());
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.chain_id, 31337);
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn each_required_var_is_enforced() {
        for name in ["LEDGER_RPC_URL", "LEDGER_CONTRACT_ADDRESS", "LEDGER_PRIVATE_KEY"] {
            let mut vars = complete();
            vars.remove(name);
            match load(&vars) {
                Err(ConfigError::Missing(missing)) => assert_eq!(missing, name),
                other => panic!("expected Missing({name}), got {other:?}"),
            }
        }
    }

    #[test]
    fn short_key_is_rejected() {
        let mut vars = complete();
        vars.insert("LEDGER_PRIVATE_KEY".into(), "0x1234".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidKey(KeyError::WrongLength { len: 4 }))
        ));
    }

    #[test]
    fn malformed_contract_address_is_rejected() {
        let mut vars = complete();
        vars.insert("LEDGER_CONTRACT_ADDRESS".into(), "0x1234".into());
        assert!(matches!(load(&vars), Err(ConfigError::InvalidContractAddress(_))));
    }

    #[test]
    fn bad_number_is_rejected() {
        let mut vars = complete();
        vars.insert("LEDGER_CHAIN_ID".into(), "sepolia".into());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::InvalidNumber("LEDGER_CHAIN_ID", _))
        ));
    }

    #[test]
    fn debug_redacts_signing_key() {
        let cfg = load(&complete()).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(&"46".repeat(32)));
    }
}
