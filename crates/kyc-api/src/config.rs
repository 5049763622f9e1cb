//! Process configuration from environment variables.
//!
//! | Variable | Default | Notes |
//! |---|---|---|
//! | `PORT` | `8080` | |
//! | `DATABASE_URL` | unset | unset means in-memory store |
//! | `LEDGER_MODE` | `evm` | `evm` or `mock` |
//! | `LEDGER_RPC_URL` | required in `evm` mode | |
//! | `LEDGER_CONTRACT_ADDRESS` | required in `evm` mode | |
//! | `LEDGER_PRIVATE_KEY` | required in `evm` mode | 64 hex chars, optional `0x` |
//! | `LEDGER_CHAIN_ID` | `11155111` | |
//! | `LEDGER_TIMEOUT_SECS` | `30` | |
//! | `AUTH_TOKEN` | unset | unset disables auth |

use kyc_ledger::EvmLedgerConfig;
use thiserror::Error;

use crate::auth::SecretToken;

const DEFAULT_PORT: u16 = 8080;

/// Which ledger client to construct.
#[derive(Debug, Clone)]
pub enum LedgerSettings {
    Evm(EvmLedgerConfig),
    Mock,
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub ledger: LedgerSettings,
    pub auth_token: Option<SecretToken>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("ledger", &self.ledger)
            .field("auth_token", &self.auth_token)
            .finish()
    }
}

/// Fatal startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),

    #[error("invalid LEDGER_MODE {0:?}: expected \"evm\" or \"mock\"")]
    InvalidLedgerMode(String),

    #[error(transparent)]
    Ledger(#[from] kyc_ledger::ConfigError),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
        };

        let ledger = match non_empty("LEDGER_MODE").as_deref().map(str::trim) {
            None | Some("evm") => LedgerSettings::Evm(EvmLedgerConfig::from_lookup(&lookup)?),
            Some("mock") => LedgerSettings::Mock,
            Some(other) => return Err(ConfigError::InvalidLedgerMode(other.to_string())),
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            ledger,
            auth_token: non_empty("AUTH_TOKEN").map(SecretToken::new),
        })
    }
}
