//! Startup wiring: build the ledger client, the document store and the
//! metrics registry from an [`AppConfig`].

use std::sync::Arc;

use kyc_ledger::{EvmLedgerClient, LedgerClient, LedgerError, MockLedgerClient};
use thiserror::Error;

use crate::auth::AuthConfig;
use crate::config::{AppConfig, LedgerSettings};
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryStore, PgStore, StoreError};

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to create ledger client: {0}")]
    Ledger(#[from] LedgerError),

    #[error("failed to initialize document store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub async fn bootstrap(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let ledger: Arc<dyn LedgerClient> = match &config.ledger {
        LedgerSettings::Evm(evm) => Arc::new(EvmLedgerClient::new(evm.clone())?),
        LedgerSettings::Mock => {
            tracing::warn!("LEDGER_MODE=mock: verifications are not sent to any chain");
            Arc::new(MockLedgerClient::new("mock"))
        }
    };

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            tracing::warn!(
                "DATABASE_URL not set: running with an in-memory store. \
                 Records will not survive restarts."
            );
            Arc::new(MemoryStore::new())
        }
    };

    let auth = AuthConfig {
        token: config.auth_token.clone(),
    };
    if auth.token.is_none() {
        tracing::warn!("AUTH_TOKEN not set: record and contract routes are unauthenticated");
    }

    Ok(AppState::new(ledger, store, ApiMetrics::new()?, auth))
}
