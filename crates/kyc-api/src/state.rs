//! # Application State
//!
//! Shared state passed to every handler through the `State` extractor.
//! The ledger client and document store are constructed once at startup and
//! reach handlers only through the [`KycWorkflow`].

use std::sync::Arc;

use kyc_ledger::{LedgerClient, MockLedgerClient};

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::store::{DocumentStore, MemoryStore};
use crate::workflow::KycWorkflow;

#[derive(Debug, Clone)]
pub struct AppState {
    pub workflow: KycWorkflow,
    pub metrics: ApiMetrics,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn DocumentStore>,
        metrics: ApiMetrics,
        auth: AuthConfig,
    ) -> Self {
        Self {
            workflow: KycWorkflow::new(ledger, store),
            metrics,
            auth,
        }
    }

    /// Mock ledger, in-memory store, auth disabled.
    pub fn in_memory() -> Result<Self, prometheus::Error> {
        Ok(Self::new(
            Arc::new(MockLedgerClient::default()),
            Arc::new(MemoryStore::new()),
            ApiMetrics::new()?,
            AuthConfig::default(),
        ))
    }
}
