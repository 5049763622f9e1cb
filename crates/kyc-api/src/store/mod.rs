//! # Document Store
//!
//! Persistence for [`KycRecord`]s behind a small trait so the workflow can
//! run against Postgres in production and an in-memory vector in
//! development and tests.
//!
//! Neither implementation enforces uniqueness on address or fingerprint:
//! submitting the same identity twice yields two records.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use kyc_core::KycRecord;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned back into a record.
    #[error("corrupt stored record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Create/list persistence for KYC records.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Store a record as-is and return what was stored.
    async fn create(&self, record: KycRecord) -> Result<KycRecord, StoreError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<KycRecord>, StoreError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
