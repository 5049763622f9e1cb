//! # KYC Verification Workflow
//!
//! The one piece of domain orchestration in the relay:
//!
//! 1. Validate all seven identity fields. Any failure returns
//!    [`WorkflowError::InvalidInput`] before the ledger or store is touched.
//! 2. Compute the identity fingerprint.
//! 3. Submit the raw identity fields to the ledger.
//! 4. On ledger success, persist a verified record with the fingerprint.
//!
//! There is no lock around steps 3 and 4, no retry, and no compensation.
//! Two concurrent submissions of the same identity both succeed and produce
//! two verified records with the same fingerprint. If step 4 fails after
//! step 3 succeeded, the ledger and the store disagree; the error is logged
//! with the transaction hash so an operator can reconcile.

use std::sync::Arc;

use kyc_core::{Fingerprint, IdentitySubmission, KycRecord, ValidationError};
use kyc_ledger::{LedgerClient, LedgerError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::{DocumentStore, StoreError};

/// Workflow failures, one per external dependency plus bad input.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("ledger call failed: {0}")]
    LedgerCallFailed(#[from] LedgerError),

    #[error("persistence failed: {0}")]
    PersistenceFailed(#[from] StoreError),
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub address: String,
    #[schema(value_type = String)]
    pub fingerprint: Fingerprint,
    pub transaction_hash: String,
    pub record_id: Uuid,
    /// `KYC verified for address {address}`.
    pub confirmation: String,
}

/// On-chain verification flag for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KycStatus {
    pub address: String,
    pub kyc_status: bool,
}

/// Verification workflow wired to its two collaborators.
#[derive(Debug, Clone)]
pub struct KycWorkflow {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn DocumentStore>,
}

impl KycWorkflow {
    pub fn new(ledger: Arc<dyn LedgerClient>, store: Arc<dyn DocumentStore>) -> Self {
        Self { ledger, store }
    }

    /// Validate, submit to the ledger, then persist a verified record.
    pub async fn verify(
        &self,
        submission: &IdentitySubmission,
    ) -> Result<VerificationResult, WorkflowError> {
        let identity = submission.validate().map_err(|e| {
            tracing::info!(field = %e.field(), "verification rejected: {e}");
            e
        })?;
        let fingerprint = identity.fingerprint();

        let receipt = self.ledger.verify_kyc(&identity).await.map_err(|e| {
            tracing::warn!(
                address = %identity.address(),
                fingerprint = %fingerprint,
                network = %self.ledger.network(),
                error = %e,
                "ledger verification call failed"
            );
            e
        })?;

        let record = self
            .store
            .create(KycRecord::verified(&identity))
            .await
            .map_err(|e| {
                tracing::error!(
                    address = %identity.address(),
                    fingerprint = %fingerprint,
                    tx_hash = %receipt.transaction_hash,
                    error = %e,
                    "ledger accepted verification but the record was not persisted"
                );
                e
            })?;

        tracing::info!(
            address = %identity.address(),
            fingerprint = %fingerprint,
            tx_hash = %receipt.transaction_hash,
            record_id = %record.id(),
            "KYC verified"
        );

        Ok(VerificationResult {
            confirmation: format!("KYC verified for address {}", identity.address()),
            address: identity.address().to_string(),
            fingerprint,
            transaction_hash: receipt.transaction_hash,
            record_id: record.id(),
        })
    }

    /// Validate and store an unverified record.
    pub async fn submit(&self, submission: &IdentitySubmission) -> Result<KycRecord, WorkflowError> {
        let identity = submission.validate()?;
        let record = self.store.create(KycRecord::submitted(&identity)).await?;
        tracing::debug!(record_id = %record.id(), "identity submission stored");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<KycRecord>, WorkflowError> {
        Ok(self.store.list().await?)
    }

    /// Read the verification flag from the ledger.
    pub async fn kyc_status(&self, address: &str) -> Result<KycStatus, WorkflowError> {
        let kyc_status = self.ledger.kyc_status(address).await?;
        Ok(KycStatus {
            address: address.to_string(),
            kyc_status,
        })
    }

    /// Whether the document store is reachable.
    pub async fn store_ready(&self) -> Result<(), WorkflowError> {
        Ok(self.store.ping().await?)
    }
}
