//! In-process ledger double.
//!
//! Remembers which addresses it has verified so `kyc_status` reflects prior
//! `verify_kyc` calls, counts calls for assertions, and can be switched into
//! a failing mode.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kyc_core::ValidatedIdentity;
use parking_lot::RwLock;

use crate::abi::keccak256;
use crate::client::{LedgerClient, LedgerError, LedgerReceipt};

#[derive(Debug)]
pub struct MockLedgerClient {
    network: String,
    verified: RwLock<HashSet<String>>,
    failure: RwLock<Option<String>>,
    verify_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl MockLedgerClient {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            verified: RwLock::new(HashSet::new()),
            failure: RwLock::new(None),
            verify_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose every call fails with `Unavailable { reason }`.
    pub fn failing(reason: impl Into<String>) -> Self {
        let mock = Self::new("mock");
        mock.set_failure(Some(reason.into()));
        mock
    }

    /// Make subsequent calls fail (`Some`) or succeed (`None`).
    pub fn set_failure(&self, reason: Option<String>) {
        *self.failure.write() = reason;
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), LedgerError> {
        match self.failure.read().as_ref() {
            Some(reason) => Err(LedgerError::Unavailable {
                network: self.network.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockLedgerClient {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn verify_kyc(&self, identity: &ValidatedIdentity) -> Result<LedgerReceipt, LedgerError> {
        let n = self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        self.verified
            .write()
            .insert(identity.address().to_ascii_lowercase());

        let seed = format!("{}:{}:{n}", identity.address(), identity.fingerprint());
        Ok(LedgerReceipt {
            address: identity.address().to_string(),
            transaction_hash: format!("0x{}", hex::encode(keccak256(seed.as_bytes()))),
            network: self.network.clone(),
        })
    }

    async fn kyc_status(&self, address: &str) -> Result<bool, LedgerError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.verified.read().contains(&address.to_ascii_lowercase()))
    }

    fn network(&self) -> &str {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_core::IdentitySubmission;

    fn identity(address: &str) -> ValidatedIdentity {
        IdentitySubmission {
            address: Some(address.into()),
            name: Some("Alice".into()),
            id_type: Some("passport".into()),
            id_number: Some("X123".into()),
            day_of_birth: Some(1),
            month_of_birth: Some(1),
            year_of_birth: Some(1990),
        }
        .validate_at(2026)
        .unwrap()
    }

    #[tokio::test]
    async fn status_reflects_prior_verification() {
        let ledger = MockLedgerClient::default();
        assert!(!ledger.kyc_status("0xABC").await.unwrap());
        ledger.verify_kyc(&identity("0xabc")).await.unwrap();
        assert!(ledger.kyc_status("0xABC").await.unwrap());
        assert_eq!(ledger.verify_calls(), 1);
        assert_eq!(ledger.status_calls(), 2);
    }

    #[tokio::test]
    async fn repeated_verifications_get_distinct_hashes() {
        let ledger = MockLedgerClient::default();
        let a = ledger.verify_kyc(&identity("0xabc")).await.unwrap();
        let b = ledger.verify_kyc(&identity("0xabc")).await.unwrap();
        assert_ne!(a.transaction_hash, b.transaction_hash);
        assert_eq!(a.transaction_hash.len(), 66);
    }

    #[tokio::test]
    async fn failing_mode_counts_but_does_not_verify() {
        let ledger = MockLedgerClient::failing("node down");
        let err = ledger.verify_kyc(&identity("0xabc")).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unavailable { .. }));
        assert_eq!(ledger.verify_calls(), 1);

        ledger.set_failure(None);
        assert!(!ledger.kyc_status("0xabc").await.unwrap());
    }
}
