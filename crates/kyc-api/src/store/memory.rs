//! In-memory document store.
//!
//! `parking_lot::RwLock` is never held across an `.await`.

use std::sync::Arc;

use async_trait::async_trait;
use kyc_core::KycRecord;
use parking_lot::RwLock;

use super::{DocumentStore, StoreError};

/// Vector-backed store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<KycRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, record: KycRecord) -> Result<KycRecord, StoreError> {
        self.records.write().push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<KycRecord>, StoreError> {
        Ok(self.records.read().clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_core::IdentitySubmission;

    fn identity(name: &str) -> kyc_core::ValidatedIdentity {
        IdentitySubmission {
            address: Some("0xabc".into()),
            name: Some(name.into()),
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
    async fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["Alice", "Bob", "Carol"] {
            store.create(KycRecord::submitted(&identity(name))).await.unwrap();
        }
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let store = MemoryStore::new();
        let id = identity("Alice");
        store.create(KycRecord::verified(&id)).await.unwrap();
        store.create(KycRecord::verified(&id)).await.unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.create(KycRecord::submitted(&identity("Alice"))).await.unwrap();
        assert!(!other.is_empty());
    }
}
