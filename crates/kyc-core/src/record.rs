//! # KYC Record
//!
//! One identity-verification attempt as held by the document store.
//!
//! ## Lifecycle
//!
//! Ingestion creates records with `isVerified = false` and no fingerprint.
//! The verification workflow creates records with `isVerified = true` and the
//! fingerprint stamped. Fields are private and there is no setter, so once a
//! record is verified nothing in this crate can make it unverified again.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::fingerprint::Fingerprint;
use crate::identity::ValidatedIdentity;

/// A stored KYC record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KycRecord {
    id: Uuid,
    address: String,
    name: String,
    id_type: String,
    id_number: String,
    day_of_birth: u32,
    month_of_birth: u32,
    year_of_birth: u32,
    is_verified: bool,
    #[schema(value_type = Option<String>)]
    fingerprint: Option<Fingerprint>,
    created_at: DateTime<Utc>,
}

/// Raw field values used to rebuild a record read back from a store.
#[derive(Debug, Clone)]
pub struct RecordParts {
    pub id: Uuid,
    pub address: String,
    pub name: String,
    pub id_type: String,
    pub id_number: String,
    pub day_of_birth: u32,
    pub month_of_birth: u32,
    pub year_of_birth: u32,
    pub is_verified: bool,
    pub fingerprint: Option<Fingerprint>,
    pub created_at: DateTime<Utc>,
}

impl KycRecord {
    /// A new, unverified record for an ingested submission.
    pub fn submitted(identity: &ValidatedIdentity) -> Self {
        Self::new(identity, false, None)
    }

    /// A new verified record with the identity fingerprint attached.
    pub fn verified(identity: &ValidatedIdentity) -> Self {
        Self::new(identity, true, Some(identity.fingerprint()))
    }

    fn new(identity: &ValidatedIdentity, is_verified: bool, fingerprint: Option<Fingerprint>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: identity.address().to_string(),
            name: identity.name().to_string(),
            id_type: identity.id_type().to_string(),
            id_number: identity.id_number().to_string(),
            day_of_birth: identity.day_of_birth(),
            month_of_birth: identity.month_of_birth(),
            year_of_birth: identity.year_of_birth(),
            is_verified,
            fingerprint,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Rebuild a record from stored values.
    pub fn from_parts(parts: RecordParts) -> Self {
        Self {
            id: parts.id,
            address: parts.address,
            name: parts.name,
            id_type: parts.id_type,
            id_number: parts.id_number,
            day_of_birth: parts.day_of_birth,
            month_of_birth: parts.month_of_birth,
            year_of_birth: parts.year_of_birth,
            is_verified: parts.is_verified,
            fingerprint: parts.fingerprint,
            created_at: parts.created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    pub fn day_of_birth(&self) -> u32 {
        self.day_of_birth
    }

    pub fn month_of_birth(&self) -> u32 {
        self.month_of_birth
    }

    pub fn year_of_birth(&self) -> u32 {
        self.year_of_birth
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
