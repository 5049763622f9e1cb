//! # Identity Fingerprint
//!
//! A SHA-256 digest over the identity fields of a submission. Two submissions
//! with the same name, document and date of birth produce the same
//! fingerprint regardless of the account address they were filed under,
//! which is what makes duplicate identities visible in the store.
//!
//! ## Preimage
//!
//! The preimage is the plain concatenation
//! `name || idType || idNumber || dayOfBirth || monthOfBirth || yearOfBirth`
//! with numbers rendered in decimal and no separators. Field boundaries are
//! not encoded, so `("ab", "c")` and `("a", "bc")` collide. Records written by
//! earlier deployments use the same preimage, so it must not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::KycError;

/// Length of a fingerprint rendered as lowercase hex.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// A 256-bit identity fingerprint.
///
/// Serializes as a 64-character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = KycError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_HEX_LEN {
            return Err(KycError::InvalidFingerprint(format!(
                "expected {FINGERPRINT_HEX_LEN} hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| KycError::InvalidFingerprint(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the fingerprint of a set of identity fields.
pub fn fingerprint_of(
    name: &str,
    id_type: &str,
    id_number: &str,
    day_of_birth: u32,
    month_of_birth: u32,
    year_of_birth: u32,
) -> Fingerprint {
    let preimage =
        format!("{name}{id_type}{id_number}{day_of_birth}{month_of_birth}{year_of_birth}");
    let hash = Sha256::digest(preimage.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Fingerprint(bytes)
}
