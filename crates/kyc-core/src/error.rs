//! # Error Types
//!
//! Validation failures carry the offending field name in its wire form
//! (`idType`, `dayOfBirth`, ...) so the message can be returned to the caller
//! unchanged.

use thiserror::Error;

use crate::identity::IdentityField;

/// Top-level error type for `kyc-core`.
#[derive(Error, Debug)]
pub enum KycError {
    /// An identity submission failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A fingerprint string was not 64 hex characters.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),
}

/// A submission was rejected before any external call was made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field is absent, or is a string that is empty after trimming.
    #[error("missing required field: {0}")]
    MissingField(IdentityField),

    /// A numeric field is outside its accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The field that failed.
        field: IdentityField,
        /// The submitted value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> IdentityField {
        match self {
            Self::MissingField(field) => *field,
            Self::OutOfRange { field, .. } => *field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_uses_wire_name() {
        let err = ValidationError::MissingField(IdentityField::IdNumber);
        assert_eq!(err.to_string(), "missing required field: idNumber");
    }

    #[test]
    fn out_of_range_message_includes_bounds() {
        let err = ValidationError::OutOfRange {
            field: IdentityField::MonthOfBirth,
            value: 13,
            min: 1,
            max: 12,
        };
        assert_eq!(err.to_string(), "monthOfBirth must be between 1 and 12, got 13");
        assert_eq!(err.field(), IdentityField::MonthOfBirth);
    }

    #[test]
    fn validation_error_converts_into_kyc_error() {
        let err: KycError = ValidationError::MissingField(IdentityField::Name).into();
        assert!(matches!(err, KycError::Validation(_)));
    }
}
