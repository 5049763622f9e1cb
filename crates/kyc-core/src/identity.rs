//! # Identity Submissions
//!
//! [`IdentitySubmission`] mirrors the JSON body callers send. Every field is
//! optional at the serde level so that an absent field is reported as a
//! validation failure naming that field, rather than as an opaque
//! deserialization error.
//!
//! Validation checks fields in a fixed order and stops at the first failure:
//! address, name, idType, idNumber, dayOfBirth, monthOfBirth, yearOfBirth.

use std::fmt;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::fingerprint::{fingerprint_of, Fingerprint};

/// Earliest accepted year of birth.
pub const MIN_BIRTH_YEAR: i64 = 1900;

/// The seven fields of an identity submission, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Address,
    Name,
    IdType,
    IdNumber,
    DayOfBirth,
    MonthOfBirth,
    YearOfBirth,
}

impl IdentityField {
    /// All fields, in validation order.
    pub const ALL: [IdentityField; 7] = [
        Self::Address,
        Self::Name,
        Self::IdType,
        Self::IdNumber,
        Self::DayOfBirth,
        Self::MonthOfBirth,
        Self::YearOfBirth,
    ];

    /// The camelCase JSON name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Name => "name",
            Self::IdType => "idType",
            Self::IdNumber => "idNumber",
            Self::DayOfBirth => "dayOfBirth",
            Self::MonthOfBirth => "monthOfBirth",
            Self::YearOfBirth => "yearOfBirth",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity data as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IdentitySubmission {
    /// External account identifier (e.g. a 0x-prefixed EVM address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Document kind, e.g. `passport` or `national-id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_birth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_of_birth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<i64>,
}

impl IdentitySubmission {
    /// Validate against the current UTC year.
    pub fn validate(&self) -> Result<ValidatedIdentity, ValidationError> {
        self.validate_at(Utc::now().year())
    }

    /// Validate with an explicit upper bound for the year of birth.
    pub fn validate_at(&self, current_year: i32) -> Result<ValidatedIdentity, ValidationError> {
        let address = required_text(IdentityField::Address, &self.address)?;
        let name = required_text(IdentityField::Name, &self.name)?;
        let id_type = required_text(IdentityField::IdType, &self.id_type)?;
        let id_number = required_text(IdentityField::IdNumber, &self.id_number)?;
        let day_of_birth = bounded(IdentityField::DayOfBirth, self.day_of_birth, 1, 31)?;
        let month_of_birth = bounded(IdentityField::MonthOfBirth, self.month_of_birth, 1, 12)?;
        let year_of_birth = bounded(
            IdentityField::YearOfBirth,
            self.year_of_birth,
            MIN_BIRTH_YEAR,
            i64::from(current_year),
        )?;

        Ok(ValidatedIdentity {
            address,
            name,
            id_type,
            id_number,
            day_of_birth,
            month_of_birth,
            year_of_birth,
        })
    }
}

fn required_text(field: IdentityField, value: &Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn bounded(field: IdentityField, value: Option<i64>, min: i64, max: i64) -> Result<u32, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value,
        min,
        max,
    })
}

/// An identity whose seven fields are present and in range.
///
/// String values are kept exactly as submitted; whitespace is only
/// considered when deciding whether a field is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedIdentity {
    address: String,
    name: String,
    id_type: String,
    id_number: String,
    day_of_birth: u32,
    month_of_birth: u32,
    year_of_birth: u32,
}

impl ValidatedIdentity {
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

    /// Fingerprint of the identity fields. The address is not included.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_of(
            &self.name,
            &self.id_type,
            &self.id_number,
            self.day_of_birth,
            self.month_of_birth,
            self.year_of_birth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> IdentitySubmission {
        IdentitySubmission {
            address: Some("0xabc".into()),
            name: Some("Alice".into()),
            id_type: Some("passport".into()),
            id_number: Some("X123".into()),
            day_of_birth: Some(1),
            month_of_birth: Some(1),
            year_of_birth: Some(1990),
        }
    }

    #[test]
    fn valid_submission_passes() {
        let id = alice().validate_at(2026).unwrap();
        assert_eq!(id.address(), "0xabc");
        assert_eq!(id.name(), "Alice");
        assert_eq!(id.id_type(), "passport");
        assert_eq!(id.id_number(), "X123");
        assert_eq!(
            (id.day_of_birth(), id.month_of_birth(), id.year_of_birth()),
            (1, 1, 1990)
        );
    }

    #[test]
    fn each_missing_field_is_reported_by_name() {
        for field in IdentityField::ALL {
            let mut sub = alice();
            match field {
                IdentityField::Address => sub.address = None,
                IdentityField::Name => sub.name = None,
                IdentityField::IdType => sub.id_type = None,
                IdentityField::IdNumber => sub.id_number = None,
                IdentityField::DayOfBirth => sub.day_of_birth = None,
                IdentityField::MonthOfBirth => sub.month_of_birth = None,
                IdentityField::YearOfBirth => sub.year_of_birth = None,
            }
            assert_eq!(
                sub.validate_at(2026),
                Err(ValidationError::MissingField(field)),
                "field {field}"
            );
        }
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let mut sub = alice();
        sub.name = Some("   ".into());
        assert_eq!(
            sub.validate_at(2026),
            Err(ValidationError::MissingField(IdentityField::Name))
        );
        sub.name = Some(String::new());
        assert_eq!(
            sub.validate_at(2026),
            Err(ValidationError::MissingField(IdentityField::Name))
        );
    }

    #[test]
    fn first_failure_wins() {
        let sub = IdentitySubmission {
            year_of_birth: Some(1990),
            ..Default::default()
        };
        assert_eq!(
            sub.validate_at(2026),
            Err(ValidationError::MissingField(IdentityField::Address))
        );
    }

    #[test]
    fn zero_day_is_out_of_range() {
        let mut sub = alice();
        sub.day_of_birth = Some(0);
        assert!(matches!(
            sub.validate_at(2026),
            Err(ValidationError::OutOfRange {
                field: IdentityField::DayOfBirth,
                value: 0,
                ..
            })
        ));
    }

    #[test]
    fn day_and_month_bounds() {
        let mut sub = alice();
        sub.day_of_birth = Some(31);
        sub.month_of_birth = Some(12);
        assert!(sub.validate_at(2026).is_ok());

        sub.day_of_birth = Some(32);
        assert!(sub.validate_at(2026).is_err());

        sub.day_of_birth = Some(1);
        sub.month_of_birth = Some(13);
        assert!(sub.validate_at(2026).is_err());
    }

    #[test]
    fn future_and_ancient_years_rejected() {
        let mut sub = alice();
        sub.year_of_birth = Some(2027);
        assert!(sub.validate_at(2026).is_err());
        sub.year_of_birth = Some(2026);
        assert!(sub.validate_at(2026).is_ok());
        sub.year_of_birth = Some(1899);
        assert!(sub.validate_at(2026).is_err());
        sub.year_of_birth = Some(-5);
        assert!(sub.validate_at(2026).is_err());
    }

    #[test]
    fn values_are_kept_verbatim() {
        let mut sub = alice();
        sub.name = Some(" Alice ".into());
        let id = sub.validate_at(2026).unwrap();
        assert_eq!(id.name(), " Alice ");
    }

    #[test]
    fn fingerprint_ignores_address() {
        let a = alice().validate_at(2026).unwrap();
        let mut other = alice();
        other.address = Some("0xdef".into());
        let b = other.validate_at(2026).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn deserializes_camel_case() {
        let json = serde_json::json!({
            "address": "0xabc",
            "name": "Alice",
            "idType": "passport",
            "idNumber": "X123",
            "dayOfBirth": 1,
            "monthOfBirth": 1,
            "yearOfBirth": 1990
        });
        let sub: IdentitySubmission = serde_json::from_value(json).unwrap();
        assert_eq!(sub, alice());
    }

    #[test]
    fn rejects_unknown_fields() {
        let json = serde_json::json!({"name": "Alice", "isVerified": true});
        assert!(serde_json::from_value::<IdentitySubmission>(json).is_err());
    }

    #[test]
    fn partial_body_deserializes_and_fails_validation() {
        let sub: IdentitySubmission =
            serde_json::from_value(serde_json::json!({"name": "Alice"})).unwrap();
        assert_eq!(
            sub.validate_at(2026),
            Err(ValidationError::MissingField(IdentityField::Address))
        );
    }
}
