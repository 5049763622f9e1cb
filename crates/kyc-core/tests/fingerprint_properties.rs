//! Property tests for identity fingerprints and validation.

use kyc_core::{fingerprint_of, IdentityField, IdentitySubmission, ValidationError};
use proptest::prelude::*;

fn submission(
    address: String,
    name: String,
    id_type: String,
    id_number: String,
    day: i64,
    month: i64,
    year: i64,
) -> IdentitySubmission {
    IdentitySubmission {
        address: Some(address),
        name: Some(name),
        id_type: Some(id_type),
        id_number: Some(id_number),
        day_of_birth: Some(day),
        month_of_birth: Some(month),
        year_of_birth: Some(year),
    }
}

proptest! {
    #[test]
    fn fingerprint_is_independent_of_address(
        addr_a in "0x[0-9a-f]{40}",
        addr_b in "0x[0-9a-f]{40}",
        name in "[A-Za-z]{1,16}",
        id_type in "[a-z-]{1,12}",
        id_number in "[A-Z0-9]{1,12}",
        day in 1i64..=31,
        month in 1i64..=12,
        year in 1900i64..=2020,
    ) {
        let a = submission(addr_a, name.clone(), id_type.clone(), id_number.clone(), day, month, year)
            .validate_at(2026)
            .unwrap();
        let b = submission(addr_b, name, id_type, id_number, day, month, year)
            .validate_at(2026)
            .unwrap();
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn validated_fingerprint_matches_free_function(
        name in "[A-Za-z ]{1,16}[A-Za-z]",
        id_number in "[A-Z0-9]{1,12}",
        day in 1i64..=31,
        month in 1i64..=12,
        year in 1900i64..=2020,
    ) {
        let id = submission("0x1".into(), name.clone(), "passport".into(), id_number.clone(), day, month, year)
            .validate_at(2026)
            .unwrap();
        let expected = fingerprint_of(&name, "passport", &id_number, day as u32, month as u32, year as u32);
        prop_assert_eq!(id.fingerprint(), expected);
        prop_assert_eq!(id.fingerprint().to_hex().len(), 64);
    }

    #[test]
    fn out_of_range_day_is_rejected(day in prop_oneof![i64::MIN..=0, 32i64..=i64::MAX]) {
        let result = submission("0x1".into(), "A".into(), "passport".into(), "1".into(), day, 1, 1990)
            .validate_at(2026);
        prop_assert!(
            matches!(result, Err(ValidationError::OutOfRange { field: IdentityField::DayOfBirth, .. })),
            "expected dayOfBirth out-of-range error"
        );
    }
}
