//! # kyc-core: Foundational Types for the KYC Relay
//!
//! Defines the identity data the relay accepts, the rules a submission must
//! satisfy before any external system is contacted, the stored record shape,
//! and the fingerprint that binds a set of identity fields together.
//!
//! ## Key Design Principles
//!
//! 1. **Validation produces a new type.** An [`IdentitySubmission`] is what
//!    arrives on the wire; a [`ValidatedIdentity`] can only be obtained from
//!    [`IdentitySubmission::validate()`]. Anything that talks to the ledger or
//!    the store takes the validated type.
//!
//! 2. **One fingerprint path.** [`fingerprint_of()`] is the only place the
//!    identity preimage is assembled. Field order is fixed: name, idType,
//!    idNumber, dayOfBirth, monthOfBirth, yearOfBirth. The address is never
//!    part of it.
//!
//! 3. **Verification is one-way.** [`KycRecord`] exposes no operation that
//!    clears `isVerified` once set.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kyc-*` crates (this is the leaf of the DAG).
//! - No I/O, no async.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fingerprint;
pub mod identity;
pub mod record;

pub use error::{KycError, ValidationError};
pub use fingerprint::{fingerprint_of, Fingerprint, FINGERPRINT_HEX_LEN};
pub use identity::{IdentityField, IdentitySubmission, ValidatedIdentity, MIN_BIRTH_YEAR};
pub use record::{KycRecord, RecordParts};
