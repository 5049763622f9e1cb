//! # kyc-cli
//!
//! Operator tooling for the KYC relay. Subcommands live in their own modules
//! and return a process exit code; `main.rs` only parses and dispatches.
//!
//! - [`fingerprint`]: compute the identity fingerprint stored on verified records.
//! - [`ledger`]: inspect the configured signer and query on-chain KYC status.

pub mod fingerprint;
pub mod ledger;
