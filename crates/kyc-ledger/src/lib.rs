//! # kyc-ledger: Ledger Client
//!
//! The relay mirrors every successful verification onto a KYC registry
//! contract on an EVM chain. This crate is the only place that talks to
//! that chain.
//!
//! ## Architecture
//!
//! [`LedgerClient`] is the seam the workflow depends on. Two implementations:
//!
//! - [`EvmLedgerClient`]: JSON-RPC over HTTPS. Calls
//!   `verifyKYC(address,string,string,string,uint256,uint256,uint256)` with
//!   the raw identity fields and reads `kycVerified(address)`. Transactions
//!   are signed locally with the configured secp256k1 key and broadcast with
//!   `eth_sendRawTransaction`.
//! - [`MockLedgerClient`]: in-process double that remembers which addresses
//!   it has verified.
//!
//! Encoding helpers live in [`abi`] and [`rlp`]; key handling and
//! transaction signing live in [`signer`].

pub mod abi;
pub mod client;
pub mod config;
pub mod evm;
pub mod mock;
pub mod rlp;
pub mod signer;

pub use client::{LedgerClient, LedgerError, LedgerReceipt};
pub use config::{ConfigError, EvmLedgerConfig, SEPOLIA_CHAIN_ID};
pub use evm::EvmLedgerClient;
pub use mock::MockLedgerClient;
pub use signer::{KeyError, LegacyTransaction, SigningKeyHex, TransactionSigner};
