//! # Ledger Client Interface
//!
//! The workflow treats a verification call as atomic-or-failed: `Ok` means
//! the transaction was accepted by the network, `Err` means nothing was
//! broadcast or the node refused it. No partial on-chain state is assumed.

use async_trait::async_trait;
use kyc_core::ValidatedIdentity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The account identifier is not a 0x-prefixed 20-byte address.
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    /// The RPC endpoint could not be reached or returned a non-success status.
    #[error("ledger unavailable on {network}: {reason}")]
    Unavailable {
        /// Network name.
        network: String,
        /// Failure description.
        reason: String,
    },

    /// The node returned a JSON-RPC error (including reverts during gas estimation).
    #[error("ledger rejected call on {network}: {reason}")]
    Rejected {
        /// Network name.
        network: String,
        /// Error message from the node.
        reason: String,
    },

    /// The node answered with something that could not be interpreted.
    #[error("malformed ledger response on {network}: {reason}")]
    MalformedResponse {
        /// Network name.
        network: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// Transaction signing failed.
    #[error("transaction signing failed: {0}")]
    Signing(String),
}

/// Proof that a verification transaction was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    /// The account that was verified.
    pub address: String,
    /// Transaction hash returned by the network (0x-prefixed hex).
    pub transaction_hash: String,
    /// Network the transaction was sent to.
    pub network: String,
}

/// Submits verification transactions and reads the on-chain verification flag.
#[async_trait]
pub trait LedgerClient: Send + Sync + std::fmt::Debug {
    /// Submit a verification transaction carrying the raw identity fields.
    async fn verify_kyc(&self, identity: &ValidatedIdentity) -> Result<LedgerReceipt, LedgerError>;

    /// Read the verification flag stored on-chain for `address`.
    async fn kyc_status(&self, address: &str) -> Result<bool, LedgerError>;

    /// Human-readable network name, used in logs and receipts.
    fn network(&self) -> &str;
}
