//! # Transaction Signing
//!
//! Legacy (type 0) transactions with EIP-155 replay protection, signed with
//! a secp256k1 key held in memory. The key is parsed once at startup from a
//! hex string and never logged; `Debug` output shows only the derived
//! account address.

use std::fmt;

use k256::ecdsa::{RecoveryId, SigningKey};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::abi::{address_hex, keccak256};
use crate::client::LedgerError;
use crate::rlp;

/// Why a private key string was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("private key must be 64 hex characters, got {len}")]
    WrongLength { len: usize },

    #[error("private key is not valid hex")]
    NotHex,

    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,
}

/// A private key in hex form, checked for shape and scalar range.
///
/// The backing string is wiped on drop.
#[derive(Clone)]
pub struct SigningKeyHex(Zeroizing<String>);

impl SigningKeyHex {
    /// Accepts 64 hex characters with an optional `0x` prefix.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.len() != 64 {
            return Err(KeyError::WrongLength { len: digits.len() });
        }
        let bytes = decode_key(digits)?;
        SigningKey::from_slice(bytes.as_slice()).map_err(|_| KeyError::InvalidScalar)?;
        Ok(Self(Zeroizing::new(digits.to_ascii_lowercase())))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SigningKeyHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKeyHex([REDACTED])")
    }
}

fn decode_key(digits: &str) -> Result<Zeroizing<[u8; 32]>, KeyError> {
    let mut bytes = Zeroizing::new([0u8; 32]);
    hex::decode_to_slice(digits, bytes.as_mut_slice()).map_err(|_| KeyError::NotHex)?;
    Ok(bytes)
}

/// An unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: [u8; 20],
    pub value: u128,
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    fn fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp::encode_uint(u128::from(self.nonce)),
            rlp::encode_uint(self.gas_price),
            rlp::encode_uint(u128::from(self.gas_limit)),
            rlp::encode_bytes(&self.to),
            rlp::encode_uint(self.value),
            rlp::encode_bytes(&self.data),
        ]
    }

    /// Keccak-256 of `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`.
    pub fn signing_hash(&self, chain_id: u64) -> [u8; 32] {
        let mut items = self.fields();
        items.push(rlp::encode_uint(u128::from(chain_id)));
        items.push(rlp::encode_uint(0));
        items.push(rlp::encode_uint(0));
        keccak256(&rlp::encode_list(&items))
    }
}

/// Signs transactions for a single account.
pub struct TransactionSigner {
    key: SigningKey,
    address: [u8; 20],
}

impl TransactionSigner {
    pub fn from_hex(key: &SigningKeyHex) -> Result<Self, KeyError> {
        let bytes = decode_key(key.expose())?;
        let key = SigningKey::from_slice(bytes.as_slice()).map_err(|_| KeyError::InvalidScalar)?;
        let point = key.verifying_key().to_encoded_point(false);
        // Uncompressed SEC1: 0x04 || X || Y.
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Ok(Self { key, address })
    }

    pub fn address(&self) -> [u8; 20] {
        self.address
    }

    pub fn address_hex(&self) -> String {
        address_hex(&self.address)
    }

    /// Sign `tx` for `chain_id` and return the raw RLP bytes for
    /// `eth_sendRawTransaction`.
    pub fn sign_legacy(&self, tx: &LegacyTransaction, chain_id: u64) -> Result<Vec<u8>, LedgerError> {
        let hash = tx.signing_hash(chain_id);
        let (mut signature, mut recid) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| LedgerError::Signing(e.to_string()))?;

        // Nodes reject high-s signatures.
        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
        }

        let v = u128::from(chain_id) * 2 + 35 + u128::from(recid.to_byte() & 1);
        let sig_bytes = signature.to_bytes();
        let (r, s) = sig_bytes.split_at(32);

        let mut items = tx.fields();
        items.push(rlp::encode_uint(v));
        items.push(rlp::encode_bytes(rlp::trim_leading_zeros(r)));
        items.push(rlp::encode_bytes(rlp::trim_leading_zeros(s)));
        Ok(rlp::encode_list(&items))
    }
}

impl fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}
