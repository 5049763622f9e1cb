//! # Contract ABI Encoding
//!
//! Solidity ABI encoding for the handful of types the KYC registry contract
//! uses: `address`, `uint256`, `string` arguments and a `bool` return value.
//!
//! Static arguments occupy one 32-byte head slot each. A `string` argument's
//! head slot holds the byte offset of its tail, and the tail holds the
//! length followed by the UTF-8 bytes right-padded to a 32-byte boundary.

use sha3::{Digest, Keccak256};

use crate::client::LedgerError;

/// `verifyKYC(address,string,string,string,uint256,uint256,uint256)`.
pub const VERIFY_KYC_SIGNATURE: &str =
    "verifyKYC(address,string,string,string,uint256,uint256,uint256)";

/// `kycVerified(address)`.
pub const KYC_VERIFIED_SIGNATURE: &str = "kycVerified(address)";

const WORD: usize = 32;

/// A single ABI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Address([u8; 20]),
    Uint(u128),
    String(&'a str),
}

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let hash = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// The 4-byte function selector for a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector followed by the encoded arguments.
pub fn encode_call(signature: &str, tokens: &[Token<'_>]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(tokens));
    out
}

/// Head/tail encoding of an argument tuple.
pub fn encode(tokens: &[Token<'_>]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        match token {
            Token::Address(addr) => {
                head.extend_from_slice(&[0u8; 12]);
                head.extend_from_slice(addr);
            }
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::String(s) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                let bytes = s.as_bytes();
                tail.extend_from_slice(&uint_word(bytes.len() as u128));
                tail.extend_from_slice(bytes);
                let padding = (WORD - bytes.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
        }
    }

    head.extend(tail);
    head
}

/// Decode a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, String> {
    if data.len() < WORD {
        return Err(format!("expected 32-byte bool, got {} bytes", data.len()));
    }
    let word = &data[..WORD];
    if word[..WORD - 1].iter().any(|b| *b != 0) || word[WORD - 1] > 1 {
        return Err(format!("not an ABI bool: 0x{}", hex::encode(word)));
    }
    Ok(word[WORD - 1] == 1)
}

/// Parse a 0x-prefixed, 40-hex-digit account address. Checksum casing is not enforced.
pub fn parse_address(addr: &str) -> Result<[u8; 20], LedgerError> {
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .ok_or_else(|| LedgerError::InvalidAddress(addr.to_string()))?;
    if digits.len() != 40 {
        return Err(LedgerError::InvalidAddress(addr.to_string()));
    }
    let mut out = [0u8; 20];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|_| LedgerError::InvalidAddress(addr.to_string()))?;
    Ok(out)
}

/// Whether `addr` is a well-formed account address (0x + 40 hex chars).
pub fn is_valid_eth_address(addr: &str) -> bool {
    parse_address(addr).is_ok()
}

/// Render an address as 0x-prefixed lowercase hex.
pub fn address_hex(addr: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(addr))
}

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
    word
}
