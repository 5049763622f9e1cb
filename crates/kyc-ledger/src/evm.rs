//! # EVM JSON-RPC Ledger Client
//!
//! Talks to the KYC registry contract over plain JSON-RPC 2.0.
//!
//! ## Verification
//!
//! 1. ABI-encode `verifyKYC(...)` with the raw identity fields.
//! 2. Fetch the signer's pending nonce (`eth_getTransactionCount`) and the
//!    current gas price (`eth_gasPrice`).
//! 3. `eth_estimateGas` for the call. A revert surfaces here as a JSON-RPC
//!    error, so nothing is broadcast for calls the contract would refuse.
//! 4. Sign an EIP-155 legacy transaction locally and send it with
//!    `eth_sendRawTransaction`. The returned hash is the receipt.
//!
//! The client does not wait for the transaction to be mined.
//!
//! ## Status
//!
//! `eth_call` of `kycVerified(address)` against the latest block.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kyc_core::ValidatedIdentity;
use serde_json::{json, Value};
use url::Url;

use crate::abi::{self, Token, KYC_VERIFIED_SIGNATURE, VERIFY_KYC_SIGNATURE};
use crate::client::{LedgerClient, LedgerError, LedgerReceipt};
use crate::config::{EvmLedgerConfig, SEPOLIA_CHAIN_ID};
use crate::signer::{LegacyTransaction, TransactionSigner};

/// [`LedgerClient`] backed by an EVM JSON-RPC endpoint.
#[derive(Debug)]
pub struct EvmLedgerClient {
    client: reqwest::Client,
    rpc_url: Url,
    contract: [u8; 20],
    signer: TransactionSigner,
    chain_id: u64,
    network: String,
    next_id: AtomicU64,
}

impl EvmLedgerClient {
    pub fn new(config: EvmLedgerConfig) -> Result<Self, LedgerError> {
        let network = network_name(config.chain_id);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LedgerError::Unavailable {
                network: network.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        let contract = abi::parse_address(&config.contract_address)?;
        let signer = TransactionSigner::from_hex(&config.signing_key)
            .map_err(|e| LedgerError::Signing(e.to_string()))?;

        tracing::info!(
            network = %network,
            contract = %abi::address_hex(&contract),
            sender = %signer.address_hex(),
            "EVM ledger client configured"
        );

        Ok(Self {
            client,
            rpc_url: config.rpc_url,
            contract,
            signer,
            chain_id: config.chain_id,
            network,
            next_id: AtomicU64::new(1),
        })
    }

    /// The account verification transactions are sent from.
    pub fn sender_address(&self) -> String {
        self.signer.address_hex()
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let resp = self
            .client
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("{method}: request timed out")
                } else {
                    format!("{method}: {e}")
                };
                self.unavailable(reason)
            })?;

        if !resp.status().is_success() {
            return Err(self.unavailable(format!("{method}: HTTP {}", resp.status())));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| self.malformed(format!("{method}: invalid JSON response: {e}")))?;

        if let Some(error) = json.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(LedgerError::Rejected {
                network: self.network.clone(),
                reason: format!("{method}: {msg}"),
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| self.malformed(format!("{method}: response missing 'result' field")))
    }

    async fn quantity(&self, method: &str, params: Value) -> Result<u128, LedgerError> {
        let result = self.rpc_call(method, params).await?;
        result
            .as_str()
            .and_then(parse_quantity)
            .ok_or_else(|| self.malformed(format!("{method}: expected hex quantity, got {result}")))
    }

    fn unavailable(&self, reason: String) -> LedgerError {
        LedgerError::Unavailable {
            network: self.network.clone(),
            reason,
        }
    }

    fn malformed(&self, reason: String) -> LedgerError {
        LedgerError::MalformedResponse {
            network: self.network.clone(),
            reason,
        }
    }
}

#[async_trait]
impl LedgerClient for EvmLedgerClient {
    async fn verify_kyc(&self, identity: &ValidatedIdentity) -> Result<LedgerReceipt, LedgerError> {
        let subject = abi::parse_address(identity.address())?;
        let data = abi::encode_call(
            VERIFY_KYC_SIGNATURE,
            &[
                Token::Address(subject),
                Token::String(identity.name()),
                Token::String(identity.id_type()),
                Token::String(identity.id_number()),
                Token::Uint(u128::from(identity.day_of_birth())),
                Token::Uint(u128::from(identity.month_of_birth())),
                Token::Uint(u128::from(identity.year_of_birth())),
            ],
        );

        let from = self.signer.address_hex();
        let to = abi::address_hex(&self.contract);
        let data_hex = format!("0x{}", hex::encode(&data));

        let nonce = self
            .quantity("eth_getTransactionCount", json!([from, "pending"]))
            .await?;
        let nonce = u64::try_from(nonce)
            .map_err(|_| self.malformed(format!("nonce out of range: {nonce}")))?;
        let gas_price = self.quantity("eth_gasPrice", json!([])).await?;
        let gas_limit = self
            .quantity(
                "eth_estimateGas",
                json!([{ "from": from, "to": to, "data": data_hex }]),
            )
            .await?;
        let gas_limit = u64::try_from(gas_limit)
            .map_err(|_| self.malformed(format!("gas estimate out of range: {gas_limit}")))?;

        tracing::debug!(nonce, gas_price = %gas_price, gas_limit, "signing verifyKYC transaction");

        let tx = LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: self.contract,
            value: 0,
            data,
        };
        let raw = self.signer.sign_legacy(&tx, self.chain_id)?;

        let result = self
            .rpc_call(
                "eth_sendRawTransaction",
                json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        let transaction_hash = result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.malformed("eth_sendRawTransaction returned non-string result".into()))?;

        tracing::info!(
            network = %self.network,
            address = %identity.address(),
            tx_hash = %transaction_hash,
            "verifyKYC transaction broadcast"
        );

        Ok(LedgerReceipt {
            address: identity.address().to_string(),
            transaction_hash,
            network: self.network.clone(),
        })
    }

    async fn kyc_status(&self, address: &str) -> Result<bool, LedgerError> {
        let subject = abi::parse_address(address)?;
        let data = abi::encode_call(KYC_VERIFIED_SIGNATURE, &[Token::Address(subject)]);
        let call = json!({
            "to": abi::address_hex(&self.contract),
            "data": format!("0x{}", hex::encode(data)),
        });

        let result = self.rpc_call("eth_call", json!([call, "latest"])).await?;
        let encoded = result
            .as_str()
            .ok_or_else(|| self.malformed(format!("eth_call: expected hex string, got {result}")))?;
        let bytes = hex::decode(encoded.trim_start_matches("0x"))
            .map_err(|e| self.malformed(format!("eth_call: invalid hex: {e}")))?;
        abi::decode_bool(&bytes).map_err(|e| self.malformed(format!("eth_call: {e}")))
    }

    fn network(&self) -> &str {
        &self.network
    }
}

fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "ethereum".to_string(),
        SEPOLIA_CHAIN_ID => "sepolia".to_string(),
        other => format!("evm-{other}"),
    }
}

/// Parse a JSON-RPC hex quantity such as `0x1a`.
fn parse_quantity(s: &str) -> Option<u128> {
    let digits = s.strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}
