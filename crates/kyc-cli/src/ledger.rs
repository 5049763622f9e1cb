//! # Ledger Subcommand
//!
//! Read-only access to the configured verification contract. Configuration
//! comes from the same `LEDGER_*` environment variables the API server reads,
//! so `kyc ledger signer` is a quick way to check a deployment's settings
//! before starting the server.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kyc_ledger::{EvmLedgerClient, EvmLedgerConfig, LedgerClient};
use serde::Serialize;

/// Arguments for `kyc ledger`.
#[derive(Args, Debug)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// Show the sender account, network and contract derived from the environment.
    Signer,

    /// Query the on-chain KYC flag for an address.
    Status {
        /// Account address (0x-prefixed, 40 hex characters).
        address: String,
        /// Exit with status 2 when the address is not verified.
        #[arg(long)]
        require_verified: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerReport {
    pub sender: String,
    pub network: String,
    pub chain_id: u64,
    pub contract: String,
    pub rpc_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub address: String,
    pub kyc_status: bool,
    pub network: String,
}

/// Describe the signer and contract a configuration resolves to.
pub fn signer_report(config: EvmLedgerConfig) -> Result<SignerReport> {
    let chain_id = config.chain_id;
    let contract = config.contract_address.clone();
    let rpc_url = config.rpc_url.to_string();
    let client = EvmLedgerClient::new(config).context("failed to build ledger client")?;

    Ok(SignerReport {
        sender: client.sender_address(),
        network: client.network().to_string(),
        chain_id,
        contract,
        rpc_url,
    })
}

/// Read the verification flag for `address`.
pub async fn status_report(config: EvmLedgerConfig, address: &str) -> Result<StatusReport> {
    let client = EvmLedgerClient::new(config).context("failed to build ledger client")?;
    let kyc_status = client
        .kyc_status(address)
        .await
        .with_context(|| format!("kycVerified({address}) failed"))?;

    Ok(StatusReport {
        address: address.to_string(),
        kyc_status,
        network: client.network().to_string(),
    })
}

/// Execute `kyc ledger`.
pub fn run_ledger(args: &LedgerArgs) -> Result<u8> {
    let config = EvmLedgerConfig::from_env().context("invalid ledger configuration")?;

    match &args.command {
        LedgerCommand::Signer => {
            let report = signer_report(config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(0)
        }
        LedgerCommand::Status {
            address,
            require_verified,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let report = runtime.block_on(status_report(config, address))?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if *require_verified && !report.kyc_status {
                tracing::warn!(address = %report.address, "address is not KYC verified");
                return Ok(2);
            }
            Ok(0)
        }
    }
}
