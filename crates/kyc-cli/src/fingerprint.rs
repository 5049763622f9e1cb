//! # Fingerprint Subcommand
//!
//! Computes the SHA-256 identity fingerprint locally, so operators can match
//! a person against stored records without going through the API.

use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;
use kyc_core::{fingerprint_of, Fingerprint, MIN_BIRTH_YEAR};
use serde::Serialize;

/// Arguments for `kyc fingerprint`.
#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Full name as submitted.
    #[arg(long, value_parser = non_blank)]
    pub name: String,
    /// Document kind, e.g. `passport`.
    #[arg(long, value_parser = non_blank)]
    pub id_type: String,
    /// Document number.
    #[arg(long, value_parser = non_blank)]
    pub id_number: String,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: u32,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,
    #[arg(long, value_parser = birth_year)]
    pub year: u32,
    /// Print a JSON object instead of the bare hex digest.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintOutput<'a> {
    name: &'a str,
    id_type: &'a str,
    id_number: &'a str,
    fingerprint: Fingerprint,
}

/// Values are hashed verbatim, as the API does; whitespace only decides emptiness.
fn non_blank(raw: &str) -> Result<String, String> {
    if raw.trim().is_empty() {
        Err("value must not be empty".to_string())
    } else {
        Ok(raw.to_string())
    }
}

fn birth_year(raw: &str) -> Result<u32, String> {
    let year: i64 = raw.parse().map_err(|e| format!("invalid year: {e}"))?;
    let current = i64::from(Utc::now().year());
    if !(MIN_BIRTH_YEAR..=current).contains(&year) {
        return Err(format!("year must be between {MIN_BIRTH_YEAR} and {current}"));
    }
    u32::try_from(year).map_err(|e| format!("invalid year: {e}"))
}

/// Fingerprint for the given arguments.
pub fn compute(args: &FingerprintArgs) -> Fingerprint {
    fingerprint_of(
        &args.name,
        &args.id_type,
        &args.id_number,
        args.day,
        args.month,
        args.year,
    )
}

/// Execute `kyc fingerprint`.
pub fn run_fingerprint(args: &FingerprintArgs) -> Result<u8> {
    let fingerprint = compute(args);
    tracing::debug!(%fingerprint, "computed identity fingerprint");

    if args.json {
        let output = FingerprintOutput {
            name: &args.name,
            id_type: &args.id_type,
            id_number: &args.id_number,
            fingerprint,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{fingerprint}");
    }
    Ok(0)
}
