//! Contract-facing routes: verification and on-chain status.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use kyc_core::IdentitySubmission;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::VerificationOutcome;
use crate::state::AppState;
use crate::workflow::{KycStatus, WorkflowError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contract/verifyKYC", post(verify_kyc))
        .route("/contract/kycStatus/{address}", get(kyc_status))
}

/// Verify an identity on-chain and store a verified record.
#[utoipa::path(
    post,
    path = "/contract/verifyKYC",
    request_body = IdentitySubmission,
    responses(
        (status = 200, description = "`KYC verified for address {address}`", body = String),
        (status = 400, description = "Missing, empty or out-of-range field", body = crate::error::ErrorBody),
        (status = 500, description = "Ledger or store failure", body = crate::error::ErrorBody),
    ),
    tag = "contract"
)]
pub async fn verify_kyc(
    State(state): State<AppState>,
    body: Result<Json<IdentitySubmission>, JsonRejection>,
) -> Result<String, AppError> {
    let submission = extract_json(body).map_err(|e| {
        if matches!(e, AppError::InvalidInput(_)) {
            state
                .metrics
                .record_verification(VerificationOutcome::InvalidInput);
        }
        e
    })?;

    match state.workflow.verify(&submission).await {
        Ok(result) => {
            state.metrics.record_verification(VerificationOutcome::Verified);
            state.metrics.record_created();
            Ok(result.confirmation)
        }
        Err(err) => {
            let outcome = match &err {
                WorkflowError::InvalidInput(_) => VerificationOutcome::InvalidInput,
                WorkflowError::LedgerCallFailed(_) => VerificationOutcome::LedgerFailed,
                WorkflowError::PersistenceFailed(_) => VerificationOutcome::PersistenceFailed,
            };
            state.metrics.record_verification(outcome);
            Err(err.into())
        }
    }
}

/// Read the verification flag stored on-chain for an address.
#[utoipa::path(
    get,
    path = "/contract/kycStatus/{address}",
    params(("address" = String, Path, description = "Account address (0x-prefixed)")),
    responses(
        (status = 200, description = "On-chain verification flag", body = KycStatus),
        (status = 500, description = "Ledger failure", body = crate::error::ErrorBody),
    ),
    tag = "contract"
)]
pub async fn kyc_status(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<KycStatus>, AppError> {
    Ok(Json(state.workflow.kyc_status(&address).await?))
}
