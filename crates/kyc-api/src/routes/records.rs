//! Record ingestion and listing.
//!
//! Every write validates the full identity shape and stores an unverified
//! record. Clients cannot set `isVerified` or `fingerprint`; unknown fields
//! are rejected.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use kyc_core::{IdentitySubmission, KycRecord};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/init", post(init_data))
        .route("/log", post(log_transaction))
        .route("/settlements", get(list_settlements))
        .route("/settlement", post(create_settlement))
}

async fn store_submission(
    state: &AppState,
    body: Result<Json<IdentitySubmission>, JsonRejection>,
) -> Result<KycRecord, AppError> {
    let submission = extract_json(body)?;
    let record = state.workflow.submit(&submission).await?;
    state.metrics.record_created();
    Ok(record)
}

#[utoipa::path(
    post,
    path = "/init",
    request_body = IdentitySubmission,
    responses(
        (status = 200, description = "Record stored", body = String),
        (status = 400, description = "Invalid identity fields", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "records"
)]
pub async fn init_data(
    State(state): State<AppState>,
    body: Result<Json<IdentitySubmission>, JsonRejection>,
) -> Result<&'static str, AppError> {
    store_submission(&state, body).await?;
    Ok("Data initialized")
}

#[utoipa::path(
    post,
    path = "/log",
    request_body = IdentitySubmission,
    responses(
        (status = 200, description = "Record stored", body = String),
        (status = 400, description = "Invalid identity fields", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "records"
)]
pub async fn log_transaction(
    State(state): State<AppState>,
    body: Result<Json<IdentitySubmission>, JsonRejection>,
) -> Result<&'static str, AppError> {
    store_submission(&state, body).await?;
    Ok("Transaction logged")
}

#[utoipa::path(
    get,
    path = "/settlements",
    responses(
        (status = 200, description = "All stored records in insertion order", body = Vec<KycRecord>),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "records"
)]
pub async fn list_settlements(
    State(state): State<AppState>,
) -> Result<Json<Vec<KycRecord>>, AppError> {
    Ok(Json(state.workflow.list().await?))
}

#[utoipa::path(
    post,
    path = "/settlement",
    request_body = IdentitySubmission,
    responses(
        (status = 201, description = "Record created", body = KycRecord),
        (status = 400, description = "Invalid identity fields", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "records"
)]
pub async fn create_settlement(
    State(state): State<AppState>,
    body: Result<Json<IdentitySubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<KycRecord>), AppError> {
    let record = store_submission(&state, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
