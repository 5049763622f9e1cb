//! # API Error Types
//!
//! Maps workflow errors to HTTP status codes and a JSON error body.
//! Ledger and persistence failures are logged in full but returned to the
//! caller with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::workflow::WorkflowError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `INVALID_INPUT`.
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, empty or out-of-range field, or an unparseable body (400).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Request body over the configured limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Missing or wrong bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The ledger rejected the call or could not be reached (500).
    #[error("ledger call failed: {0}")]
    LedgerCallFailed(String),

    /// The document store write or read failed (500).
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// A dependency is not ready (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::LedgerCallFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_CALL_FAILED"),
            Self::PersistenceFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILED")
            }
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::LedgerCallFailed(_) => "Failed to verify KYC".to_string(),
            Self::PersistenceFailed(_) => "Failed to access KYC records".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::LedgerCallFailed(_) | Self::PersistenceFailed(_) => {
                tracing::error!(error = %self, "request failed")
            }
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidInput(e) => Self::InvalidInput(e.to_string()),
            WorkflowError::LedgerCallFailed(e) => Self::LedgerCallFailed(e.to_string()),
            WorkflowError::PersistenceFailed(e) => Self::PersistenceFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use kyc_core::{IdentityField, ValidationError};
    use kyc_ledger::LedgerError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_codes() {
        let cases = [
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            (
                AppError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
            ),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AppError::LedgerCallFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_CALL_FAILED",
            ),
            (
                AppError::PersistenceFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_FAILED",
            ),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[tokio::test]
    async fn invalid_input_message_names_the_field() {
        let err: AppError =
            WorkflowError::InvalidInput(ValidationError::MissingField(IdentityField::IdNumber)).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["message"].as_str().unwrap().contains("idNumber"));
    }

    #[tokio::test]
    async fn ledger_failure_detail_is_not_exposed() {
        let err: AppError = WorkflowError::LedgerCallFailed(LedgerError::Unavailable {
            network: "sepolia".into(),
            reason: "connect to 10.0.0.7:8545 refused".into(),
        })
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Failed to verify KYC");
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn persistence_failure_detail_is_not_exposed() {
        let (status, body) = body_json(AppError::PersistenceFailed("password=hunter2".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("hunter2"));
    }
}
