//! # kyc-api: HTTP Boundary for the KYC Relay
//!
//! Accepts identity submissions, runs the verification workflow against the
//! ledger client, and stores KYC records.
//!
//! ## API Surface
//!
//! | Route | Module | Auth |
//! |---|---|---|
//! | `POST /init`, `POST /log`, `GET /settlements`, `POST /settlement` | [`routes::records`] | bearer (optional) |
//! | `POST /contract/verifyKYC`, `GET /contract/kycStatus/{address}` | [`routes::contract`] | bearer (optional) |
//! | `GET /health/liveness`, `GET /health/readiness` | here | none |
//! | `GET /metrics` | here | none |
//! | `GET /openapi.json` | [`openapi`] | none |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CORS → SetHeader(CSP) → TraceLayer → Metrics → Auth → BodyLimit → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;
pub mod workflow;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; font-src 'self'";

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::records::router())
        .merge(routes::contract::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(auth::auth_middleware))
        .layer(Extension(state.auth.clone()));

    let unauthenticated = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(prometheus_metrics))
        .merge(openapi::router());

    Router::new()
        .merge(unauthenticated)
        .merge(api)
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(Extension(state.metrics.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.workflow.store_ready().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!("Document store health check failed: {e}");
            error::AppError::ServiceUnavailable("document store unreachable".into()).into_response()
        }
    }
}

async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
