//! # OpenAPI Specification Assembly
//!
//! Serves the utoipa-generated document at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Static bearer token. Required only when AUTH_TOKEN is set.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KYC Relay API",
        description = "Validates identity submissions, mirrors verifications onto an EVM KYC registry contract, and stores KYC records.\n\nHealth probes, `/metrics` and this document are unauthenticated.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        crate::routes::records::init_data,
        crate::routes::records::log_transaction,
        crate::routes::records::list_settlements,
        crate::routes::records::create_settlement,
        crate::routes::contract::verify_kyc,
        crate::routes::contract::kyc_status,
    ),
    components(
        schemas(
            kyc_core::IdentitySubmission,
            kyc_core::KycRecord,
            crate::workflow::KycStatus,
            crate::workflow::VerificationResult,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "records", description = "Identity ingestion and record listing"),
        (name = "contract", description = "On-chain KYC verification and status"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
