pub mod auth;
pub mod items;
pub mod tasks;
pub mod users;

use axum::{Json, Router, http::StatusCode};
use pulpo_infra::AirtableError;
use pulpo_shared::schemas::ErrorResponse;
use tracing::error;

use crate::store::StoreError;
use crate::web::AppState;

/// Build the /api router (session middleware applied externally).
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(items::router())
        .merge(tasks::router())
        .merge(users::router())
}

/// Map a record-store failure to the proxy's error envelope. Upstream
/// errors keep the store's status and body; `upstream_error` names the
/// failed operation.
pub(crate) fn store_error_response(
    err: StoreError,
    upstream_error: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        StoreError::NotConfigured => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Missing Airtable configuration")),
        ),
        StoreError::Airtable(AirtableError::Upstream { status, details }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(ErrorResponse::new(upstream_error).with_details(details)),
        ),
        StoreError::Airtable(e) => {
            error!(error = %e, "record store call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal Server Error")),
            )
        }
    }
}
