use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use pulpo_shared::schemas::ListResponse;

use super::store_error_response;
use crate::store::users;
use crate::web::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/usuarios", get(list_users))
}

async fn list_users(State(state): State<AppState>) -> Response {
    match users::list_users(&state.store).await {
        Ok(users) => (StatusCode::OK, Json(ListResponse::new(users))).into_response(),
        Err(e) => store_error_response(e, "Airtable API error").into_response(),
    }
}
