use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use pulpo_shared::schemas::{DataResponse, ErrorResponse, FieldsRequest, ListResponse};

use super::store_error_response;
use crate::store::items;
use crate::web::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", patch(update_item))
}

async fn list_items(State(state): State<AppState>) -> Response {
    match items::list_items(&state.store).await {
        Ok(items) => (StatusCode::OK, Json(ListResponse::new(items))).into_response(),
        Err(e) => store_error_response(e, "Airtable API error").into_response(),
    }
}

async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<FieldsRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return invalid_body();
    };
    match items::create_item(&state.store, body.fields.unwrap_or_default()).await {
        Ok(record) => (StatusCode::OK, Json(DataResponse::new(record))).into_response(),
        Err(e) => store_error_response(e, "Failed to create item").into_response(),
    }
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<FieldsRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return invalid_body();
    };
    let Some(fields) = body.fields else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing fields to update")),
        )
            .into_response();
    };
    match items::update_item(&state.store, &id, fields).await {
        Ok(record) => (StatusCode::OK, Json(DataResponse::new(record))).into_response(),
        Err(e) => store_error_response(e, "Failed to update item").into_response(),
    }
}

pub(super) fn invalid_body() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("Invalid body")),
    )
        .into_response()
}
