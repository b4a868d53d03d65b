use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use pulpo_shared::schemas::{DataResponse, ErrorResponse, FieldsRequest, ListResponse};

use super::items::invalid_body;
use super::store_error_response;
use crate::store::tasks;
use crate::web::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tareas", get(list_tasks).post(create_task))
        .route("/tareas/{id}", patch(update_task))
}

async fn list_tasks(State(state): State<AppState>) -> Response {
    match tasks::list_tasks(&state.store).await {
        Ok(tasks) => (StatusCode::OK, Json(ListResponse::new(tasks))).into_response(),
        Err(e) => store_error_response(e, "Airtable API error").into_response(),
    }
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<FieldsRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return invalid_body();
    };
    match tasks::create_task(&state.store, body.fields.unwrap_or_default()).await {
        Ok(record) => (StatusCode::OK, Json(DataResponse::new(record))).into_response(),
        Err(e) => store_error_response(e, "Failed to create task").into_response(),
    }
}

async fn update_task(
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
    match tasks::update_task(&state.store, &id, fields).await {
        Ok(record) => (StatusCode::OK, Json(DataResponse::new(record))).into_response(),
        Err(e) => store_error_response(e, "Failed to update task").into_response(),
    }
}
