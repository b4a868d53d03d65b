pub mod middleware;
pub mod pages;
pub mod routes;
pub mod session;
pub mod static_files;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::store::Store;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub session_secret: Vec<u8>,
    pub app_password: Option<String>,
    pub secure_cookies: bool,
    pub cors_origins: Vec<String>,
}

/// Build the axum Router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    use tower_http::cors::AllowOrigin;

    let cors_origins = &state.cors_origins;
    let allow_origin = if cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_origin(allow_origin);

    let api_routes = routes::api_router().layer(cors);

    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/assets/{*path}", get(static_files::asset_handler))
        .nest("/api", api_routes)
        .merge(pages::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::session_gate,
        ))
        .with_state(state)
}
