use axum::{
    Json,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use pulpo_shared::schemas::ErrorResponse;

use crate::web::AppState;
use crate::web::session::has_valid_session;

/// Session gate for every route.
///
/// Pages without a session bounce to the login page at `/`, and a signed-in
/// visit to `/` goes on to the dashboard. API routes outside `/api/auth/`
/// answer 401 instead of redirecting.
pub async fn session_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();

    // CORS preflights never carry the cookie.
    if req.method() == Method::OPTIONS
        || path == "/health"
        || path.starts_with("/assets/")
        || path.starts_with("/api/auth/")
    {
        return next.run(req).await;
    }

    let signed_in = has_valid_session(&state.session_secret, req.headers());

    if path == "/api" || path.starts_with("/api/") {
        if signed_in {
            return next.run(req).await;
        }
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("No autorizado")),
        )
            .into_response();
    }

    match (path.as_str(), signed_in) {
        ("/", true) => Redirect::to("/dashboard").into_response(),
        ("/" | "/login", false) => next.run(req).await,
        (_, false) => Redirect::to("/").into_response(),
        (_, true) => next.run(req).await,
    }
}
