use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use pulpo_shared::schemas::{ErrorResponse, LoginRequest};
use serde_json::json;
use tracing::{error, info, warn};

use crate::web::AppState;
use crate::web::session::{
    clear_session_cookie, issue_token, now_secs, password_matches, session_cookie,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub(crate) enum LoginOutcome {
    /// `Set-Cookie` value for the new session.
    Granted(String),
    WrongPassword,
    Failed,
}

/// Check the shared password and, on success, sign a fresh session.
pub(crate) fn attempt_login(state: &AppState, password: &str) -> LoginOutcome {
    if !password_matches(state.app_password.as_deref(), password) {
        warn!("login rejected");
        return LoginOutcome::WrongPassword;
    }
    match issue_token(&state.session_secret, now_secs()) {
        Ok(token) => {
            info!("staff session started");
            LoginOutcome::Granted(session_cookie(&token, state.secure_cookies))
        }
        Err(e) => {
            error!(error = %e, "failed to sign session");
            LoginOutcome::Failed
        }
    }
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return server_error();
    };

    let outcome = match body.password() {
        Some(password) => attempt_login(&state, password),
        None => {
            warn!("login rejected: password missing");
            LoginOutcome::WrongPassword
        }
    };

    match outcome {
        LoginOutcome::Granted(cookie) => (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(json!({"success": true})),
        )
            .into_response(),
        LoginOutcome::WrongPassword => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Contraseña incorrecta")),
        )
            .into_response(),
        LoginOutcome::Failed => server_error(),
    }
}

async fn logout(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
        Json(json!({"success": true})),
    )
        .into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Error de servidor")),
    )
        .into_response()
}
