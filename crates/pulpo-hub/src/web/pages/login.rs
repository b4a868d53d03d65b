use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{FormData, bare_page, escape};
use crate::web::AppState;
use crate::web::routes::auth::{LoginOutcome, attempt_login};
use crate::web::session::clear_session_cookie;

pub async fn login_page(RawQuery(query): RawQuery) -> Html<String> {
    let form = FormData::from_query(query.as_deref());
    let error = match form.get("error") {
        Some("servidor") => Some("Error de servidor"),
        Some(_) => Some("Contraseña incorrecta"),
        None => None,
    };
    let error = error
        .map(|e| format!(r#"<p class="form-error">{}</p>"#, escape(e)))
        .unwrap_or_default();

    bare_page(
        "Acceso",
        &format!(
            r#"<main class="login">
<form method="post" action="/login" class="login-card">
<h1>El Pulpo Negro</h1>
<input type="password" name="password" placeholder="Contraseña" required autofocus>
{error}
<button type="submit">Entrar</button>
</form>
</main>"#
        ),
    )
}

pub async fn login_submit(State(state): State<AppState>, body: Bytes) -> Response {
    let form = FormData::parse(&body);
    match attempt_login(&state, form.raw("password").unwrap_or_default()) {
        LoginOutcome::Granted(cookie) => {
            ([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response()
        }
        LoginOutcome::WrongPassword => Redirect::to("/?error=1").into_response(),
        LoginOutcome::Failed => Redirect::to("/?error=servidor").into_response(),
    }
}

pub async fn logout_submit(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
        Redirect::to("/"),
    )
        .into_response()
}
