//! Server-rendered pages. UI state (filters, pagination, open dialogs) lives
//! in the query string; forms post back and redirect.

pub mod dashboard;
pub mod inventory;
pub mod login;
pub mod purchases;
pub mod tasks;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};

use crate::web::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(login::login_page))
        .route("/login", post(login::login_submit))
        .route("/logout", post(login::logout_submit))
        .route("/dashboard", get(dashboard::dashboard_page))
        .route("/inventario", get(inventory::inventory_page))
        .route("/inventario/export.csv", get(inventory::export_csv))
        .route("/inventario/export.xlsx", get(inventory::export_xlsx))
        .route("/inventario/items", post(inventory::create_item))
        .route("/inventario/items/{id}", post(inventory::update_item))
        .route(
            "/inventario/items/{id}/desactivar",
            post(inventory::deactivate_item),
        )
        .route("/compras", get(purchases::purchases_page))
        .route("/compras/lista", get(purchases::list_preview))
        .route("/compras/lista.txt", get(purchases::list_download))
        .route("/tareas", get(tasks::tasks_page))
        .route("/tareas/guardar", post(tasks::save_task))
}

/// Decoded `application/x-www-form-urlencoded` pairs. Keys may repeat.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn parse(input: &[u8]) -> Self {
        Self(url::form_urlencoded::parse(input).into_owned().collect())
    }

    pub fn from_query(query: Option<&str>) -> Self {
        Self::parse(query.unwrap_or_default().as_bytes())
    }

    /// First value for `key`, exactly as submitted.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// First value for `key`, trimmed; empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    /// Numeric field; blank or unparseable input reads as 0.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(|v| v.replace(',', ".").parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    pub fn page(&self) -> usize {
        self.get("page").and_then(|p| p.parse().ok()).unwrap_or(1)
    }
}

/// Serialize pairs into a query string, without the leading `?`.
pub(crate) fn query_string<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k.as_ref(), v.as_ref());
    }
    serializer.finish()
}

/// `path` with `query` appended when it is not empty.
pub(crate) fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nav {
    Dashboard,
    Inventory,
    Purchases,
    Tasks,
}

const NAV_LINKS: [(Nav, &str, &str); 4] = [
    (Nav::Dashboard, "Dashboard", "/dashboard"),
    (Nav::Inventory, "Inventario", "/inventario"),
    (Nav::Purchases, "Compras", "/compras"),
    (Nav::Tasks, "Tareas", "/tareas"),
];

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · El Pulpo Negro</title>
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// Dashboard shell: sidebar navigation, page header and content.
pub(crate) fn shell(active: Nav, content: &str) -> Html<String> {
    let mut nav = String::new();
    let mut title = "Dashboard";
    for (item, name, href) in NAV_LINKS {
        let class = if item == active {
            title = name;
            "nav-link active"
        } else {
            "nav-link"
        };
        nav.push_str(&format!(r#"<a class="{class}" href="{href}">{name}</a>"#));
    }
    let body = format!(
        r#"<div class="app">
<aside class="sidebar">
<div class="brand">El Pulpo Negro</div>
<nav>{nav}</nav>
<form method="post" action="/logout" class="logout"><button type="submit">Cerrar Sesión</button></form>
</aside>
<div class="main">
<header class="page-header"><h1>{title}</h1></header>
<main>{content}</main>
</div>
</div>"#
    );
    Html(document(title, &body))
}

pub(crate) fn bare_page(title: &str, body: &str) -> Html<String> {
    Html(document(title, body))
}

pub(crate) fn error_banner(message: &str) -> String {
    format!(r#"<div class="error-banner">{}</div>"#, escape(message))
}

/// CSS class for a stock status badge.
pub(crate) fn stock_badge(status: &str) -> &'static str {
    match status {
        "DÉFICIT" => "badge red",
        "EXCESO" => "badge amber",
        _ => "badge green",
    }
}

/// CSS class for an alert level badge.
pub(crate) fn alert_badge(level: &str) -> &'static str {
    match level {
        "AGOTADO" => "badge red",
        "URGENTE" => "badge amber",
        "PRONTO" => "badge blue",
        "OK" => "badge green",
        _ => "badge muted",
    }
}

/// File download with an `attachment` disposition.
pub(crate) fn download(
    content_type: &'static str,
    filename: &str,
    body: impl IntoResponse,
) -> Response {
    match HeaderValue::from_str(&content_disposition(filename)) {
        Ok(disposition) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "invalid file name").into_response(),
    }
}

/// `attachment` disposition with an ASCII fallback name and the exact name
/// percent-encoded in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::new();
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
