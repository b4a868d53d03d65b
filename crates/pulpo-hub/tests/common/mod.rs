#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use pulpo_hub::config::AirtableSettings;
use pulpo_hub::store::Store;
use pulpo_hub::web::{AppState, build_router};
use serde_json::{Value, json};

pub const PASSWORD: &str = "pulpo-secreto";
pub const PAGE_SIZE: usize = 2;

/// In-memory stand-in for the hosted record store. Lists are served
/// `PAGE_SIZE` records at a time so pagination is always exercised.
#[derive(Clone, Default)]
pub struct FakeAirtable {
    pub tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    pub created: Arc<Mutex<Vec<(String, Value)>>>,
    pub patched: Arc<Mutex<Vec<(String, String, Value)>>>,
    pub list_calls: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakeAirtable {
    pub fn seed(&self, table: &str, records: Vec<Value>) {
        self.tables.lock().unwrap().insert(table.to_string(), records);
    }

    pub fn record(&self, table: &str, id: &str) -> Option<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)?
            .iter()
            .find(|r| r["id"] == id)
            .cloned()
    }
}

/// `{activo} = TRUE()` style formulas; anything else matches every record.
fn formula_matches(formula: Option<&String>, record: &Value) -> bool {
    let Some(formula) = formula else { return true };
    let field = formula
        .trim_start_matches('{')
        .split('}')
        .next()
        .unwrap_or_default();
    record["fields"][field] == Value::Bool(true)
}

async fn list(
    State(fake): State<FakeAirtable>,
    Path((_, table)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    fake.list_calls.lock().unwrap().push(query.clone());
    let records: Vec<Value> = fake
        .tables
        .lock()
        .unwrap()
        .get(&table)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|r| formula_matches(query.get("filterByFormula"), r))
        .collect();
    let start: usize = query
        .get("offset")
        .and_then(|o| o.parse().ok())
        .unwrap_or(0);
    let end = (start + PAGE_SIZE).min(records.len());
    let page = records[start.min(end)..end].to_vec();
    if end < records.len() {
        Json(json!({"records": page, "offset": end.to_string()}))
    } else {
        Json(json!({"records": page}))
    }
}

async fn create(
    State(fake): State<FakeAirtable>,
    Path((_, table)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let fields = body["records"][0]["fields"].clone();
    fake.created.lock().unwrap().push((table.clone(), fields.clone()));
    let mut tables = fake.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();
    let record = json!({"id": format!("recNew{}", rows.len()), "fields": fields});
    rows.push(record.clone());
    Json(json!({"records": [record]}))
}

async fn fetch(
    State(fake): State<FakeAirtable>,
    Path((_, table, id)): Path<(String, String, String)>,
) -> (StatusCode, Json<Value>) {
    match fake.record(&table, &id) {
        Some(record) => (StatusCode::OK, Json(record)),
        None => not_found(),
    }
}

async fn update(
    State(fake): State<FakeAirtable>,
    Path((_, table, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let fields = body["fields"].clone();
    fake.patched
        .lock()
        .unwrap()
        .push((table.clone(), id.clone(), fields.clone()));
    let mut tables = fake.tables.lock().unwrap();
    let Some(record) = tables
        .get_mut(&table)
        .and_then(|rows| rows.iter_mut().find(|r| r["id"] == id))
    else {
        return not_found();
    };
    if let (Some(current), Some(changes)) = (record["fields"].as_object_mut(), fields.as_object())
    {
        for (k, v) in changes {
            current.insert(k.clone(), v.clone());
        }
    }
    (StatusCode::OK, Json(record.clone()))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"type": "NOT_FOUND", "message": "Could not find record"}})),
    )
}

pub struct TestHub {
    pub base: String,
    pub fake: FakeAirtable,
    pub http: reqwest::Client,
}

impl TestHub {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Sign in through the JSON route and return the `Cookie` header value.
    pub async fn login(&self) -> String {
        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({"password": PASSWORD}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        session_cookie(&resp).expect("login sets a session cookie")
    }
}

/// `name=value` part of the response's `Set-Cookie` header.
pub fn session_cookie(resp: &reqwest::Response) -> Option<String> {
    let header = resp.headers().get("set-cookie")?.to_str().ok()?;
    header.split(';').next().map(str::to_string)
}

pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

pub fn configured(api_url: &str) -> AirtableSettings {
    AirtableSettings {
        api_key: Some("keyTest".into()),
        api_url: api_url.to_string(),
        inventory_base: Some("appInv".into()),
        items_table: Some("Items".into()),
        tasks_base: Some("appTasks".into()),
        tasks_table: Some("Tareas".into()),
    }
}

/// Start a fake record store and a hub pointed at it.
pub async fn start() -> TestHub {
    start_with(configured).await
}

pub async fn start_with(settings: impl FnOnce(&str) -> AirtableSettings) -> TestHub {
    let fake = FakeAirtable::default();
    let airtable = Router::new()
        .route("/v0/{base}/{table}", get(list).post(create))
        .route("/v0/{base}/{table}/{id}", get(fetch).patch(update))
        .with_state(fake.clone());
    let api_url = format!("{}/v0", serve(airtable).await);

    let state = AppState {
        store: Arc::new(Store::new(&settings(&api_url))),
        session_secret: b"0123456789abcdef0123456789abcdef".to_vec(),
        app_password: Some(PASSWORD.into()),
        secure_cookies: false,
        cors_origins: vec!["http://localhost:3000".into()],
    };
    let base = serve(build_router(state)).await;

    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    TestHub { base, fake, http }
}

pub fn item(id: &str, name: &str, fields: Value) -> Value {
    let mut record = json!({"id": id, "fields": {"nombre": name, "activo": true}});
    if let (Some(target), Some(extra)) = (record["fields"].as_object_mut(), fields.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    record
}
