use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use pulpo_shared::schemas::{
    CreateRecordsRequest, CreateRecordsResponse, NewRecord, Record, RecordPage,
    UpdateRecordRequest,
};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// A table inside a base. `table` may be a table id or its literal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub base_id: String,
    pub table: String,
}

impl TableRef {
    pub fn new(base_id: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_id, self.table)
    }
}

#[derive(Debug)]
pub enum AirtableError {
    /// The store answered with a non-success status. `details` is its body,
    /// decoded as JSON when possible.
    Upstream { status: u16, details: Value },
    Transport(reqwest::Error),
    InvalidUrl(String),
    /// A create call succeeded but echoed no record back.
    EmptyResponse,
}

impl fmt::Display for AirtableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream { status, details } => {
                write!(f, "record store responded {status}: {details}")
            }
            Self::Transport(e) => write!(f, "record store request failed: {e}"),
            Self::InvalidUrl(url) => write!(f, "invalid record store URL: {url}"),
            Self::EmptyResponse => f.write_str("record store returned no records"),
        }
    }
}

impl std::error::Error for AirtableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AirtableError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

/// Bearer-token REST client for the record store.
///
/// Every call goes straight to the store; nothing is cached.
#[derive(Clone)]
pub struct AirtableClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: String,
}

impl AirtableClient {
    pub fn new(api_key: impl Into<String>, api_url: &str) -> Result<Self, AirtableError> {
        let api_url =
            Url::parse(api_url).map_err(|_| AirtableError::InvalidUrl(api_url.to_string()))?;
        if api_url.cannot_be_a_base() {
            return Err(AirtableError::InvalidUrl(api_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            api_url,
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: &TableRef, record_id: Option<&str>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&table.base_id).push(&table.table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }
        url
    }

    /// Fetch every record of `table`, following `offset` tokens until the
    /// store stops returning one.
    pub async fn list_records(
        &self,
        table: &TableRef,
        filter_formula: Option<&str>,
    ) -> Result<Vec<Record>, AirtableError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut url = self.table_url(table, None);
            {
                let mut query = url.query_pairs_mut();
                if let Some(formula) = filter_formula {
                    query.append_pair("filterByFormula", formula);
                }
                if let Some(ref token) = offset {
                    query.append_pair("offset", token);
                }
            }

            let resp = self
                .http
                .get(url)
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            let page: RecordPage = read_json(resp).await?;
            pages += 1;
            records.extend(page.records);

            match page.offset {
                Some(next) if !next.is_empty() => offset = Some(next),
                _ => break,
            }
        }

        debug!(table = %table, pages, count = records.len(), "listed records");
        Ok(records)
    }

    pub async fn get_record(
        &self,
        table: &TableRef,
        record_id: &str,
    ) -> Result<Record, AirtableError> {
        let resp = self
            .http
            .get(self.table_url(table, Some(record_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn create_record(
        &self,
        table: &TableRef,
        fields: Map<String, Value>,
    ) -> Result<Record, AirtableError> {
        let body = CreateRecordsRequest {
            records: vec![NewRecord { fields }],
        };
        let resp = self
            .http
            .post(self.table_url(table, None))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let created: CreateRecordsResponse = read_json(resp).await?;
        let record = created
            .records
            .into_iter()
            .next()
            .ok_or(AirtableError::EmptyResponse)?;
        debug!(table = %table, id = %record.id, "created record");
        Ok(record)
    }

    pub async fn update_record(
        &self,
        table: &TableRef,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, AirtableError> {
        let resp = self
            .http
            .patch(self.table_url(table, Some(record_id)))
            .bearer_auth(&self.api_key)
            .json(&UpdateRecordRequest { fields })
            .send()
            .await?;
        let record: Record = read_json(resp).await?;
        debug!(table = %table, id = %record.id, "updated record");
        Ok(record)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, AirtableError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let details = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(AirtableError::Upstream {
            status: status.as_u16(),
            details,
        });
    }
    Ok(resp.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, patch},
    };
    use serde_json::json;

    #[derive(Clone, Default)]
    struct Seen {
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
        bodies: Arc<Mutex<Vec<Value>>>,
        auth: Arc<Mutex<Vec<String>>>,
    }

    async fn list(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        seen.auth.lock().unwrap().push(auth);
        let page = q.get("offset").cloned();
        seen.queries.lock().unwrap().push(q);
        match page.as_deref() {
            None => Json(json!({"records": [{"id": "rec1", "fields": {}}], "offset": "itr2"})),
            Some("itr2") => Json(json!({"records": [{"id": "rec2", "fields": {}}]})),
            Some(_) => Json(json!({"records": []})),
        }
    }

    async fn create(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
        seen.bodies.lock().unwrap().push(body.clone());
        let fields = body["records"][0]["fields"].clone();
        Json(json!({"records": [{"id": "recNew", "fields": fields}]}))
    }

    async fn update(Path((_, _, id)): Path<(String, String, String)>) -> (StatusCode, Json<Value>) {
        if id == "recMissing" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"type": "NOT_FOUND"}})),
            );
        }
        (StatusCode::OK, Json(json!({"id": id, "fields": {"activo": false}})))
    }

    async fn fake_store() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/v0/{base}/{table}", get(list).post(create))
            .route("/v0/{base}/{table}/{id}", patch(update))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{addr}/v0"), seen)
    }

    #[tokio::test]
    async fn list_follows_offset_pages() {
        let (api, seen) = fake_store().await;
        let client = AirtableClient::new("key123", &api).unwrap();
        let table = TableRef::new("appBase", "tblItems");

        let records = client
            .list_records(&table, Some("{activo} = TRUE()"))
            .await
            .unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2"]);

        let queries = seen.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0]["filterByFormula"], "{activo} = TRUE()");
        assert!(!queries[0].contains_key("offset"));
        assert_eq!(queries[1]["offset"], "itr2");
        assert!(seen.auth.lock().unwrap().iter().all(|a| a == "Bearer key123"));
    }

    #[tokio::test]
    async fn create_wraps_fields_and_returns_first_record() {
        let (api, seen) = fake_store().await;
        let client = AirtableClient::new("key", &api).unwrap();
        let mut fields = Map::new();
        fields.insert("nombre".into(), json!("Limones"));

        let record = client
            .create_record(&TableRef::new("appBase", "tblItems"), fields)
            .await
            .unwrap();

        assert_eq!(record.id, "recNew");
        assert_eq!(record.fields["nombre"], "Limones");
        let bodies = seen.bodies.lock().unwrap();
        assert_eq!(bodies[0], json!({"records": [{"fields": {"nombre": "Limones"}}]}));
    }

    #[tokio::test]
    async fn upstream_errors_keep_status_and_body() {
        let (api, _) = fake_store().await;
        let client = AirtableClient::new("key", &api).unwrap();

        let err = client
            .update_record(&TableRef::new("appBase", "tblItems"), "recMissing", Map::new())
            .await
            .unwrap_err();

        match err {
            AirtableError::Upstream { status, details } => {
                assert_eq!(status, 404);
                assert_eq!(details["error"]["type"], "NOT_FOUND");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn table_names_are_path_encoded() {
        let client = AirtableClient::new("key", "https://api.airtable.com/v0/").unwrap();
        let url = client.table_url(&TableRef::new("appX", "Mis Tareas"), Some("rec1"));
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appX/Mis%20Tareas/rec1");
    }

    #[test]
    fn rejects_unparseable_api_url() {
        assert!(matches!(
            AirtableClient::new("key", "not a url"),
            Err(AirtableError::InvalidUrl(_))
        ));
    }
}
