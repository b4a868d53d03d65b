//! Raw record-store wire types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single row as returned by the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

/// One page of a list call. `offset` is present while more pages remain.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRecord {
    pub fields: Map<String, Value>,
}

/// Body of a create call; the store accepts up to ten records at once but
/// the dashboard only ever sends one.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordsRequest {
    pub records: Vec<NewRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordsResponse {
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRecordRequest {
    pub fields: Map<String, Value>,
}
