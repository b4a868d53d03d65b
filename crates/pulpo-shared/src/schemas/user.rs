use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::utils::text_field;

/// Staff member, read-only from the dashboard's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub id_telegram: String,
}

impl User {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: text_field(&record.fields, "Nombre"),
            id_telegram: text_field(&record.fields, "ID Telegram"),
        }
    }
}
