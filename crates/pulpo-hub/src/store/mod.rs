//! Access to the hosted record store. There is no local persistence: each
//! call reads or writes the remote tables directly.

pub mod items;
pub mod tasks;
pub mod users;

use std::fmt;

use pulpo_infra::{AirtableClient, AirtableError, TableRef};
use tracing::warn;

use crate::config::AirtableSettings;

#[derive(Debug)]
pub enum StoreError {
    /// API key, base or table missing from the configuration.
    NotConfigured,
    Airtable(AirtableError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("Missing Airtable configuration"),
            Self::Airtable(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotConfigured => None,
            Self::Airtable(e) => Some(e),
        }
    }
}

impl From<AirtableError> for StoreError {
    fn from(e: AirtableError) -> Self {
        Self::Airtable(e)
    }
}

pub struct Store {
    client: Option<AirtableClient>,
    items: Option<TableRef>,
    tasks: Option<TableRef>,
    users: Option<TableRef>,
}

impl Store {
    pub fn new(settings: &AirtableSettings) -> Self {
        let client = match settings.api_key {
            Some(ref key) => match AirtableClient::new(key.clone(), &settings.api_url) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!(error = %e, "record store client disabled");
                    None
                }
            },
            None => None,
        };
        Self {
            client,
            items: settings.items(),
            tasks: settings.tasks(),
            users: settings.users(),
        }
    }

    fn table<'a>(
        &'a self,
        table: Option<&'a TableRef>,
    ) -> Result<(&'a AirtableClient, &'a TableRef), StoreError> {
        match (self.client.as_ref(), table) {
            (Some(client), Some(table)) => Ok((client, table)),
            _ => Err(StoreError::NotConfigured),
        }
    }

    pub(crate) fn items_table(&self) -> Result<(&AirtableClient, &TableRef), StoreError> {
        self.table(self.items.as_ref())
    }

    pub(crate) fn tasks_table(&self) -> Result<(&AirtableClient, &TableRef), StoreError> {
        self.table(self.tasks.as_ref())
    }

    pub(crate) fn users_table(&self) -> Result<(&AirtableClient, &TableRef), StoreError> {
        self.table(self.users.as_ref())
    }

    /// Which tables are reachable, for diagnostics.
    pub fn status(&self) -> [(&'static str, bool); 3] {
        [
            ("items", self.items_table().is_ok()),
            ("tasks", self.tasks_table().is_ok()),
            ("users", self.users_table().is_ok()),
        ]
    }
}
