use pulpo_infra::AirtableError;
use pulpo_shared::schemas::{Record, Task};
use serde_json::{Map, Value};

use super::{Store, StoreError};

pub const ACTIVE_TASKS_FORMULA: &str = "{Activa} = TRUE()";

pub async fn list_tasks(store: &Store) -> Result<Vec<Task>, StoreError> {
    let (client, table) = store.tasks_table()?;
    let records = client
        .list_records(table, Some(ACTIVE_TASKS_FORMULA))
        .await?;
    Ok(records.iter().map(Task::from_record).collect())
}

/// Fetch one task by id; `None` when the store does not know it.
pub async fn find_task(store: &Store, id: &str) -> Result<Option<Task>, StoreError> {
    let (client, table) = store.tasks_table()?;
    match client.get_record(table, id).await {
        Ok(record) => Ok(Some(Task::from_record(&record))),
        Err(AirtableError::Upstream { status: 404, .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn create_task(
    store: &Store,
    mut fields: Map<String, Value>,
) -> Result<Record, StoreError> {
    let (client, table) = store.tasks_table()?;
    fields.insert("Activa".into(), Value::Bool(true));
    Ok(client.create_record(table, fields).await?)
}

pub async fn update_task(
    store: &Store,
    id: &str,
    fields: Map<String, Value>,
) -> Result<Record, StoreError> {
    let (client, table) = store.tasks_table()?;
    Ok(client.update_record(table, id, fields).await?)
}
