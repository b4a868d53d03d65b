use pulpo_shared::schemas::{Item, Record};
use serde_json::{Map, Value};

use super::{Store, StoreError};

/// Only active items are ever listed; deactivated ones stay in the table.
pub const ACTIVE_ITEMS_FORMULA: &str = "{activo} = TRUE()";

pub async fn list_items(store: &Store) -> Result<Vec<Item>, StoreError> {
    let (client, table) = store.items_table()?;
    let records = client
        .list_records(table, Some(ACTIVE_ITEMS_FORMULA))
        .await?;
    Ok(records.iter().map(Item::from_record).collect())
}

/// Create an item. New items are always active.
pub async fn create_item(
    store: &Store,
    mut fields: Map<String, Value>,
) -> Result<Record, StoreError> {
    let (client, table) = store.items_table()?;
    fields.insert("activo".into(), Value::Bool(true));
    Ok(client.create_record(table, fields).await?)
}

pub async fn update_item(
    store: &Store,
    id: &str,
    fields: Map<String, Value>,
) -> Result<Record, StoreError> {
    let (client, table) = store.items_table()?;
    Ok(client.update_record(table, id, fields).await?)
}
