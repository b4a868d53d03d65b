use pulpo_shared::schemas::User;

use super::{Store, StoreError};

pub async fn list_users(store: &Store) -> Result<Vec<User>, StoreError> {
    let (client, table) = store.users_table()?;
    let records = client.list_records(table, None).await?;
    Ok(records.iter().map(User::from_record).collect())
}
