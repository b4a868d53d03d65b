use pulpo_infra::{DEFAULT_API_URL, TableRef};

/// Table holding the staff list, inside the tasks base.
pub const USERS_TABLE: &str = "Usuarios";

/// Record-store coordinates. Every field is optional at startup: routes
/// whose table is not configured answer with a configuration error.
#[derive(Debug, Clone, Default)]
pub struct AirtableSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub inventory_base: Option<String>,
    pub items_table: Option<String>,
    pub tasks_base: Option<String>,
    pub tasks_table: Option<String>,
}

impl AirtableSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("AIRTABLE_API_KEY"),
            api_url: non_empty("AIRTABLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            inventory_base: non_empty("AIRTABLE_BASE_INVENTARIO"),
            items_table: non_empty("AIRTABLE_TABLE_ITEMS"),
            tasks_base: non_empty("AIRTABLE_BASE_TAREAS"),
            tasks_table: non_empty("AIRTABLE_TABLE_TAREAS"),
        }
    }

    pub fn items(&self) -> Option<TableRef> {
        Some(TableRef::new(
            self.inventory_base.clone()?,
            self.items_table.clone()?,
        ))
    }

    pub fn tasks(&self) -> Option<TableRef> {
        Some(TableRef::new(self.tasks_base.clone()?, self.tasks_table.clone()?))
    }

    pub fn users(&self) -> Option<TableRef> {
        Some(TableRef::new(self.tasks_base.clone()?, USERS_TABLE))
    }
}
