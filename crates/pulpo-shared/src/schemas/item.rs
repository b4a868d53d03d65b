//! Inventory items. Stock metrics are computed by the record store; the
//! dashboard only reads them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::record::Record;
use crate::utils::{bool_field, number_field, optional_text_field, text_field};

pub const NO_DATA: &str = "SIN DATOS";

/// Upstream `estado_stock`: how current stock compares to the ideal level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockStatus {
    Optimal,
    Deficit,
    Excess,
    NoData,
    Other(String),
}

impl StockStatus {
    pub const FILTER_OPTIONS: [StockStatus; 3] =
        [StockStatus::Optimal, StockStatus::Deficit, StockStatus::Excess];

    pub fn parse(s: &str) -> Self {
        match s {
            "ÓPTIMO" => Self::Optimal,
            "DÉFICIT" => Self::Deficit,
            "EXCESO" => Self::Excess,
            NO_DATA => Self::NoData,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Optimal => "ÓPTIMO",
            Self::Deficit => "DÉFICIT",
            Self::Excess => "EXCESO",
            Self::NoData => NO_DATA,
            Self::Other(s) => s,
        }
    }
}

impl From<String> for StockStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<StockStatus> for String {
    fn from(s: StockStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream `nivel_alerta`: urgency derived from days of stock remaining.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertLevel {
    Ok,
    Soon,
    Urgent,
    Depleted,
    NoData,
    Other(String),
}

impl AlertLevel {
    pub const FILTER_OPTIONS: [AlertLevel; 5] = [
        AlertLevel::Ok,
        AlertLevel::Soon,
        AlertLevel::Urgent,
        AlertLevel::Depleted,
        AlertLevel::NoData,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "OK" => Self::Ok,
            "PRONTO" => Self::Soon,
            "URGENTE" => Self::Urgent,
            "AGOTADO" => Self::Depleted,
            NO_DATA => Self::NoData,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Soon => "PRONTO",
            Self::Urgent => "URGENTE",
            Self::Depleted => "AGOTADO",
            Self::NoData => NO_DATA,
            Self::Other(s) => s,
        }
    }

    /// `AGOTADO` and `URGENTE` show up in the dashboard's critical table.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Depleted | Self::Urgent)
    }
}

impl From<String> for AlertLevel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AlertLevel> for String {
    fn from(a: AlertLevel) -> Self {
        a.as_str().to_string()
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "subcategoria")]
    pub subcategory: String,
    #[serde(rename = "unidad_base")]
    pub unit: String,
    #[serde(rename = "proveedor")]
    pub supplier: String,
    pub min_level: f64,
    pub stock_ideal: f64,
    #[serde(rename = "limite_cocina")]
    pub kitchen_limit: f64,
    #[serde(rename = "limite_bar_pb")]
    pub ground_bar_limit: f64,
    #[serde(rename = "limite_bar_rooftop")]
    pub rooftop_bar_limit: f64,
    #[serde(rename = "activo")]
    pub active: bool,
    pub stock_raw: f64,
    #[serde(rename = "existencias")]
    pub stock: f64,
    #[serde(rename = "estado_stock")]
    pub stock_status: StockStatus,
    #[serde(rename = "cantidad_a_comprar")]
    pub purchase_quantity: f64,
    #[serde(rename = "consumo_total")]
    pub total_consumption: f64,
    #[serde(rename = "consumo_promedio_diario")]
    pub daily_consumption: f64,
    #[serde(rename = "dias_stock_restante")]
    pub days_remaining: f64,
    #[serde(rename = "nivel_alerta")]
    pub alert_level: AlertLevel,
    #[serde(rename = "bajo_stock")]
    pub low_stock: bool,
}

impl Item {
    pub fn from_record(record: &Record) -> Self {
        let f = &record.fields;
        Self {
            id: record.id.clone(),
            name: text_field(f, "nombre"),
            category: text_field(f, "categoria"),
            subcategory: text_field(f, "subcategoria"),
            unit: text_field(f, "unidad_base"),
            supplier: text_field(f, "proveedor"),
            min_level: number_field(f, "min_level"),
            stock_ideal: number_field(f, "stock_ideal"),
            kitchen_limit: number_field(f, "limite_cocina"),
            ground_bar_limit: number_field(f, "limite_bar_pb"),
            rooftop_bar_limit: number_field(f, "limite_bar_rooftop"),
            active: bool_field(f, "activo"),
            stock_raw: number_field(f, "stock_raw"),
            stock: number_field(f, "existencias"),
            stock_status: optional_text_field(f, "estado_stock")
                .map(StockStatus::from)
                .unwrap_or(StockStatus::NoData),
            purchase_quantity: number_field(f, "cantidad_a_comprar"),
            total_consumption: number_field(f, "consumo_total"),
            daily_consumption: number_field(f, "consumo_promedio_diario"),
            days_remaining: number_field(f, "dias_stock_restante"),
            alert_level: optional_text_field(f, "nivel_alerta")
                .map(AlertLevel::from)
                .unwrap_or(AlertLevel::NoData),
            low_stock: bool_field(f, "bajo_stock"),
        }
    }
}

/// Editable subset of an item, as submitted by the inventory form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub subcategory: String,
    pub supplier: String,
    pub min_level: f64,
    pub stock_ideal: f64,
    /// Only sent when the item is created.
    pub initial_stock: f64,
    pub kitchen_limit: f64,
    pub ground_bar_limit: f64,
    pub rooftop_bar_limit: f64,
}

impl ItemDraft {
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            unit: item.unit.clone(),
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            supplier: item.supplier.clone(),
            min_level: item.min_level,
            stock_ideal: item.stock_ideal,
            initial_stock: 0.0,
            kitchen_limit: item.kitchen_limit,
            ground_bar_limit: item.ground_bar_limit,
            rooftop_bar_limit: item.rooftop_bar_limit,
        }
    }

    /// Name of the first missing required field, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("Nombre")
        } else if self.unit.trim().is_empty() {
            Some("Unidad Base")
        } else {
            None
        }
    }

    /// Record-store fields for this draft. `stock_inicial` is included only
    /// for new items.
    pub fn to_fields(&self, creating: bool) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("nombre".into(), json!(self.name));
        fields.insert("unidad_base".into(), json!(self.unit));
        fields.insert("categoria".into(), json!(self.category));
        fields.insert("subcategoria".into(), json!(self.subcategory));
        fields.insert("proveedor".into(), json!(self.supplier));
        fields.insert("min_level".into(), json!(self.min_level));
        fields.insert("stock_ideal".into(), json!(self.stock_ideal));
        fields.insert("limite_cocina".into(), json!(self.kitchen_limit));
        fields.insert("limite_bar_pb".into(), json!(self.ground_bar_limit));
        fields.insert("limite_bar_rooftop".into(), json!(self.rooftop_bar_limit));
        if creating {
            fields.insert("stock_inicial".into(), json!(self.initial_stock));
        }
        fields
    }
}

/// Fields that soft-delete an item.
pub fn deactivate_item_fields() -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("activo".into(), Value::Bool(false));
    fields
}
