//! Staff tasks and their record-store field mapping.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::record::Record;
use crate::utils::{
    bool_field, first_text_field, optional_text_field, text_field, text_list_field,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "Sin empezar" => Self::NotStarted,
            "En progreso" => Self::InProgress,
            "Completada" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotStarted => "Sin empezar",
            Self::InProgress => "En progreso",
            Self::Completed => "Completada",
            Self::Other(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<TaskStatus> for String {
    fn from(s: TaskStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn parse(s: &str) -> Self {
        match s {
            "Alta" => Self::High,
            "Media" => Self::Medium,
            "Baja" => Self::Low,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Media",
            Self::Low => "Baja",
            Self::Other(s) => s,
        }
    }

    /// Sort weight; unknown priorities sink below `Baja`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Other(_) => 0,
        }
    }
}

impl From<String> for TaskPriority {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<TaskPriority> for String {
    fn from(p: TaskPriority) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "tarea")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    /// User record ids.
    #[serde(rename = "responsable")]
    pub assignees: Vec<String>,
    #[serde(rename = "fecha_limite")]
    pub due_date: Option<String>,
    #[serde(rename = "fecha_finalizacion")]
    pub completed_date: Option<String>,
    #[serde(rename = "estado")]
    pub status: TaskStatus,
    #[serde(rename = "prioridad")]
    pub priority: TaskPriority,
    #[serde(rename = "activa")]
    pub active: bool,
    #[serde(rename = "nombre_usuario")]
    pub user_name: String,
    pub id_telegram: String,
}

impl Task {
    pub fn from_record(record: &Record) -> Self {
        let f = &record.fields;
        Self {
            id: record.id.clone(),
            title: text_field(f, "Tarea"),
            description: text_field(f, "Descripción"),
            assignees: text_list_field(f, "Responsable"),
            due_date: optional_text_field(f, "Fecha Limite"),
            completed_date: optional_text_field(f, "Fecha de finalización"),
            status: optional_text_field(f, "Estado")
                .map(TaskStatus::from)
                .unwrap_or_default(),
            priority: optional_text_field(f, "Prioridad")
                .map(TaskPriority::from)
                .unwrap_or_default(),
            active: bool_field(f, "Activa"),
            user_name: first_text_field(f, "Nombre (from Usuarios)"),
            id_telegram: first_text_field(f, "ID Telegram (from Usuarios)"),
        }
    }
}

/// Task form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignees: Vec<String>,
    pub due_date: Option<String>,
    pub completed_date: Option<String>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone(),
            priority: task.priority.clone(),
            assignees: task.assignees.clone(),
            due_date: task.due_date.as_deref().map(date_part),
            completed_date: task.completed_date.as_deref().map(date_part),
        }
    }

    /// Record-store fields. An empty assignee list is left out so the
    /// linked-record cell is untouched; empty dates are sent as `null`.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("Tarea".into(), json!(self.title));
        fields.insert("Descripción".into(), json!(self.description));
        fields.insert("Estado".into(), json!(self.status.as_str()));
        fields.insert("Prioridad".into(), json!(self.priority.as_str()));
        if !self.assignees.is_empty() {
            fields.insert("Responsable".into(), json!(self.assignees));
        }
        fields.insert("Fecha Limite".into(), non_empty(&self.due_date));
        fields.insert("Fecha de finalización".into(), non_empty(&self.completed_date));
        fields
    }
}

fn non_empty(value: &Option<String>) -> Value {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Value::String(s.to_string()),
        _ => Value::Null,
    }
}

/// `YYYY-MM-DD` prefix of an ISO date or datetime.
pub fn date_part(value: &str) -> String {
    value.split('T').next().unwrap_or(value).to_string()
}

/// Completion date to store after a status change.
///
/// Moving into `Completada` stamps `today` unless a date was supplied;
/// any other status clears the date.
pub fn resolve_completed_date(
    previous: Option<&TaskStatus>,
    next: &TaskStatus,
    submitted: Option<&str>,
    today: &str,
) -> Option<String> {
    if !next.is_completed() {
        return None;
    }
    let submitted = submitted.map(str::trim).filter(|s| !s.is_empty());
    match submitted {
        Some(date) => Some(date.to_string()),
        None if !previous.is_some_and(TaskStatus::is_completed) => Some(today.to_string()),
        None => None,
    }
}
