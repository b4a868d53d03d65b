use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use pulpo_shared::schemas::{
    Task, TaskDraft, TaskPriority, TaskStatus, User, resolve_completed_date,
};
use tracing::{info, warn};

use super::{FormData, Nav, error_banner, escape, query_string, shell, today, with_query};
use crate::store::tasks::{create_task, find_task, list_tasks, update_task};
use crate::store::users::list_users;
use crate::views::tasks::{
    ALL_PRIORITIES, ALL_STATUSES, TaskFilter, assignee_names, format_due_date, is_overdue,
    summarize, visible_tasks,
};
use crate::web::AppState;

/// Board filters as submitted, kept verbatim for links and redirects.
struct BoardState {
    status: String,
    priority: String,
}

impl BoardState {
    fn from_form(form: &FormData, status_key: &str, priority_key: &str) -> Self {
        Self {
            status: form.text(status_key),
            priority: form.text(priority_key),
        }
    }

    fn filter(&self) -> TaskFilter {
        TaskFilter::from_query(Some(&self.status), Some(&self.priority))
    }

    fn query_with(&self, extra: &[(&str, &str)]) -> String {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if !self.status.is_empty() {
            pairs.push(("estado", self.status.as_str()));
        }
        if !self.priority.is_empty() {
            pairs.push(("prioridad", self.priority.as_str()));
        }
        pairs.extend_from_slice(extra);
        query_string(pairs)
    }

    fn url(&self, extra: &[(&str, &str)]) -> String {
        with_query("/tareas", &self.query_with(extra))
    }
}

pub async fn tasks_page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let (tasks, users) = tokio::join!(list_tasks(&state.store), list_users(&state.store));
    let tasks = match tasks {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "task board could not load tasks");
            return shell(Nav::Tasks, &error_banner("Error cargando tareas."));
        }
    };
    let users = users.unwrap_or_else(|e| {
        warn!(error = %e, "task board could not load users");
        Vec::new()
    });

    let form = FormData::from_query(query.as_deref());
    let board = BoardState::from_form(&form, "estado", "prioridad");
    let visible = visible_tasks(&tasks, &board.filter());
    let summary = summarize(&tasks);
    let today = today();

    let mut html = String::new();
    if let Some(code) = form.get("error") {
        html.push_str(&error_banner(match code {
            "requerido" => "El nombre de la tarea es obligatorio.",
            _ => "Error al guardar la tarea.",
        }));
    }
    html.push_str(&board_controls(&board));
    html.push_str(&format!(
        r#"<div class="summary"><span class="mono strong">{}</span> tareas pendientes <span class="sep">|</span> <span class="mono strong">{}</span> en progreso <span class="sep">|</span> <span class="mono strong">{}</span> completadas</div>"#,
        summary.pending, summary.in_progress, summary.completed
    ));

    if visible.is_empty() {
        html.push_str(r#"<div class="empty-state">No hay tareas que coincidan con los filtros.</div>"#);
    } else {
        html.push_str(r#"<div class="task-grid">"#);
        for task in &visible {
            html.push_str(&task_card(task, &users, &board, is_overdue(task, today)));
        }
        html.push_str("</div>");
    }

    if form.get("new").is_some() {
        html.push_str(&task_modal(None, &TaskDraft::default(), &users, &board));
    } else if let Some(task) = form
        .get("edit")
        .and_then(|id| tasks.iter().find(|t| t.id == id))
    {
        html.push_str(&task_modal(
            Some(&task.id),
            &TaskDraft::from_task(task),
            &users,
            &board,
        ));
    }

    shell(Nav::Tasks, &html)
}

fn options_select<'a>(
    name: &str,
    all: Option<(&str, &str)>,
    values: impl IntoIterator<Item = &'a str>,
    selected: &str,
) -> String {
    let mut html = format!(r#"<select name="{name}">"#);
    if let Some((value, label)) = all {
        html.push_str(&format!(r#"<option value="{value}">{label}</option>"#));
    }
    for value in values {
        let attr = if value == selected { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{v}"{attr}>{v}</option>"#,
            v = escape(value)
        ));
    }
    html.push_str("</select>");
    html
}

fn board_controls(board: &BoardState) -> String {
    format!(
        r#"<div class="toolbar">
<form method="get" action="/tareas" class="filters">{status}{priority}<button type="submit">Filtrar</button></form>
<a class="button primary" href="{new}">Nueva Tarea</a>
</div>"#,
        status = options_select(
            "estado",
            Some((ALL_STATUSES, "Todos los Estados")),
            TaskStatus::ALL.iter().map(TaskStatus::as_str),
            &board.status,
        ),
        priority = options_select(
            "prioridad",
            Some((ALL_PRIORITIES, "Todas las Prioridades")),
            TaskPriority::ALL.iter().map(TaskPriority::as_str),
            &board.priority,
        ),
        new = escape(&board.url(&[("new", "1")])),
    )
}

fn priority_badge(priority: &TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "pill red",
        TaskPriority::Medium => "pill amber",
        TaskPriority::Low => "pill green",
        TaskPriority::Other(_) => "pill muted",
    }
}

fn status_badge(status: &TaskStatus) -> Option<&'static str> {
    match status {
        TaskStatus::NotStarted => Some("pill muted"),
        TaskStatus::InProgress => Some("pill blue"),
        TaskStatus::Completed => Some("pill green"),
        TaskStatus::Other(_) => None,
    }
}

fn task_card(task: &Task, users: &[User], board: &BoardState, overdue: bool) -> String {
    let completed = task.status.is_completed();
    let description = if task.description.is_empty() {
        "Sin descripción"
    } else {
        task.description.as_str()
    };
    let due_class = match (task.due_date.as_deref(), overdue) {
        (None, _) => "muted",
        (Some(_), true) => "overdue",
        (Some(_), false) => "",
    };
    let status = status_badge(&task.status)
        .map(|class| format!(r#"<span class="{class}">{}</span>"#, escape(task.status.as_str())))
        .unwrap_or_default();
    format!(
        r#"<a class="task-card{done}" href="{edit}">
<div class="task-top"><h3>{title}</h3><span class="{priority_class}">{priority}</span></div>
<p class="task-desc">{description}</p>
<div class="task-bottom"><div><div class="muted small">👤 {assignees}</div><div class="small {due_class}">📅 {due}</div></div>{status}</div>
</a>"#,
        done = if completed { " completed" } else { "" },
        edit = escape(&board.url(&[("edit", task.id.as_str())])),
        title = escape(&task.title),
        priority_class = priority_badge(&task.priority),
        priority = escape(task.priority.as_str()),
        description = escape(description),
        assignees = escape(&assignee_names(task, users)),
        due = escape(&format_due_date(task.due_date.as_deref())),
    )
}

fn task_modal(id: Option<&str>, draft: &TaskDraft, users: &[User], board: &BoardState) -> String {
    let title = if id.is_some() { "Editar Tarea" } else { "Nueva Tarea" };
    let close = escape(&board.url(&[]));
    let assignees: String = users
        .iter()
        .map(|u| {
            let checked = if draft.assignees.contains(&u.id) { " checked" } else { "" };
            format!(
                r#"<label class="chip-toggle"><input type="checkbox" name="responsable" value="{}"{checked}> {}</label>"#,
                escape(&u.id),
                escape(&u.name)
            )
        })
        .collect();
    format!(
        r#"<div class="modal-backdrop"><div class="modal">
<div class="modal-header"><h3>{title}</h3><a class="close" href="{close}">✕</a></div>
<form method="post" action="/tareas/guardar" class="modal-body form-grid">
<input type="hidden" name="id" value="{id}">
<input type="hidden" name="f_estado" value="{f_status}">
<input type="hidden" name="f_prioridad" value="{f_priority}">
<label class="wide">Nombre de la tarea *<input type="text" name="tarea" value="{name}" placeholder="Ej. Revisar inventario del bar principal" required></label>
<label class="wide">Descripción<textarea name="descripcion" rows="3" placeholder="Detalles sobre la tarea...">{description}</textarea></label>
<label>Estado{status}</label>
<label>Prioridad{priority}</label>
<fieldset class="wide"><legend>Responsable(s)</legend>{assignees}</fieldset>
<label>Fecha Límite<input type="date" name="fecha_limite" value="{due}"></label>
<label>Finalizada el<input type="date" name="fecha_finalizacion" value="{completed}"><small class="muted">Solo para tareas completadas</small></label>
<div class="modal-actions wide"><a class="button secondary" href="{close}">Cancelar</a><button type="submit" class="primary">Guardar</button></div>
</form>
</div></div>"#,
        id = escape(id.unwrap_or_default()),
        f_status = escape(&board.status),
        f_priority = escape(&board.priority),
        name = escape(&draft.title),
        description = escape(&draft.description),
        status = options_select(
            "estado",
            None,
            TaskStatus::ALL.iter().map(TaskStatus::as_str),
            draft.status.as_str(),
        ),
        priority = options_select(
            "prioridad",
            None,
            TaskPriority::ALL.iter().map(TaskPriority::as_str),
            draft.priority.as_str(),
        ),
        due = escape(draft.due_date.as_deref().unwrap_or_default()),
        completed = escape(draft.completed_date.as_deref().unwrap_or_default()),
    )
}

/// Create the task when the form has no id, update it otherwise.
pub async fn save_task(State(state): State<AppState>, body: Bytes) -> Response {
    let form = FormData::parse(&body);
    let board = BoardState::from_form(&form, "f_estado", "f_prioridad");
    let id = form.get("id").map(str::to_string);
    let reopen = |error: &str| {
        let dialog = match id.as_deref() {
            Some(id) => ("edit", id),
            None => ("new", "1"),
        };
        Redirect::to(&board.url(&[dialog, ("error", error)])).into_response()
    };

    let title = form.text("tarea");
    if title.is_empty() {
        return reopen("requerido");
    }
    let status = form.get("estado").map(TaskStatus::parse).unwrap_or_default();

    let previous = match id.as_deref() {
        Some(id) => match find_task(&state.store, id).await {
            Ok(Some(task)) => Some(task.status),
            Ok(None) => return reopen("guardar"),
            Err(e) => {
                warn!(error = %e, id = %id, "task lookup failed");
                return reopen("guardar");
            }
        },
        None => None,
    };
    let completed_date = resolve_completed_date(
        previous.as_ref(),
        &status,
        form.get("fecha_finalizacion"),
        &today().format("%Y-%m-%d").to_string(),
    );

    let draft = TaskDraft {
        title,
        description: form.text("descripcion"),
        status,
        priority: form
            .get("prioridad")
            .map(TaskPriority::parse)
            .unwrap_or_default(),
        assignees: form.all("responsable"),
        due_date: form.get("fecha_limite").map(str::to_string),
        completed_date,
    };

    let result = match id.as_deref() {
        Some(id) => update_task(&state.store, id, draft.to_fields()).await,
        None => create_task(&state.store, draft.to_fields()).await,
    };
    match result {
        Ok(record) => {
            info!(id = %record.id, "task saved");
            Redirect::to(&board.url(&[])).into_response()
        }
        Err(e) => {
            warn!(error = %e, "task save failed");
            reopen("guardar")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_links_keep_filters() {
        let board = BoardState {
            status: "En progreso".into(),
            priority: String::new(),
        };
        assert_eq!(
            board.url(&[("edit", "rec1")]),
            "/tareas?estado=En+progreso&edit=rec1"
        );
        let empty = BoardState {
            status: String::new(),
            priority: String::new(),
        };
        assert_eq!(empty.url(&[]), "/tareas");
    }

    #[test]
    fn modal_preselects_assignees() {
        let users = vec![
            User {
                id: "recA".into(),
                name: "Ana".into(),
                id_telegram: String::new(),
            },
            User {
                id: "recB".into(),
                name: "Beto".into(),
                id_telegram: String::new(),
            },
        ];
        let draft = TaskDraft {
            title: "Pedir hielo".into(),
            assignees: vec!["recB".into()],
            ..Default::default()
        };
        let board = BoardState {
            status: String::new(),
            priority: String::new(),
        };
        let html = task_modal(Some("recT"), &draft, &users, &board);
        assert!(html.contains(r#"value="recA">"#));
        assert!(html.contains(r#"value="recB" checked>"#));
        assert!(html.contains("Editar Tarea"));
        assert!(html.contains(r#"<option value="Media" selected>"#));
    }
}
