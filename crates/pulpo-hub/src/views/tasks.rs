use std::cmp::Ordering;

use chrono::NaiveDate;
use pulpo_shared::schemas::{Task, TaskPriority, TaskStatus, User, date_part};

use super::{format_long_date, parse_iso_date};

pub const ALL_STATUSES: &str = "Todos";
pub const ALL_PRIORITIES: &str = "Todas";

/// Task board filters; `None` shows every status or priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn from_query(status: Option<&str>, priority: Option<&str>) -> Self {
        Self {
            status: status
                .filter(|s| !s.is_empty() && *s != ALL_STATUSES)
                .map(TaskStatus::parse),
            priority: priority
                .filter(|p| !p.is_empty() && *p != ALL_PRIORITIES)
                .map(TaskPriority::parse),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        self.status.as_ref().is_none_or(|s| &task.status == s)
            && self.priority.as_ref().is_none_or(|p| &task.priority == p)
    }
}

/// Active tasks passing `filter`, in board order: open tasks first, then
/// higher priority, then earliest due date with undated tasks last.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.active && filter.matches(t))
        .collect();
    visible.sort_by(|a, b| board_order(a, b));
    visible
}

fn board_order(a: &Task, b: &Task) -> Ordering {
    a.status
        .is_completed()
        .cmp(&b.status.is_completed())
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| match (due_key(a), due_key(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn due_key(task: &Task) -> Option<String> {
    task.due_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(date_part)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Status counts over all active tasks, ignoring filters.
pub fn summarize(tasks: &[Task]) -> TaskSummary {
    let mut summary = TaskSummary::default();
    for task in tasks.iter().filter(|t| t.active) {
        match task.status {
            TaskStatus::NotStarted => summary.pending += 1,
            TaskStatus::InProgress => summary.in_progress += 1,
            TaskStatus::Completed => summary.completed += 1,
            TaskStatus::Other(_) => {}
        }
    }
    summary
}

/// Comma-separated assignee names.
pub fn assignee_names(task: &Task, users: &[User]) -> String {
    if task.assignees.is_empty() {
        return "Sin asignar".into();
    }
    task.assignees
        .iter()
        .map(|id| {
            users
                .iter()
                .find(|u| &u.id == id)
                .map_or("Desconocido", |u| u.name.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_due_date(value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        None => "Sin fecha".into(),
        Some(v) => parse_iso_date(v).map_or_else(|| v.to_string(), format_long_date),
    }
}

/// Past due and still open.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.status.is_completed()
        && task
            .due_date
            .as_deref()
            .and_then(parse_iso_date)
            .is_some_and(|due| due < today)
}
