use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::stats::TaskStats;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// One task as emitted by every `--json` surface (add, list, search, show).
/// Mirrors the persisted schema plus the derived `overdue` flag.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn task_to_json<'a>(task: &'a Task, today: NaiveDate) -> TaskJson<'a> {
    TaskJson {
        id: &task.id,
        title: &task.title,
        description: &task.description,
        category: &task.category,
        priority: task.priority,
        due_date: task.due_date,
        completed: task.completed,
        overdue: task.is_overdue(today),
        created_at: task.created_at,
        updated_at: task.updated_at,
        completed_at: task.completed_at,
    }
}

pub fn stats_to_json(stats: &TaskStats) -> StatsJson {
    StatsJson {
        total: stats.total,
        completed: stats.completed,
        pending: stats.pending,
        overdue: stats.overdue,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary:
/// `[x] 1756500000000  Buy milk  #shopping !high due:2026-08-29 (overdue)`
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{}] {}  {}", check, task.id, task.title);
    line.push_str(&format!("  #{}", task.category));
    line.push_str(&format!(" !{}", task.priority.label()));
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due:{}", due));
        if task.is_overdue(today) {
            line.push_str(" (overdue)");
        }
    }
    line
}

/// Format detailed task view
pub fn format_task_detail(task: &Task, today: NaiveDate) -> Vec<String> {
    let check = if task.completed { 'x' } else { ' ' };
    let mut lines = vec![format!("[{}] {}", check, task.title)];
    lines.push(format!("id: {}", task.id));
    if !task.description.is_empty() {
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines.push(format!("category: {}", task.category));
    lines.push(format!("priority: {}", task.priority.label()));
    match task.due_date {
        Some(due) if task.is_overdue(today) => lines.push(format!("due: {} (overdue)", due)),
        Some(due) => lines.push(format!("due: {}", due)),
        None => {}
    }
    lines.push(format!("created: {}", task.created_at.to_rfc3339()));
    if let Some(updated) = task.updated_at {
        lines.push(format!("updated: {}", updated.to_rfc3339()));
    }
    if let Some(completed) = task.completed_at {
        lines.push(format!("completed: {}", completed.to_rfc3339()));
    }
    lines
}

pub fn format_stats(stats: &TaskStats) -> String {
    format!(
        "{} total | {} completed | {} pending | {} overdue",
        stats.total, stats.completed, stats.pending, stats.overdue
    )
}

/// Parse a priority string (CLI `--priority` flag)
pub fn parse_priority(s: &str) -> Result<Priority, String> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        _ => Err(format!(
            "unknown priority '{}' (expected: low, medium, high)",
            s
        )),
    }
}

/// Parse a due date string (CLI `--due` flag)
pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}
