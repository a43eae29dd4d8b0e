use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Status filter applied to the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
}

impl FilterMode {
    /// All modes, in the order the filter bar shows them
    pub const ALL_MODES: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Completed,
        FilterMode::Pending,
        FilterMode::Overdue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Completed => "completed",
            FilterMode::Pending => "pending",
            FilterMode::Overdue => "overdue",
        }
    }

    /// Cycle to the next mode (used by the TUI filter bar)
    pub fn next(self) -> FilterMode {
        match self {
            FilterMode::All => FilterMode::Completed,
            FilterMode::Completed => FilterMode::Pending,
            FilterMode::Pending => FilterMode::Overdue,
            FilterMode::Overdue => FilterMode::All,
        }
    }

    fn admits(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Completed => task.completed,
            FilterMode::Pending => !task.completed,
            FilterMode::Overdue => task.is_overdue(today),
        }
    }
}

/// Parse a filter mode string (CLI `--filter` flag)
pub fn parse_filter_mode(s: &str) -> Result<FilterMode, String> {
    match s {
        "all" => Ok(FilterMode::All),
        "completed" => Ok(FilterMode::Completed),
        "pending" => Ok(FilterMode::Pending),
        "overdue" => Ok(FilterMode::Overdue),
        _ => Err(format!(
            "unknown filter '{}' (expected: all, completed, pending, overdue)",
            s
        )),
    }
}

/// Derive the displayed subset of tasks: an order-preserving subsequence of
/// `tasks`, never a mutation of it.
///
/// When `search` is non-empty the status filter is bypassed entirely and only
/// the search predicate applies (see DESIGN.md). With an empty search term
/// the status filter alone applies.
pub fn project<'a>(
    tasks: &'a [Task],
    filter: FilterMode,
    search: &str,
    today: NaiveDate,
) -> Vec<&'a Task> {
    if search.is_empty() {
        return tasks.iter().filter(|t| filter.admits(t, today)).collect();
    }

    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|t| matches_search(t, &needle))
        .collect()
}

/// Case-insensitive substring match against title, description, and category.
/// `needle` must already be lowercased.
fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task.category.to_lowercase().contains(needle)
}
