use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::Task;

/// Aggregate counts over the full, unfiltered collection.
/// Recomputed from current data on every render; nothing is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
        }
        if task.is_overdue(today) {
            stats.overdue += 1;
        }
    }
    stats
}
