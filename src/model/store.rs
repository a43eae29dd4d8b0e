use chrono::{DateTime, Utc};

use crate::model::task::{DEFAULT_CATEGORY, Task, TaskInput, TaskPatch};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
}

/// The authoritative, ordered task collection.
///
/// Newest-created task first. The store is an explicitly owned object with no
/// ambient state: every mutating operation takes the current time as an
/// argument, and persistence is the caller's responsibility (the CLI and TUI
/// write the full collection right after each mutation).
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore { tasks: Vec::new() }
    }

    /// Rehydrate a store from a previously persisted collection
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        TaskStore { tasks }
    }

    /// All tasks, newest-created first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Create a task and prepend it to the collection.
    ///
    /// The ID is the creation time in milliseconds; if that collides with an
    /// existing task (same-millisecond adds, or a fixed clock in tests) the
    /// candidate is bumped until unique.
    pub fn add(&mut self, input: TaskInput, now: DateTime<Utc>) -> &Task {
        let id = self.generate_id(now);
        let category = match input.category {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CATEGORY.to_string(),
        };

        let task = Task {
            id,
            title: input.title,
            description: input.description,
            category,
            priority: input.priority,
            due_date: input.due_date,
            completed: false,
            created_at: now,
            updated_at: None,
            completed_at: None,
        };
        self.tasks.insert(0, task);
        &self.tasks[0]
    }

    /// Merge a patch into the matching task and stamp `updated_at`.
    /// Order is preserved; `created_at` is never touched.
    pub fn update(
        &mut self,
        id: &str,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let task = self
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(category) = patch.category {
            task.category = if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            };
        }
        task.updated_at = Some(now);
        Ok(())
    }

    /// Remove the matching task. Removing an unknown ID is a no-op, not an
    /// error: deletion is idempotent. Returns whether a task was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() < before
    }

    /// Flip completion, maintaining `completed_at` (set on false→true,
    /// cleared on true→false). Returns the new completion state.
    /// Does NOT stamp `updated_at`; toggles are not field edits.
    pub fn toggle_complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let task = self
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        task.completed = !task.completed;
        task.completed_at = if task.completed { Some(now) } else { None };
        Ok(task.completed)
    }

    fn generate_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap()
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Every task satisfies the completion invariant
    fn assert_completed_at_invariant(store: &TaskStore) {
        for task in store.tasks() {
            assert_eq!(
                task.completed_at.is_some(),
                task.completed,
                "completedAt must be present iff completed (task {})",
                task.id
            );
        }
    }

    #[test]
    fn add_prepends_and_grows_by_one() {
        let mut store = TaskStore::new();
        let now = fixed_now();

        store.add(input("first"), now);
        assert_eq!(store.len(), 1);

        store.add(input("second"), now);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].title, "second");
        assert_eq!(store.tasks()[1].title, "first");
    }

    #[test]
    fn add_defaults() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        let task = store.add(input("t"), now);

        assert!(!task.completed);
        assert_eq!(task.category, "general");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.created_at, now);
        assert!(task.updated_at.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn add_blank_category_falls_back_to_default() {
        let mut store = TaskStore::new();
        let task = store.add(
            TaskInput {
                title: "t".into(),
                category: Some("   ".into()),
                ..Default::default()
            },
            fixed_now(),
        );
        assert_eq!(task.category, "general");
    }

    #[test]
    fn ids_stay_unique_under_a_fixed_clock() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        for i in 0..50 {
            store.add(input(&format!("task {}", i)), now);
        }
        let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn update_merges_patch_and_stamps_updated_at() {
        let mut store = TaskStore::new();
        let created = fixed_now();
        let id = store.add(input("old title"), created).id.clone();

        let later = created + chrono::Duration::hours(1);
        store
            .update(
                &id,
                TaskPatch {
                    title: Some("new title".into()),
                    priority: Some(Priority::High),
                    due_date: Some(Some(
                        chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                    )),
                    ..Default::default()
                },
                later,
            )
            .unwrap();

        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "new title");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.updated_at, Some(later));
        // created_at is immutable
        assert_eq!(task.created_at, created);
    }

    #[test]
    fn update_can_clear_due_date() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        let id = store
            .add(
                TaskInput {
                    title: "t".into(),
                    due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1),
                    ..Default::default()
                },
                now,
            )
            .id
            .clone();

        store
            .update(
                &id,
                TaskPatch {
                    due_date: Some(None),
                    ..Default::default()
                },
                now,
            )
            .unwrap();
        assert!(store.get(&id).unwrap().due_date.is_none());
    }

    #[test]
    fn update_preserves_order() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        store.add(input("a"), now);
        store.add(input("b"), now);
        store.add(input("c"), now);
        let middle_id = store.tasks()[1].id.clone();

        store
            .update(
                &middle_id,
                TaskPatch {
                    title: Some("b2".into()),
                    ..Default::default()
                },
                now,
            )
            .unwrap();

        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b2", "a"]);
    }

    #[test]
    fn toggle_sets_and_clears_completed_at() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        let id = store.add(input("t"), now).id.clone();

        let done_at = now + chrono::Duration::minutes(5);
        assert!(store.toggle_complete(&id, done_at).unwrap());
        let task = store.get(&id).unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(done_at));
        // Toggling is not a field edit
        assert!(task.updated_at.is_none());
        assert_completed_at_invariant(&store);

        // Toggle back: completed_at clears to absent
        assert!(!store.toggle_complete(&id, done_at).unwrap());
        let task = store.get(&id).unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_completed_at_invariant(&store);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        let id = store.add(input("t"), now).id.clone();
        store.add(input("keep"), now);

        assert!(store.remove(&id));
        assert_eq!(store.len(), 1);

        // Second removal: silent no-op
        assert!(!store.remove(&id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn operations_on_removed_id_leave_collection_untouched() {
        let mut store = TaskStore::new();
        let now = fixed_now();
        let id = store.add(input("gone"), now).id.clone();
        store.add(input("keep"), now);
        store.remove(&id);

        assert!(matches!(
            store.update(&id, TaskPatch::default(), now),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.toggle_complete(&id, now),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "keep");
    }
}
