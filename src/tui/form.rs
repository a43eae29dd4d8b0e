use chrono::NaiveDate;

use crate::model::config::TaskDefaults;
use crate::model::task::{Priority, Task, TaskInput, TaskPatch};
use crate::util::unicode;

/// Fields of the add/edit form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Category,
    DueDate,
    Priority,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Category => "Category",
            FormField::DueDate => "Due date",
            FormField::Priority => "Priority",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::DueDate,
            FormField::DueDate => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Title => FormField::Priority,
            FormField::Description => FormField::Title,
            FormField::Category => FormField::Description,
            FormField::DueDate => FormField::Category,
            FormField::Priority => FormField::DueDate,
        }
    }
}

/// State of the add/edit popup. This is the "form collaborator": it validates
/// user input and hands the store a clean `TaskInput`/`TaskPatch`.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// `Some(id)` when editing an existing task, `None` when adding
    pub editing: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Free text, validated as YYYY-MM-DD on submit; empty = no deadline
    pub due: String,
    pub priority: Priority,
    pub focus: FormField,
    /// Validation message shown until the next keypress
    pub error: Option<String>,
}

/// What a validated form submission produces
#[derive(Debug, Clone)]
pub enum FormOutput {
    Create(TaskInput),
    Edit(String, TaskPatch),
}

impl TaskForm {
    /// Blank form for adding a task, pre-filled from config defaults
    pub fn blank(defaults: &TaskDefaults) -> Self {
        TaskForm {
            editing: None,
            title: String::new(),
            description: String::new(),
            category: defaults.default_category.clone(),
            due: String::new(),
            priority: defaults.default_priority,
            focus: FormField::Title,
            error: None,
        }
    }

    /// Form pre-filled with an existing task's fields
    pub fn for_task(task: &Task) -> Self {
        TaskForm {
            editing: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            due: task.due_date.map(|d| d.to_string()).unwrap_or_default(),
            priority: task.priority,
            focus: FormField::Title,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Category => Some(&mut self.category),
            FormField::DueDate => Some(&mut self.due),
            FormField::Priority => None,
        }
    }

    /// Text of the focused field for rendering (priority shows its label)
    pub fn focused_text(&self) -> &str {
        match self.focus {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Category => &self.category,
            FormField::DueDate => &self.due,
            FormField::Priority => self.priority.label(),
        }
    }

    pub fn field_text(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Category => &self.category,
            FormField::DueDate => &self.due,
            FormField::Priority => self.priority.label(),
        }
    }

    /// Insert a character into the focused text field. On the priority field
    /// a space cycles the value instead.
    pub fn insert_char(&mut self, c: char) {
        self.error = None;
        if self.focus == FormField::Priority {
            if c == ' ' {
                self.priority = self.priority.next();
            }
            return;
        }
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        if let Some(text) = self.focused_text_mut() {
            unicode::pop_grapheme(text);
        }
    }

    pub fn cycle_priority(&mut self) {
        if self.focus == FormField::Priority {
            self.priority = self.priority.next();
        }
    }

    /// Validate and produce the store payload. On failure the message is also
    /// stashed in `self.error` so the popup can show it.
    pub fn submit(&mut self) -> Result<FormOutput, String> {
        let result = self.validate();
        if let Err(ref msg) = result {
            self.error = Some(msg.clone());
        }
        result
    }

    fn validate(&self) -> Result<FormOutput, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title is required".to_string());
        }

        let due = self.due.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(due, "%Y-%m-%d")
                    .map_err(|_| format!("invalid due date '{}' (expected YYYY-MM-DD)", due))?,
            )
        };

        match &self.editing {
            None => Ok(FormOutput::Create(TaskInput {
                title: title.to_string(),
                description: self.description.clone(),
                priority: self.priority,
                due_date,
                category: Some(self.category.trim().to_string()),
            })),
            // The form submits every field, like the add path; the store
            // stamps updatedAt once for the batch.
            Some(id) => Ok(FormOutput::Edit(
                id.clone(),
                TaskPatch {
                    title: Some(title.to_string()),
                    description: Some(self.description.clone()),
                    priority: Some(self.priority),
                    due_date: Some(due_date),
                    category: Some(self.category.trim().to_string()),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn defaults() -> TaskDefaults {
        TaskDefaults::default()
    }

    #[test]
    fn blank_form_uses_config_defaults() {
        let form = TaskForm::blank(&TaskDefaults {
            default_category: "work".into(),
            default_priority: Priority::High,
        });
        assert_eq!(form.category, "work");
        assert_eq!(form.priority, Priority::High);
        assert!(!form.is_editing());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut form = TaskForm::blank(&defaults());
        form.title = "   ".into();
        assert!(form.submit().is_err());
        assert!(form.error.is_some());
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let mut form = TaskForm::blank(&defaults());
        form.title = "t".into();
        form.due = "next tuesday".into();
        assert!(form.submit().is_err());
    }

    #[test]
    fn valid_create_produces_input() {
        let mut form = TaskForm::blank(&defaults());
        form.title = "  Buy milk  ".into();
        form.due = "2026-08-29".into();
        form.priority = Priority::High;

        match form.submit().unwrap() {
            FormOutput::Create(input) => {
                assert_eq!(input.title, "Buy milk");
                assert_eq!(input.due_date, NaiveDate::from_ymd_opt(2026, 8, 29));
                assert_eq!(input.priority, Priority::High);
            }
            other => panic!("expected Create, got {:?}", other),
        }
    }

    #[test]
    fn edit_form_round_trips_task_fields() {
        let task = Task {
            id: "42".into(),
            title: "Write report".into(),
            description: "quarterly".into(),
            category: "work".into(),
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap(),
            updated_at: None,
            completed_at: None,
        };

        let mut form = TaskForm::for_task(&task);
        assert_eq!(form.due, "2026-09-01");

        // Clearing the due field clears the deadline on submit
        form.due.clear();
        match form.submit().unwrap() {
            FormOutput::Edit(id, patch) => {
                assert_eq!(id, "42");
                assert_eq!(patch.title, Some("Write report".into()));
                assert_eq!(patch.due_date, Some(None));
            }
            other => panic!("expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn tab_order_cycles_through_all_fields() {
        let mut field = FormField::Title;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Priority);
    }

    #[test]
    fn space_cycles_priority_only_when_focused() {
        let mut form = TaskForm::blank(&defaults());
        form.focus = FormField::Priority;
        form.insert_char(' ');
        assert_eq!(form.priority, Priority::High); // medium → high

        form.focus = FormField::Title;
        form.insert_char(' ');
        assert_eq!(form.title, " ");
        assert_eq!(form.priority, Priority::High);
    }
}
