use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store_io::{self, DATA_DIR};
use crate::model::config::Config;
use crate::model::store::TaskStore;
use crate::ops::project::{FilterMode, project};
use crate::ops::stats::{TaskStats, compute_stats};

use super::form::{FormOutput, TaskForm};
use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    Form,
    Confirm,
}

/// Main application state
pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
    pub store: TaskStore,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Active status filter
    pub filter: FilterMode,
    /// Committed search term (applies in Navigate mode)
    pub search: String,
    /// Search mode: query being typed (filters the list live)
    pub search_input: String,
    /// Cursor index into the projected list
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    /// Add/edit form popup
    pub form: Option<TaskForm>,
    /// Task ID pending delete confirmation
    pub pending_delete: Option<String>,
    /// Transient status message (shown in the status row)
    pub status: Option<String>,
}

impl App {
    pub fn new(data_dir: PathBuf, config: Config, store: TaskStore) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            data_dir,
            config,
            store,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            filter: FilterMode::All,
            search: String::new(),
            search_input: String::new(),
            cursor: 0,
            scroll_offset: 0,
            form: None,
            pending_delete: None,
            status: None,
        }
    }

    /// The search term currently in effect: live input while typing, the
    /// committed term otherwise.
    pub fn effective_search(&self) -> &str {
        match self.mode {
            Mode::Search => &self.search_input,
            _ => &self.search,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// IDs of the currently visible tasks, in display order
    pub fn visible_ids(&self) -> Vec<String> {
        project(
            self.store.tasks(),
            self.filter,
            self.effective_search(),
            self.today(),
        )
        .iter()
        .map(|t| t.id.clone())
        .collect()
    }

    pub fn visible_len(&self) -> usize {
        project(
            self.store.tasks(),
            self.filter,
            self.effective_search(),
            self.today(),
        )
        .len()
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(self.store.tasks(), self.today())
    }

    /// ID of the task under the cursor
    pub fn selected_id(&self) -> Option<String> {
        self.visible_ids().get(self.cursor).cloned()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    // -----------------------------------------------------------------------
    // Mutations (each one persists the full collection immediately)
    // -----------------------------------------------------------------------

    /// Write the whole collection; any failure surfaces in the status row
    fn persist(&mut self) {
        if let Err(e) = store_io::save_tasks(&self.data_dir, self.store.tasks()) {
            self.status = Some(format!("save failed: {}", e));
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.toggle_complete(&id, Utc::now()) {
            Ok(completed) => {
                self.persist();
                self.status = Some(if completed {
                    "completed".to_string()
                } else {
                    "reopened".to_string()
                });
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.clamp_cursor();
    }

    pub fn open_add_form(&mut self) {
        self.form = Some(TaskForm::blank(&self.config.tasks));
        self.mode = Mode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(task) = self.store.get(&id) {
            self.form = Some(TaskForm::for_task(task));
            self.mode = Mode::Form;
        }
    }

    /// Submit the form popup; stays open (with an error message) on invalid input
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let output = match form.submit() {
            Ok(output) => output,
            Err(_) => return, // error is displayed by the popup
        };

        match output {
            FormOutput::Create(task_input) => {
                self.store.add(task_input, Utc::now());
                self.cursor = 0; // new task lands at the head
                self.status = Some("added".to_string());
            }
            FormOutput::Edit(id, patch) => match self.store.update(&id, patch, Utc::now()) {
                Ok(()) => self.status = Some("updated".to_string()),
                Err(e) => self.status = Some(e.to_string()),
            },
        }
        self.persist();
        self.close_form();
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = Mode::Navigate;
        self.clamp_cursor();
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::Confirm;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            // Idempotent: a vanished id just means nothing to do
            self.store.remove(&id);
            self.persist();
            self.status = Some("deleted".to_string());
        }
        self.mode = Mode::Navigate;
        self.clamp_cursor();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }
}

/// Restore filter/search/cursor from .state.json
pub fn restore_ui_state(app: &mut App) {
    let Some(ui_state) = read_ui_state(&app.data_dir) else {
        return;
    };
    app.filter = ui_state.filter;
    app.search = ui_state.search;
    app.cursor = ui_state.cursor;
    app.scroll_offset = ui_state.scroll_offset;
    app.clamp_cursor();
}

/// Save filter/search/cursor to .state.json (best effort)
pub fn save_ui_state(app: &App) {
    let ui_state = UiState {
        filter: app.filter,
        search: app.search.clone(),
        cursor: app.cursor,
        scroll_offset: app.scroll_offset,
    };
    let _ = write_ui_state(&app.data_dir, &ui_state);
}

/// Run the TUI application
pub fn run(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Discover and load project
    let start = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let root = store_io::discover_project(&start)?;
    let data_dir = root.join(DATA_DIR);
    let config = config_io::read_config(&data_dir)?;
    let store = TaskStore::from_tasks(store_io::load_tasks(&data_dir));

    let mut app = App::new(data_dir, config, store);
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ProjectInfo;
    use crate::model::task::TaskInput;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_app(tmp: &TempDir) -> App {
        let config = Config {
            project: ProjectInfo {
                name: "Test".into(),
            },
            tasks: Default::default(),
            ui: Default::default(),
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        let mut store = TaskStore::new();
        store.add(
            TaskInput {
                title: "Write report".into(),
                ..Default::default()
            },
            now,
        );
        store.add(
            TaskInput {
                title: "Buy milk".into(),
                category: Some("shopping".into()),
                ..Default::default()
            },
            now,
        );
        App::new(tmp.path().to_path_buf(), config, store)
    }

    #[test]
    fn live_search_input_drives_the_projection() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);

        app.mode = Mode::Search;
        app.search_input = "milk".into();
        assert_eq!(app.visible_ids().len(), 1);

        // Back in Navigate mode only the committed term applies
        app.mode = Mode::Navigate;
        assert_eq!(app.visible_ids().len(), 2);
    }

    #[test]
    fn toggle_selected_persists_to_disk() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);

        app.toggle_selected();
        assert!(app.store.tasks()[0].completed);

        // The mutation reached tasks.json
        let on_disk = crate::io::store_io::load_tasks(tmp.path());
        assert!(on_disk[0].completed);
    }

    #[test]
    fn confirm_delete_removes_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);

        app.request_delete_selected();
        assert_eq!(app.mode, Mode::Confirm);
        app.confirm_delete();

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(crate::io::store_io::load_tasks(tmp.path()).len(), 1);
    }

    #[test]
    fn submitting_invalid_form_keeps_it_open() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);

        app.open_add_form();
        app.submit_form(); // empty title
        assert!(app.form.is_some());
        assert!(app.form.as_ref().unwrap().error.is_some());
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn submitting_valid_form_adds_at_head_and_resets_cursor() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.cursor = 1;

        app.open_add_form();
        for c in "Call dentist".chars() {
            app.form.as_mut().unwrap().insert_char(c);
        }
        app.submit_form();

        assert!(app.form.is_none());
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.store.tasks()[0].title, "Call dentist");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn clamp_cursor_handles_shrinking_projection() {
        let tmp = TempDir::new().unwrap();
        let mut app = test_app(&tmp);
        app.cursor = 1;

        app.search = "milk".into();
        app.clamp_cursor();
        assert_eq!(app.cursor, 0);
    }
}
