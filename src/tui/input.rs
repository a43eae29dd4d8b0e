use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::project::FilterMode;
use crate::util::unicode;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Cursor movement
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible_len();
            if len > 0 && app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_len().saturating_sub(1);
        }

        // Mutations
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('a') => app.open_add_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_selected(),

        // Filter
        KeyCode::Char('f') | KeyCode::Tab => {
            app.filter = app.filter.next();
            app.clamp_cursor();
        }
        KeyCode::Char('1') => set_filter(app, FilterMode::All),
        KeyCode::Char('2') => set_filter(app, FilterMode::Completed),
        KeyCode::Char('3') => set_filter(app, FilterMode::Pending),
        KeyCode::Char('4') => set_filter(app, FilterMode::Overdue),

        // Search
        KeyCode::Char('/') => {
            app.search_input = app.search.clone();
            app.mode = Mode::Search;
        }
        KeyCode::Esc => {
            if !app.search.is_empty() {
                app.search.clear();
                app.clamp_cursor();
            }
        }

        _ => {}
    }
}

fn set_filter(app: &mut App, filter: FilterMode) {
    app.filter = filter;
    app.clamp_cursor();
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Abandon the draft; the committed term still applies
            app.search_input.clear();
            app.mode = Mode::Navigate;
            app.clamp_cursor();
        }
        KeyCode::Enter => {
            app.search = std::mem::take(&mut app.search_input);
            app.mode = Mode::Navigate;
            app.cursor = 0;
            app.scroll_offset = 0;
        }
        KeyCode::Backspace => {
            unicode::pop_grapheme(&mut app.search_input);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.cursor = 0;
        }
        _ => {}
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Left | KeyCode::Right => form.cycle_priority(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        _ => {}
    }
}

fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        _ => app.cancel_delete(),
    }
}
