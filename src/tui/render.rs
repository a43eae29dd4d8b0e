use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::task::Task;
use crate::ops::project::{FilterMode, project};
use crate::tui::form::{FormField, TaskForm};
use crate::util::unicode;

use super::app::{App, Mode};

/// Main render function, dispatches to the section renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | stats | filter bar | task list | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_stats_row(frame, app, chunks[1]);
    render_filter_bar(frame, app, chunks[2]);
    render_task_list(frame, app, chunks[3]);
    render_status_row(frame, app, chunks[4]);

    // Popups (rendered on top of everything)
    if app.form.is_some() {
        render_form_popup(frame, app, area);
    }
    if app.pending_delete.is_some() {
        render_confirm_popup(frame, app, area);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.store.len();
    let noun = if count == 1 { "task" } else { "tasks" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.config.project.name),
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("— {} {} total", count, noun),
            Style::default().fg(app.theme.dim),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_stats_row(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let sep = Span::styled("  ", Style::default());
    let line = Line::from(vec![
        Span::styled(
            format!(" {} done", stats.completed),
            Style::default().fg(app.theme.green),
        ),
        sep.clone(),
        Span::styled(
            format!("{} pending", stats.pending),
            Style::default().fg(app.theme.yellow),
        ),
        sep,
        Span::styled(
            format!("{} overdue", stats.overdue),
            Style::default().fg(app.theme.red),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for mode in FilterMode::ALL_MODES {
        let style = if mode == app.filter {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw(" "));
    }

    // Search indicator: live input while typing, committed term otherwise
    match app.mode {
        Mode::Search => {
            spans.push(Span::styled(
                format!("/{}", app.search_input),
                Style::default().fg(app.theme.highlight),
            ));
            spans.push(Span::styled(
                "▏",
                Style::default().fg(app.theme.highlight),
            ));
        }
        _ if !app.search.is_empty() => {
            spans.push(Span::styled(
                format!("/{}", app.search),
                Style::default().fg(app.theme.highlight),
            ));
        }
        _ => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let today = app.today();
    let visible: Vec<Task> = project(
        app.store.tasks(),
        app.filter,
        app.effective_search(),
        today,
    )
    .into_iter()
    .cloned()
    .collect();

    if visible.is_empty() {
        render_empty_state(frame, app, area);
        return;
    }

    // Keep the cursor within the viewport
    let height = area.height as usize;
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let mut lines = Vec::new();
    for (i, task) in visible.iter().enumerate().skip(app.scroll_offset).take(height) {
        lines.push(task_line(app, task, i == app.cursor, area.width, today));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn task_line<'a>(
    app: &App,
    task: &Task,
    selected: bool,
    width: u16,
    today: chrono::NaiveDate,
) -> Line<'a> {
    let theme = &app.theme;
    let base = if selected {
        Style::default().bg(theme.selection_bg)
    } else {
        Style::default()
    };
    let title_style = if task.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        base.fg(theme.text)
    };

    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut spans = vec![
        Span::styled(if selected { "▸ " } else { "  " }, base.fg(theme.highlight)),
        Span::styled(check.to_string(), base.fg(theme.text)),
    ];

    // Right-hand metadata: category, priority badge, due date
    let category = format!(" #{}", task.category);
    let badge = format!(" !{}", task.priority.label());
    let mut due_text = String::new();
    if let Some(due) = task.due_date {
        due_text.push_str(&format!(" due:{}", due));
    }
    let overdue = task.is_overdue(today);
    if overdue {
        due_text.push_str(" (overdue)");
    }

    // Truncate the title so the metadata stays visible
    let meta_width =
        unicode::display_width(&category) + unicode::display_width(&badge) + unicode::display_width(&due_text);
    let title_budget = (width as usize).saturating_sub(6 + meta_width);
    let title = unicode::truncate_to_width(&task.title, title_budget);

    spans.push(Span::styled(title, title_style));
    spans.push(Span::styled(category, base.fg(theme.dim)));
    spans.push(Span::styled(
        badge,
        base.fg(theme.priority_color(task.priority)),
    ));
    if !due_text.is_empty() {
        let due_style = if overdue {
            base.fg(theme.red)
        } else {
            base.fg(theme.dim)
        };
        spans.push(Span::styled(due_text, due_style));
    }

    Line::from(spans)
}

/// Empty-state messaging: distinguishes "nothing matched" from "nothing yet"
fn render_empty_state(frame: &mut Frame, app: &App, area: Rect) {
    let searching = !app.effective_search().is_empty();
    let (headline, hint) = if searching || !app.store.is_empty() {
        (
            "No matching tasks found",
            "Try adjusting your search or filter",
        )
    } else {
        ("No tasks yet", "Press a to add your first task")
    };

    let lines = vec![
        Line::default(),
        Line::styled(
            headline,
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(hint, Style::default().fg(app.theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(status) = &app.status {
        status.clone()
    } else if !app.config.ui.show_key_hints {
        String::new()
    } else {
        match app.mode {
            Mode::Navigate => {
                " space:toggle  a:add  e:edit  d:delete  /:search  f:filter  q:quit".to_string()
            }
            Mode::Search => " enter:apply  esc:cancel".to_string(),
            Mode::Form => " tab:next field  enter:save  esc:cancel".to_string(),
            Mode::Confirm => " y:delete  any other key:cancel".to_string(),
        }
    };
    frame.render_widget(
        Paragraph::new(Line::styled(text, Style::default().fg(app.theme.dim))),
        area,
    );
}

// ---------------------------------------------------------------------------
// Popups
// ---------------------------------------------------------------------------

/// A centered rect of the given size, clamped to the screen
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let popup = centered_rect(52, 12, area);
    frame.render_widget(Clear, popup);

    let title = if form.is_editing() {
        " Edit Task "
    } else {
        " New Task "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .style(Style::default().bg(app.theme.background));

    let mut lines = Vec::new();
    for field in [
        FormField::Title,
        FormField::Description,
        FormField::Category,
        FormField::DueDate,
        FormField::Priority,
    ] {
        lines.push(form_field_line(app, form, field));
    }
    lines.push(Line::default());
    if let Some(error) = &form.error {
        lines.push(Line::styled(
            format!(" {}", error),
            Style::default().fg(app.theme.red),
        ));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn form_field_line<'a>(app: &App, form: &TaskForm, field: FormField) -> Line<'a> {
    let focused = form.focus == field;
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim)
    };
    let value_style = if focused {
        Style::default().fg(app.theme.text_bright)
    } else {
        Style::default().fg(app.theme.text)
    };

    let mut value = unicode::truncate_to_width(form.field_text(field), 36);
    if focused && field != FormField::Priority {
        value.push('▏');
    }
    if field == FormField::Priority && focused {
        value.push_str("  (space to change)");
    }

    Line::from(vec![
        Span::styled(format!(" {:<12}", field.label()), label_style),
        Span::styled(value, value_style),
    ])
}

fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(id) = app.pending_delete.as_ref() else {
        return;
    };
    let title = app
        .store
        .get(id)
        .map(|t| t.title.clone())
        .unwrap_or_else(|| id.clone());

    let popup = centered_rect(46, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Delete Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red))
        .style(Style::default().bg(app.theme.background));

    let lines = vec![
        Line::styled(
            format!(" Delete \"{}\"?", unicode::truncate_to_width(&title, 36)),
            Style::default().fg(app.theme.text_bright),
        ),
        Line::styled(
            " This cannot be undone. [y/N]",
            Style::default().fg(app.theme.dim),
        ),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
