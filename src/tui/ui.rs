use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::format::{format_timestamp, time_since};
use crate::models::{Counters, FormField, Task, TaskStatus};
use crate::store::TaskForm;
use crate::tui::app::{App, InputMode};
use crate::tui::theme;

const PROGRESS_WIDTH: usize = 30;

pub fn draw(frame: &mut Frame, app: &mut App) {
    // Fill the entire background
    let bg_block = Block::default().style(Style::default().bg(theme::BG));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_stats(frame, &app.store.counters, chunks[1]);
    draw_filters(frame, app, chunks[2]);
    draw_tasks(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    match app.mode() {
        InputMode::Editor => {
            if let Some(form) = &app.store.editor {
                draw_editor(frame, form);
            }
        }
        InputMode::TaskDetail => {
            if let Some(task) = app.selected_task() {
                draw_detail(frame, task);
            }
        }
        InputMode::ConfirmDelete => draw_confirm_delete(frame, app),
        InputMode::HelpOverlay => draw_help(frame),
        InputMode::Normal | InputMode::Search => {}
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let title_fg = if focused {
        theme::NEON_CYAN
    } else {
        theme::BORDER_DIM
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(Span::styled(
            title,
            Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::BG))
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {} ", theme::HEADER_ART),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme::BORDER_DIM)),
        Span::styled(app.base_url(), Style::default().fg(theme::NEON_MAGENTA)),
    ]))
    .block(panel("", false));
    frame.render_widget(header, area);
}

fn counter_span(label: &str, value: u64, style: Style) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{label} "), Style::default().fg(theme::TEXT_DIM)),
        Span::styled(value.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::raw("   "),
    ]
}

fn draw_stats(frame: &mut Frame, counters: &Counters, area: Rect) {
    let mut counts = Vec::new();
    counts.extend(counter_span(
        "Total",
        counters.total,
        Style::default().fg(theme::TEXT_BRIGHT),
    ));
    counts.extend(counter_span(
        TaskStatus::Pending.label(),
        counters.pending,
        theme::status_style(&TaskStatus::Pending),
    ));
    counts.extend(counter_span(
        TaskStatus::InProgress.label(),
        counters.in_progress,
        theme::status_style(&TaskStatus::InProgress),
    ));
    counts.extend(counter_span(
        TaskStatus::Completed.label(),
        counters.completed,
        theme::status_style(&TaskStatus::Completed),
    ));

    let mut lines = vec![Line::from(counts)];
    if counters.total > 0 {
        let percent = counters.completion_percentage();
        lines.push(Line::from(vec![
            Span::styled(
                theme::progress_bar(percent, PROGRESS_WIDTH),
                Style::default().fg(theme::NEON_GREEN),
            ),
            Span::styled(
                format!(
                    " {percent}%  ({} of {} completed)",
                    counters.completed, counters.total
                ),
                Style::default().fg(theme::TEXT_DIM),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(panel(" Stats ", false)), area);
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.mode() == InputMode::Search;
    let filter = &app.store.filter;

    let search_text = if filter.search.is_empty() && !searching {
        Span::styled("(none)", Style::default().fg(theme::BORDER_DIM))
    } else {
        Span::styled(filter.search.clone(), Style::default().fg(theme::TEXT_BRIGHT))
    };

    let mut spans = vec![
        Span::styled("Status: ", Style::default().fg(theme::TEXT_DIM)),
        Span::styled(
            filter.status.label(),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Search: ", Style::default().fg(theme::TEXT_DIM)),
        search_text,
    ];
    if searching {
        spans.push(Span::styled("▏", Style::default().fg(theme::NEON_CYAN)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(" Filter ", searching)),
        area,
    );
}

fn task_item<'a>(task: &'a Task, selected: bool, now: chrono::DateTime<Local>) -> ListItem<'a> {
    let marker = if selected { "▸ " } else { "  " };
    let marker_style = if selected {
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_DIM)
    };
    let title_fg = if selected {
        theme::TEXT_BRIGHT
    } else {
        theme::TEXT_DIM
    };
    let status_style = theme::status_style(&task.status);

    let mut lines = vec![Line::from(vec![
        Span::styled(marker, marker_style),
        Span::styled(format!("{} ", theme::status_symbol(&task.status)), status_style),
        Span::styled(task.title.as_str(), Style::default().fg(title_fg)),
        Span::styled(format!("  [{}]", task.status.label()), status_style),
    ])];

    if !task.description.is_empty() {
        let first_line = task.description.lines().next().unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("    {first_line}"),
            Style::default().fg(theme::TEXT_DIM),
        )));
    }

    let mut when = Vec::new();
    if let Some(created) = task.created_at.as_deref().and_then(|ts| time_since(ts, now)) {
        when.push(format!("Created {created}"));
    }
    if task.was_updated()
        && let Some(updated) = task.updated_at.as_deref().and_then(|ts| time_since(ts, now))
    {
        when.push(format!("Updated {updated}"));
    }
    if !when.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("    {}", when.join(" • ")),
            Style::default().fg(theme::BORDER_DIM),
        )));
    }

    ListItem::new(lines)
}

fn draw_tasks(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(" Tasks ({}) ", app.store.tasks.len());
    let block = panel(&title, app.mode() == InputMode::Normal);

    if app.store.loading && app.store.tasks.is_empty() {
        let loading = Paragraph::new(Span::styled(
            "  Loading…",
            Style::default().fg(theme::TEXT_DIM),
        ))
        .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if app.store.tasks.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "  No tasks found",
                Style::default()
                    .fg(theme::TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  Create your first task with n, or adjust the filters.",
                Style::default().fg(theme::TEXT_DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    app.list_state.select(Some(app.selected_idx));
    let now = Local::now();
    let items: Vec<ListItem> = app
        .store
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_item(task, i == app.selected_idx, now))
        .collect();

    frame.render_stateful_widget(List::new(items).block(block), area, &mut app.list_state);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.mode() {
        InputMode::Search => "  type to search  Backspace: delete  Ctrl-U: clear  Enter/Esc: done",
        InputMode::Editor => "  Tab: next field  ←/→: status  Enter: save  Esc: cancel",
        InputMode::ConfirmDelete => "  y: delete  n/Esc: keep",
        _ => "  n: new  e: edit  d: delete  f: status  /: search  x: reset  r: reload  ?: help  q: quit",
    };
    let mut spans = vec![Span::styled(help, Style::default().fg(theme::TEXT_DIM))];
    if app.store.loading {
        spans.push(Span::styled("  ⟳", Style::default().fg(theme::NEON_CYAN)));
    }

    let footer = Paragraph::new(Line::from(spans)).block(panel(" Help ", false));
    frame.render_widget(footer, area);
}

/// A rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn field_label(form: &TaskForm, field: FormField, label: &'static str) -> Span<'static> {
    let style = if form.focus == field {
        Style::default()
            .fg(theme::NEON_CYAN)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_DIM)
    };
    Span::styled(label, style)
}

fn draw_editor(frame: &mut Frame, form: &TaskForm) {
    let area = centered_rect(70, 60, frame.area());
    let title = if form.is_edit() {
        " Edit Task "
    } else {
        " New Task "
    };
    let cursor = |field: FormField| if form.focus == field { "▏" } else { "" };

    let mut lines = vec![
        Line::from(vec![
            field_label(form, FormField::Title, "Title* "),
            Span::styled(
                format!("{}/100", form.title.chars().count()),
                Style::default().fg(theme::BORDER_DIM),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}{}", form.title, cursor(FormField::Title)),
            Style::default().fg(theme::TEXT_BRIGHT),
        )),
    ];
    if let Some(err) = form.errors.get(&FormField::Title) {
        lines.push(Line::from(Span::styled(format!("  {err}"), theme::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        field_label(form, FormField::Description, "Description "),
        Span::styled(
            format!("{}/500", form.description.chars().count()),
            Style::default().fg(theme::BORDER_DIM),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}{}", form.description, cursor(FormField::Description)),
        Style::default().fg(theme::TEXT_BRIGHT),
    )));
    if let Some(err) = form.errors.get(&FormField::Description) {
        lines.push(Line::from(Span::styled(format!("  {err}"), theme::error_style())));
    }

    lines.push(Line::from(""));
    let mut status_line = vec![field_label(form, FormField::Status, "Status  ")];
    for status in TaskStatus::ALL {
        let style = if status == form.status {
            theme::status_style(&status).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        status_line.push(Span::styled(format!(" {} ", status.label()), style));
        status_line.push(Span::raw(" "));
    }
    lines.push(Line::from(status_line));

    if form.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Saving…",
            Style::default().fg(theme::NEON_CYAN),
        )));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(title, true)),
        area,
    );
}

fn draw_detail(frame: &mut Frame, task: &Task) {
    let area = centered_rect(60, 50, frame.area());
    let dim = Style::default().fg(theme::TEXT_DIM);
    let bright = Style::default().fg(theme::TEXT_BRIGHT);

    let id = task.id.map(|id| id.to_string()).unwrap_or_default();
    let created = task.created_at.as_deref().map(format_timestamp).unwrap_or_default();
    let updated = task.updated_at.as_deref().map(format_timestamp).unwrap_or_default();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", theme::status_symbol(&task.status)),
                theme::status_style(&task.status),
            ),
            Span::styled(
                task.title.as_str(),
                bright.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("ID       ", dim), Span::styled(id, bright)]),
        Line::from(vec![
            Span::styled("Status   ", dim),
            Span::styled(task.status.label(), theme::status_style(&task.status)),
        ]),
        Line::from(vec![Span::styled("Created  ", dim), Span::styled(created, bright)]),
        Line::from(vec![Span::styled("Updated  ", dim), Span::styled(updated, bright)]),
        Line::from(""),
        Line::from(Span::styled(task.description.as_str(), bright)),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(" Task ", true)),
        area,
    );
}

fn draw_confirm_delete(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, frame.area());
    let title = app
        .store
        .pending_delete
        .and_then(|id| app.store.task(id))
        .map(|t| t.title.as_str())
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this task?",
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(title, Style::default().fg(theme::NEON_PINK))),
        Line::from(""),
        Line::from(Span::styled("y: delete   n: keep", Style::default().fg(theme::TEXT_DIM))),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            panel(" Delete ", true).style(Style::default().bg(theme::DARK_RED)),
        ),
        area,
    );
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());
    let keys = [
        ("j/k ↑/↓", "move selection"),
        ("n", "new task"),
        ("e / Enter", "edit task"),
        ("v", "task details"),
        ("d", "delete task"),
        ("f", "cycle status filter"),
        ("/", "search by title"),
        ("x", "reset filters"),
        ("r", "reload"),
        ("?", "toggle help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!("  {key:<12}"),
                    Style::default()
                        .fg(theme::NEON_CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(theme::TEXT_DIM)),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(panel(" Keys ", true)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 50, area);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 25);
        assert_eq!(inner.x, 25);
    }

    #[test]
    fn task_item_has_description_and_time_lines() {
        let now = Local::now();
        let task = Task {
            id: Some(1),
            title: "Write report".to_string(),
            description: "first line\nsecond line".to_string(),
            status: TaskStatus::InProgress,
            created_at: Some((now - chrono::Duration::days(2)).to_rfc3339()),
            updated_at: Some((now - chrono::Duration::minutes(5)).to_rfc3339()),
        };
        let item = task_item(&task, true, now);
        assert_eq!(item.height(), 3);
    }

    #[test]
    fn task_item_without_description_or_dates_is_one_line() {
        let task = Task {
            id: Some(1),
            title: "Bare".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(task_item(&task, false, Local::now()).height(), 1);
    }
}
