use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::Resource;
use crate::app::{App, AppState, Tab};

use super::styles;
use super::tabs::{audit, business_units, calendar, companies, dashboard, form, metrics};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete { resource, id } => {
            render_delete_overlay(frame, app, resource, id)
        }
        AppState::EditingForm => {
            if let Some(ref active) = app.form {
                let area = centered_rect_fixed(64, form::height(active), frame.area());
                form::render(frame, active, app.submitting, area);
            }
        }
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  ESG Desk";
    let right = format!("{}  [?] Help", app.api.base_url());
    let title_len = title.chars().count() + right.chars().count();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(title_len + 4))),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Calendar => calendar::render(frame, app, area),
        Tab::Companies => companies::render(frame, app, area),
        Tab::BusinessUnits => business_units::render(frame, app, area),
        Tab::Metrics => metrics::render(frame, app, area),
        Tab::AuditLog => audit::render(frame, app, area),
    }
}

/// Status text when no notification is showing.
fn idle_status(app: &App) -> (String, Style) {
    let failed: Vec<&str> = Resource::ALL
        .iter()
        .filter(|r| app.store.fetch_error(**r).is_some())
        .map(|r| r.plural_name())
        .collect();
    if !failed.is_empty() {
        return (
            format!(" Failed to fetch {} ", failed.join(", ")),
            styles::error_style(),
        );
    }
    if Resource::ALL.iter().any(|r| app.store.is_loading(*r)) {
        return (" Loading... ".to_string(), styles::muted_style());
    }
    (" Ready ".to_string(), styles::muted_style())
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.current_tab.resource().is_some() {
        "[+] add | [x] delete | [r]efresh | [q]uit"
    } else {
        "[r]efresh | [q]uit"
    };

    let (left_text, left_style) = match app.notification {
        Some(ref note) if note.message.is_empty() => {
            (format!(" {} ", note.title), styles::notification_style(note.kind))
        }
        Some(ref note) => (
            format!(" {}: {} ", note.title, note.message),
            styles::notification_style(note.kind),
        ),
        None => idle_status(app),
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc.to_string(), styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 30, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  ESG Desk", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-6", "Switch tabs"),
        help_line("←/→ Tab", "Prev/next tab"),
        help_line("↑/↓", "Navigate rows"),
        help_line("[ / ]", "Prev/next page (month on Calendar)"),
        help_line("PgUp/PgDn", "Prev/next page"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("+", "Add a record to the current table"),
        help_line("x / Del", "Delete the selected row"),
        help_line("r", "Refresh all data"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Sorting", styles::highlight_style())),
        help_line("Companies", "n/s/l/b/e"),
        help_line("Units", "c/n/t/l/a"),
        help_line("Metrics", "b/n/c/v/u/y/f"),
        Line::from(Span::styled(
            "  Press a sort key again to reverse",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Calendar", styles::highlight_style())),
        help_line("h/l", "Prev/next day"),
        help_line("↑/↓", "Prev/next week"),
        help_line("t", "Jump to today"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App, resource: Resource, id: i64) {
    let area = centered_rect_fixed(46, 8, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   Delete {}?", resource.entity_name().to_lowercase()),
            styles::highlight_style(),
        )),
        Line::from(Span::styled(
            format!("   {}", app.store.display_name(resource, id)),
            styles::list_item_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
