//! Per-tab content rendering.

pub mod audit;
pub mod business_units;
pub mod calendar;
pub mod companies;
pub mod dashboard;
pub mod form;
pub mod metrics;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::Resource;
use crate::app::{App, TableView};
use crate::ui::styles;

/// Reserve a line above a table for its fetch alert, if there is one.
/// Returns the area left for the table.
pub fn render_fetch_alert(frame: &mut Frame, app: &App, resource: Resource, area: Rect) -> Rect {
    let Some(error) = app.store.fetch_error(resource) else {
        return area;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let alert = Line::from(vec![
        Span::styled(" ⚠ ", styles::error_style()),
        Span::styled(error.to_string(), styles::error_style()),
        Span::styled("  [r] to retry", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(alert), chunks[0]);
    chunks[1]
}

/// Block title for a paginated table, e.g. ` Companies (12) - [n]ame ... - Page 1/2 `.
pub fn table_title<C>(
    app: &App,
    name: &str,
    resource: Resource,
    view: &TableView<C>,
    total: usize,
    sort_help: &str,
) -> String {
    let page = view.page(app.page_size) + 1;
    let pages = TableView::<C>::page_count(total, app.page_size);
    let loading = if app.store.is_loading(resource) {
        " - Loading..."
    } else {
        ""
    };
    format!(
        " {} ({}) - {} - Page {}/{}{} ",
        name, total, sort_help, page, pages, loading
    )
}

/// Cell text for an optional free-text field.
pub fn optional_text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Header label with a direction arrow on the active sort column.
pub fn sort_header(label: &str, active: bool, ascending: bool) -> String {
    match (active, ascending) {
        (true, true) => format!("{} ▲", label),
        (true, false) => format!("{} ▼", label),
        (false, _) => label.to_string(),
    }
}

/// Render one tab into an off-screen buffer and return its text, row by row.
#[cfg(test)]
pub(crate) fn render_to_text(
    app: &App,
    width: u16,
    height: u16,
    render: fn(&mut Frame, &App, Rect),
) -> String {
    use ratatui::{backend::TestBackend, Terminal};

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render(frame, app, frame.area())).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
