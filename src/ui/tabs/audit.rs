use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.store.audit.entries();
    let block = Block::default()
        .title(format!(" Audit Log ({}) ", entries.len()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No activity yet.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([Cell::from("Time"), Cell::from("Action"), Cell::from("Details")])
        .style(styles::title_style());

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let action_style = if entry.action.starts_with("Deleted") {
                styles::error_style()
            } else {
                styles::success_style()
            };
            Row::new(vec![
                Cell::from(entry.timestamp.as_str()).style(styles::muted_style()),
                Cell::from(entry.action.as_str()).style(action_style),
                Cell::from(entry.details.as_str()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(22),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.audit_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
