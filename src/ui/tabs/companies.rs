use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{optional_text, render_fetch_alert, sort_header, table_title};
use crate::api::Resource;
use crate::app::App;
use crate::models::CompanySortColumn;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let area = render_fetch_alert(frame, app, Resource::Companies, area);
    let view = &app.company_view;
    let header_for = |label: &str, column: CompanySortColumn| {
        Cell::from(sort_header(label, view.sort_column == column, view.sort_ascending))
    };

    // Header row
    let header = Row::new([
        header_for("Name", CompanySortColumn::Name),
        header_for("Sector", CompanySortColumn::Sector),
        header_for("Location", CompanySortColumn::Location),
        header_for("Period Start", CompanySortColumn::Start),
        header_for("Period End", CompanySortColumn::End),
        Cell::from("Description"),
    ])
    .style(styles::title_style())
    .height(1);

    let sorted = app.sorted_companies();
    let range = view.page_range(sorted.len(), app.page_size);
    let page_start = range.start;

    // Data rows
    let rows: Vec<Row> = sorted[range]
        .iter()
        .map(|company| {
            Row::new(vec![
                Cell::from(company.name.as_str()),
                Cell::from(company.sector.code()),
                Cell::from(company.location.as_str()),
                Cell::from(company.reporting_period_start.as_str()),
                Cell::from(company.reporting_period_end.as_str()),
                Cell::from(optional_text(&company.description)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(22),
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Fill(2),
    ];

    let title = table_title(
        app,
        "Companies",
        Resource::Companies,
        view,
        sorted.len(),
        "[n]ame [s]ector [l]ocation [b]egin [e]nd",
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !sorted.is_empty() {
        state.select(Some(view.selection.saturating_sub(page_start)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
