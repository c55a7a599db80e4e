use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{optional_text, render_fetch_alert, sort_header, table_title};
use crate::api::Resource;
use crate::app::App;
use crate::models::BusinessUnitSortColumn;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let area = render_fetch_alert(frame, app, Resource::BusinessUnits, area);
    let view = &app.business_unit_view;
    let header_for = |label: &str, column: BusinessUnitSortColumn| {
        Cell::from(sort_header(label, view.sort_column == column, view.sort_ascending))
    };

    let header = Row::new([
        header_for("Company", BusinessUnitSortColumn::Company),
        header_for("Name", BusinessUnitSortColumn::Name),
        header_for("Type", BusinessUnitSortColumn::Type),
        header_for("Location", BusinessUnitSortColumn::Location),
        header_for("Active", BusinessUnitSortColumn::Active),
        Cell::from("Description"),
    ])
    .style(styles::title_style())
    .height(1);

    let sorted = app.sorted_business_units();
    let range = view.page_range(sorted.len(), app.page_size);
    let page_start = range.start;

    let rows: Vec<Row> = sorted[range]
        .iter()
        .map(|unit| {
            let active_style = if unit.is_active {
                styles::success_style()
            } else {
                styles::muted_style()
            };
            Row::new(vec![
                Cell::from(app.store.company_name(unit.company)),
                Cell::from(unit.name.as_str()),
                Cell::from(unit.unit_type.code()),
                Cell::from(unit.location.as_str()),
                Cell::from(unit.active_display()).style(active_style),
                Cell::from(optional_text(&unit.description)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Fill(2),
    ];

    let title = table_title(
        app,
        "Business Units",
        Resource::BusinessUnits,
        view,
        sorted.len(),
        "[c]ompany [n]ame [t]ype [l]ocation [a]ctive",
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
