use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::{optional_text, render_fetch_alert, sort_header, table_title};
use crate::api::Resource;
use crate::app::App;
use crate::models::MetricSortColumn;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let area = render_fetch_alert(frame, app, Resource::Metrics, area);
    let view = &app.metric_view;
    let header_for = |label: &str, column: MetricSortColumn| {
        Cell::from(sort_header(label, view.sort_column == column, view.sort_ascending))
    };

    let header = Row::new([
        header_for("Business Unit", MetricSortColumn::BusinessUnit),
        header_for("Name", MetricSortColumn::Name),
        header_for("Category", MetricSortColumn::Category),
        Cell::from("Type"),
        header_for("Value", MetricSortColumn::Value),
        header_for("Unit", MetricSortColumn::Unit),
        header_for("Year", MetricSortColumn::Year),
        Cell::from("Period"),
        header_for("Verified", MetricSortColumn::Verified),
        Cell::from("Description"),
        Cell::from("Source"),
    ])
    .style(styles::title_style())
    .height(1);

    let sorted = app.sorted_metrics();
    let range = view.page_range(sorted.len(), app.page_size);
    let page_start = range.start;

    let rows: Vec<Row> = sorted[range]
        .iter()
        .map(|metric| {
            let verified_style = if metric.is_verified {
                styles::success_style()
            } else {
                styles::muted_style()
            };
            Row::new(vec![
                Cell::from(app.store.business_unit_label(metric.business_unit)),
                Cell::from(metric.name.as_str()),
                Cell::from(metric.esg_category.code()),
                Cell::from(metric.metric_type.as_str()),
                Cell::from(metric.value_display()),
                Cell::from(metric.unit_of_measurement.code()),
                Cell::from(metric.reporting_year.to_string()),
                Cell::from(metric.reporting_period.as_str()),
                Cell::from(metric.verified_display()).style(verified_style),
                Cell::from(optional_text(&metric.description)),
                Cell::from(optional_text(&metric.data_source)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(15),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ];

    let title = table_title(
        app,
        "Metrics",
        Resource::Metrics,
        view,
        sorted.len(),
        "[b]usiness unit [n]ame [c]ategory [v]alue [u]nit [y]ear veri[f]ied",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{EsgCategory, MeasurementUnit, Metric};
    use crate::ui::tabs::render_to_text;

    #[test]
    fn test_row_shows_every_metric_field() {
        let mut app = App::new(&Config::default()).unwrap();
        app.store.metrics.items = vec![Metric {
            id: 3,
            business_unit: 99,
            name: "Energy use".to_string(),
            esg_category: EsgCategory::Environmental,
            metric_type: "Scope 2".to_string(),
            unit_of_measurement: MeasurementUnit::Kwh,
            value: 1250.5,
            reporting_year: 2024,
            reporting_period: "Q1".to_string(),
            is_verified: true,
            description: Some("Grid".to_string()),
            data_source: Some("Meter".to_string()),
        }];

        let text = render_to_text(&app, 200, 8, render);
        for expected in [
            "99",
            "Energy use",
            "ENVIRONMENTAL",
            "Scope 2",
            "1250.5",
            "KWH",
            "2024",
            "Q1",
            "Yes",
            "Grid",
            "Meter",
        ] {
            assert!(text.contains(expected), "missing {:?} in:\n{}", expected, text);
        }
        // Value and unit sit in separate cells
        assert!(!text.contains("1250.5 KWH"));
    }
}
