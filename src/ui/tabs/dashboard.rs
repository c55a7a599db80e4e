use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::store::summary::{deadlines, DashboardCounts};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Counters across the top, deadlines below
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_counters(frame, app, chunks[0]);
    render_deadlines(frame, app, chunks[1]);
}

fn render_counters(frame: &mut Frame, app: &App, area: Rect) {
    let counts = DashboardCounts::from_store(&app.store);
    let cards = [
        ("Total Companies", counts.companies),
        ("Total Business Units", counts.business_units),
        ("Total Metrics", counts.metrics),
        ("Verified Metrics", counts.verified_metrics),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), column) in cards.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(value.to_string(), styles::highlight_style())),
            Line::from(Span::styled(*label, styles::muted_style())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_deadlines(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Upcoming Reporting Deadlines ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let companies = deadlines(&app.store.companies.items);
    if companies.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No companies found.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new([
        Cell::from("Company"),
        Cell::from("Sector"),
        Cell::from("Period Start"),
        Cell::from("Period End"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = companies
        .iter()
        .map(|company| {
            Row::new(vec![
                Cell::from(company.name.as_str()),
                Cell::from(company.sector.code()),
                Cell::from(company.reporting_period_start.as_str()),
                Cell::from(company.reporting_period_end.as_str()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
