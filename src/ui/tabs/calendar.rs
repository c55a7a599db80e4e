use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::store::summary::{days_in_month, marks_on, month_start, PeriodBoundary};
use crate::ui::styles;

const WEEKDAY_HEADER: &str = " Sun Mon Tue Wed Thu Fri Sat";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(area);

    render_month(frame, app, chunks[0]);
    render_day(frame, app, chunks[1]);
}

fn render_month(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.calendar_date;
    let companies = &app.store.companies.items;

    let mut lines = vec![
        Line::from(Span::styled(WEEKDAY_HEADER, styles::muted_style())),
    ];

    for week in month_weeks(selected) {
        let mut spans = Vec::with_capacity(7);
        for day in week {
            match day.and_then(|d| selected.with_day(d)) {
                Some(date) => {
                    let marked = !marks_on(companies, date).is_empty();
                    let style = styles::calendar_day_style(date == selected, marked);
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(format!("{:>3}", date.day()), style));
                }
                None => spans.push(Span::raw("    ")),
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " h/l day  ↑/↓ week  [/] month",
        styles::muted_style(),
    )));
    lines.push(Line::from(Span::styled(" t today", styles::muted_style())));

    let block = Block::default()
        .title(format!(" {} ", selected.format("%B %Y")))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_day(frame: &mut Frame, app: &App, area: Rect) {
    let marks = marks_on(&app.store.companies.items, app.calendar_date);

    let lines: Vec<Line> = if marks.is_empty() {
        vec![Line::from(Span::styled(
            "No reporting period boundaries on this day.",
            styles::muted_style(),
        ))]
    } else {
        marks
            .iter()
            .map(|mark| {
                let style = match mark.boundary {
                    PeriodBoundary::Start => styles::success_style(),
                    PeriodBoundary::End => styles::error_style(),
                };
                Line::from(Span::styled(mark.text(), style))
            })
            .collect()
    };

    let block = Block::default()
        .title(format!(" {} ", app.calendar_date.format("%A, %b %d, %Y")))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Day numbers of the month containing `date`, laid out in Sunday-first weeks.
fn month_weeks(date: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let first = month_start(date);
    let offset = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(date) as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for slot in 0..offset + days {
        if slot >= offset {
            week[slot % 7] = Some((slot - offset + 1) as u32);
        }
        if slot % 7 == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_weeks_layout() {
        // March 2025 starts on a Saturday and has 31 days
        let weeks = month_weeks(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][6], Some(1));
        assert_eq!(weeks[0][5], None);
        assert_eq!(weeks[5][1], Some(31));
        assert_eq!(weeks[5][2], None);
    }

    #[test]
    fn test_month_weeks_exact_fit() {
        // February 2026 starts on a Sunday and has 28 days
        let weeks = month_weeks(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[0][0], Some(1));
        assert_eq!(weeks[3][6], Some(28));
    }
}
