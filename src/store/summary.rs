//! Derived views over the current store snapshot: dashboard counters,
//! reporting-period calendar marks and the deadlines list.
//!
//! Everything here is recomputed from the collections on each render.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Company, Metric};
use crate::utils::format::format_iso_date;

use super::EntityStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub companies: usize,
    pub business_units: usize,
    pub metrics: usize,
    pub verified_metrics: usize,
}

impl DashboardCounts {
    pub fn from_store(store: &EntityStore) -> Self {
        Self {
            companies: store.companies.items.len(),
            business_units: store.business_units.items.len(),
            metrics: store.metrics.items.len(),
            verified_metrics: verified_count(&store.metrics.items),
        }
    }
}

pub fn verified_count(metrics: &[Metric]) -> usize {
    metrics.iter().filter(|m| m.is_verified).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodBoundary {
    Start,
    End,
}

impl PeriodBoundary {
    pub fn label(&self) -> &'static str {
        match self {
            PeriodBoundary::Start => "Start",
            PeriodBoundary::End => "End",
        }
    }
}

/// A company whose reporting period starts or ends on a given day.
#[derive(Debug, Clone, Copy)]
pub struct CalendarMark<'a> {
    pub company: &'a Company,
    pub boundary: PeriodBoundary,
}

impl CalendarMark<'_> {
    pub fn text(&self) -> String {
        format!("{}: {}", self.boundary.label(), self.company.name)
    }
}

/// Companies whose period starts or ends on `date`, starts listed first.
/// Matching is exact string equality against the `YYYY-MM-DD` form.
pub fn marks_on(companies: &[Company], date: NaiveDate) -> Vec<CalendarMark<'_>> {
    let key = format_iso_date(date);
    let starts = companies
        .iter()
        .filter(|c| c.reporting_period_start == key)
        .map(|company| CalendarMark {
            company,
            boundary: PeriodBoundary::Start,
        });
    let ends = companies
        .iter()
        .filter(|c| c.reporting_period_end == key)
        .map(|company| CalendarMark {
            company,
            boundary: PeriodBoundary::End,
        });
    starts.chain(ends).collect()
}

/// All companies ordered by reporting-period end date, earliest first.
/// Companies with an unparseable end date go last; ties keep server order.
pub fn deadlines(companies: &[Company]) -> Vec<&Company> {
    let mut sorted: Vec<&Company> = companies.iter().collect();
    sorted.sort_by_key(|c| match c.period_end_date() {
        Some(date) => (false, date),
        None => (true, NaiveDate::MIN),
    });
    sorted
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Same day-of-month `delta` months away, clamped to the month's last day.
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = month_start(date);
    let next = shift_months(first, 1);
    next.signed_duration_since(first).num_days() as u32
}
