use std::cmp::Ordering;

use chrono::NaiveDate;

/// Wire format for calendar dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Parse a `YYYY-MM-DD` calendar date. Accepts a trailing time component.
pub fn parse_iso_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    let head = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(head, ISO_DATE_FORMAT).ok()
}

/// Format a date as the wire calendar string.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Case-insensitive ordering for sort comparators.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
