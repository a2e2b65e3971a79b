//! Utility functions for avtrack

use crate::constants::{DATETIME_FORMATS, DATE_FORMATS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format a date for display
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a datetime for display
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format an hour count with one decimal place
#[must_use]
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

/// Parse a date string in any of the supported date formats
///
/// # Errors
/// Returns `chrono::ParseError` from the last format tried if none match
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    DATE_FORMATS[1..].iter().fold(
        NaiveDate::parse_from_str(date_str, DATE_FORMATS[0]),
        |parsed, format| parsed.or_else(|_| NaiveDate::parse_from_str(date_str, format)),
    )
}

/// Parse a datetime without an offset in any of the supported formats
#[must_use]
pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Interpret a boolean-ish string (`true`, `1`, `yes`, `on`)
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Append an `s` to `word` unless `count` is exactly one
#[must_use]
pub fn pluralize(count: i64, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Generate a new opaque identifier
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Truncate a string to a maximum number of characters
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
