//! Calendar helpers for due-date arithmetic
//!
//! Completion timestamps are stored as ISO-8601 strings. They are resolved in
//! the evaluation time zone, intervals are added as calendar days on the local
//! wall clock, and the remaining-day count divides elapsed time by a fixed
//! 24-hour day and rounds up. A 23-hour spring-forward day still counts as
//! one; a 25-hour fall-back day counts as two.

use avtrack_common::{parse_date, parse_naive_datetime, MS_PER_DAY};
use chrono::{DateTime, Days, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// Errors that can occur while resolving a completion timestamp
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateConversionError {
    /// The timestamp string was empty
    #[error("Timestamp is empty")]
    Empty,

    /// None of the supported formats matched
    #[error("Failed to parse timestamp '{0}'")]
    Unparseable(String),

    /// Adding the interval left chrono's representable range
    #[error("Date arithmetic overflowed adding {days} days")]
    Overflow { days: u32 },
}

/// Map a local wall-clock time to an instant in `tz`
///
/// Ambiguous times (clocks falling back) take the earlier instant. Times that
/// fall in a spring-forward gap move one hour later.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Midnight at the start of `now`'s calendar day, in `now`'s zone
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(&now.timezone(), now.date_naive().and_time(NaiveTime::MIN))
}

/// Parse a stored completion timestamp into `tz`
///
/// Accepts RFC 3339 timestamps (any offset), offset-less date-times (read as
/// local wall-clock time) and plain dates. A plain date means midnight UTC,
/// which is the previous evening west of Greenwich.
///
/// # Errors
/// Returns `DateConversionError::Empty` for blank input and
/// `DateConversionError::Unparseable` when no format matches
pub fn parse_timestamp<Tz: TimeZone>(
    value: &str,
    tz: &Tz,
) -> Result<DateTime<Tz>, DateConversionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DateConversionError::Empty);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(tz));
    }
    if let Some(naive) = parse_naive_datetime(value) {
        return Ok(resolve_local(tz, naive));
    }
    if let Ok(date) = parse_date(value) {
        return Ok(Utc
            .from_utc_datetime(&date.and_time(NaiveTime::MIN))
            .with_timezone(tz));
    }

    Err(DateConversionError::Unparseable(value.to_string()))
}

/// Add whole calendar days, keeping the local time of day
///
/// # Errors
/// Returns `DateConversionError::Overflow` if the result is out of range
pub fn add_calendar_days<Tz: TimeZone>(
    start: &DateTime<Tz>,
    days: u32,
) -> Result<DateTime<Tz>, DateConversionError> {
    let naive = start
        .naive_local()
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or(DateConversionError::Overflow { days })?;
    Ok(resolve_local(&start.timezone(), naive))
}

/// Whole days from `from` until `to`, rounding partial days up
///
/// Negative when `to` is in the past.
pub fn days_between<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> i64 {
    let ms = to
        .clone()
        .signed_duration_since(from.clone())
        .num_milliseconds();
    let whole = ms.div_euclid(MS_PER_DAY);
    if ms.rem_euclid(MS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}
