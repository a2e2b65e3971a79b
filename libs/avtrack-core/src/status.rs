//! Maintenance status engine
//!
//! Derives a [`ComputedStatus`] for each maintenance item from its rule, its
//! last-completed markers, the aircraft's meter readings and the warning
//! thresholds. The engine is pure: "today" is fixed when the engine is built,
//! so repeated evaluations are deterministic.

use crate::dates::{add_calendar_days, days_between, parse_timestamp, start_of_day};
use crate::models::{
    ComputedStatus, CurrentHours, HourMode, MaintenanceItem, RuleType, StatusType, Thresholds,
};
use avtrack_common::{format_hours, pluralize, DAYS_PER_MONTH};
use chrono::{DateTime, Local, TimeZone};
use std::cmp::Ordering;
use tracing::{debug, instrument, trace, warn};

const OVERDUE_BASE_SCORE: f64 = 10_000.0;
const DUE_SOON_BASE_SCORE: f64 = 5_000.0;
const DAYS_SCORE_CAP: i64 = 1_000;
const HOURS_SCORE_CAP: f64 = 100.0;

/// Calendar axis of an item, present only when it can be evaluated
#[derive(Debug, Clone)]
struct DateAxis<Tz: TimeZone> {
    due_date: DateTime<Tz>,
    days_remaining: i64,
}

/// Hour-meter axis of an item
///
/// `remaining` is absent when the selected meter has no reading.
#[derive(Debug, Clone, Copy)]
struct HoursAxis {
    due_hours: f64,
    remaining: Option<f64>,
}

/// Status evaluator anchored at a fixed "today"
#[derive(Debug, Clone)]
pub struct StatusEngine<Tz: TimeZone> {
    today: DateTime<Tz>,
}

impl StatusEngine<Local> {
    /// Engine for the system clock and local time zone
    #[must_use]
    pub fn local() -> Self {
        Self::new(Local::now())
    }
}

impl<Tz: TimeZone> StatusEngine<Tz> {
    /// Create an engine for the calendar day containing `now`
    ///
    /// Time of day is discarded; only the day in `now`'s zone matters.
    #[must_use]
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            today: start_of_day(&now),
        }
    }

    /// Midnight of the evaluation day
    #[must_use]
    pub fn today(&self) -> &DateTime<Tz> {
        &self.today
    }

    /// Evaluate one maintenance item
    ///
    /// `hour_mode` does not select the meter; `item.hour_source` does. It is
    /// accepted so callers can pass the aircraft's mode through unchanged.
    #[must_use]
    pub fn compute_item_status(
        &self,
        item: &MaintenanceItem,
        current: &CurrentHours,
        thresholds: &Thresholds,
        hour_mode: HourMode,
    ) -> ComputedStatus {
        let date_axis = self.date_axis(item);
        let hours_axis = hours_axis(item, current);

        let days_remaining = date_axis.as_ref().map(|axis| axis.days_remaining);
        let hours_remaining = hours_axis.and_then(|axis| axis.remaining);

        let date_status = days_remaining.map_or(StatusType::Good, |days| {
            status_from_days(days, &thresholds.date_threshold_days)
        });
        let hours_status = hours_remaining.map_or(StatusType::Good, |hours| {
            status_from_hours(hours, &thresholds.hour_thresholds)
        });

        let status = match item.rule_type {
            RuleType::Date => date_status,
            RuleType::Hours => hours_status,
            RuleType::DateOrHours => date_status.max(hours_status),
        };

        trace!(
            item_id = %item.id,
            ?hour_mode,
            ?days_remaining,
            ?hours_remaining,
            status = status.as_str(),
            "Computed item status"
        );

        ComputedStatus {
            item: item.clone(),
            status,
            due_date: date_axis.map(|axis| axis.due_date.fixed_offset()),
            due_hours: hours_axis.map(|axis| axis.due_hours),
            days_remaining,
            hours_remaining,
            due_text: format_due_text(days_remaining, hours_remaining),
            urgency_score: urgency_score(status, days_remaining, hours_remaining),
        }
    }

    /// Evaluate every item and order the results most urgent first
    ///
    /// Items with equal scores keep their input order.
    #[instrument(skip_all, fields(items = items.len()))]
    pub fn compute_all_statuses(
        &self,
        items: &[MaintenanceItem],
        current: &CurrentHours,
        thresholds: &Thresholds,
        hour_mode: HourMode,
    ) -> Vec<ComputedStatus> {
        let mut statuses: Vec<ComputedStatus> = items
            .iter()
            .map(|item| self.compute_item_status(item, current, thresholds, hour_mode))
            .collect();

        statuses.sort_by(|a, b| {
            b.urgency_score
                .partial_cmp(&a.urgency_score)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            overall = overall_status(&statuses).as_str(),
            "Computed {} maintenance statuses",
            statuses.len()
        );
        statuses
    }

    fn date_axis(&self, item: &MaintenanceItem) -> Option<DateAxis<Tz>> {
        if !item.rule_type.uses_date() {
            return None;
        }
        let interval_days = item.interval_days.filter(|days| *days > 0)?;
        let raw = item
            .last_completed_at
            .as_deref()
            .filter(|value| !value.is_empty())?;

        let completed = parse_timestamp(raw, &self.today.timezone())
            .map_err(|e| warn!(item_id = %item.id, "Ignoring completion date: {}", e))
            .ok()?;
        let due_date = add_calendar_days(&completed, interval_days)
            .map_err(|e| warn!(item_id = %item.id, "Ignoring date interval: {}", e))
            .ok()?;
        let days_remaining = days_between(&self.today, &due_date);

        Some(DateAxis {
            due_date,
            days_remaining,
        })
    }
}

fn hours_axis(item: &MaintenanceItem, current: &CurrentHours) -> Option<HoursAxis> {
    if !item.rule_type.uses_hours() {
        return None;
    }
    let due_hours = item.last_completed_hours? + item.interval_hours?;
    let remaining = current
        .reading(item.hour_source())
        .map(|reading| due_hours - reading);

    Some(HoursAxis {
        due_hours,
        remaining,
    })
}

/// Status for a remaining day count against the day thresholds
///
/// Any threshold at or above the remaining count makes the item due soon,
/// which is the same as walking the ladder from the largest breakpoint down.
#[must_use]
pub fn status_from_days(days_remaining: i64, thresholds: &[u32]) -> StatusType {
    if days_remaining < 0 {
        StatusType::Overdue
    } else if thresholds
        .iter()
        .any(|threshold| days_remaining <= i64::from(*threshold))
    {
        StatusType::DueSoon
    } else {
        StatusType::Good
    }
}

/// Status for a remaining hour margin against the hour thresholds
#[must_use]
pub fn status_from_hours(hours_remaining: f64, thresholds: &[f64]) -> StatusType {
    if hours_remaining < 0.0 {
        StatusType::Overdue
    } else if thresholds
        .iter()
        .any(|threshold| hours_remaining <= *threshold)
    {
        StatusType::DueSoon
    } else {
        StatusType::Good
    }
}

/// Human-readable due phrase for whichever axes are populated
#[must_use]
pub fn format_due_text(days_remaining: Option<i64>, hours_remaining: Option<f64>) -> String {
    let mut parts = Vec::with_capacity(2);

    if let Some(days) = days_remaining {
        parts.push(match days {
            d if d < 0 => format!("{} days overdue", d.abs()),
            0 => "due today".to_string(),
            1 => "due tomorrow".to_string(),
            d if d < DAYS_PER_MONTH => format!("due in {d} days"),
            d => {
                let months = (d as f64 / DAYS_PER_MONTH as f64).round() as i64;
                format!("due in {months} {}", pluralize(months, "month"))
            }
        });
    }

    if let Some(hours) = hours_remaining {
        if hours < 0.0 {
            parts.push(format!("{} hours overdue", format_hours(hours.abs())));
        } else {
            parts.push(format!("due in {} hours", format_hours(hours)));
        }
    }

    if parts.is_empty() {
        "status unknown".to_string()
    } else {
        parts.join(" or ")
    }
}

/// Sort key: status tier first, then fewer days and hours left ranks higher
#[must_use]
pub fn urgency_score(
    status: StatusType,
    days_remaining: Option<i64>,
    hours_remaining: Option<f64>,
) -> f64 {
    let base = match status {
        StatusType::Overdue => OVERDUE_BASE_SCORE,
        StatusType::DueSoon => DUE_SOON_BASE_SCORE,
        StatusType::Good => 0.0,
    };
    let days_part = days_remaining.map_or(0.0, |days| {
        (DAYS_SCORE_CAP - days.min(DAYS_SCORE_CAP)) as f64
    });
    let hours_part = hours_remaining.map_or(0.0, |hours| HOURS_SCORE_CAP - hours.min(HOURS_SCORE_CAP));

    base + days_part + hours_part
}

/// Worst status across a list; an empty list is good
#[must_use]
pub fn overall_status(statuses: &[ComputedStatus]) -> StatusType {
    statuses
        .iter()
        .map(|status| status.status)
        .max()
        .unwrap_or(StatusType::Good)
}
