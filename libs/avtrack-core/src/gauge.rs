//! Remaining-life gauge for a computed status

use crate::models::{ComputedStatus, StatusColor, StatusType};
use avtrack_common::format_hours;
use serde::{Deserialize, Serialize};

/// Fraction of an interval still remaining, with a short label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub label: String,
    /// In `[0, 1]`
    pub percent: f64,
    pub color: StatusColor,
}

impl Gauge {
    /// Build the gauge for one item
    ///
    /// When both axes apply, the one with less of its interval left is shown.
    #[must_use]
    pub fn from_status(status: &ComputedStatus) -> Self {
        let date = status
            .days_remaining
            .zip(status.item.interval_days.filter(|days| *days > 0))
            .map(|(days, interval)| (days, (days as f64 / f64::from(interval)).max(0.0)));
        let hours = status
            .hours_remaining
            .zip(status.item.interval_hours.filter(|hours| *hours > 0.0))
            .map(|(hours, interval)| (hours, (hours / interval).max(0.0)));

        let (label, percent) = match (date, hours) {
            (Some((_, date_pct)), Some((hours, hours_pct))) if hours_pct <= date_pct => {
                (hours_label(hours), hours_pct)
            }
            (Some((days, date_pct)), _) => (days_label(days), date_pct),
            (None, Some((hours, hours_pct))) => (hours_label(hours), hours_pct),
            (None, None) => ("N/A".to_string(), 0.0),
        };

        let percent = if status.status == StatusType::Overdue {
            0.0
        } else {
            percent.min(1.0)
        };

        Self {
            label,
            percent,
            color: status.status.color(),
        }
    }

    /// Render as a fixed-width text bar, e.g. `[######----]`
    #[must_use]
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.percent * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

fn hours_label(hours: f64) -> String {
    format!("{} hrs", format_hours(hours))
}

fn days_label(days: i64) -> String {
    format!("{days} days")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceItem, RuleType};

    fn computed(
        item: MaintenanceItem,
        status: StatusType,
        days: Option<i64>,
        hours: Option<f64>,
    ) -> ComputedStatus {
        ComputedStatus {
            item,
            status,
            due_date: None,
            due_hours: None,
            days_remaining: days,
            hours_remaining: hours,
            due_text: String::new(),
            urgency_score: 0.0,
        }
    }

    #[test]
    fn test_date_only_gauge() {
        let item = MaintenanceItem::new("1", "Annual", RuleType::Date).with_interval_days(365);
        let gauge = Gauge::from_status(&computed(item, StatusType::DueSoon, Some(23), None));

        assert_eq!(gauge.label, "23 days");
        assert!((gauge.percent - 23.0 / 365.0).abs() < 1e-12);
        assert_eq!(gauge.color, StatusColor::Yellow);
    }

    #[test]
    fn test_hours_only_gauge() {
        let item = MaintenanceItem::new("2", "Oil", RuleType::Hours).with_interval_hours(50.0);
        let gauge = Gauge::from_status(&computed(item, StatusType::Good, None, Some(25.0)));

        assert_eq!(gauge.label, "25.0 hrs");
        assert_eq!(gauge.percent, 0.5);
        assert_eq!(gauge.color, StatusColor::Green);
    }

    #[test]
    fn test_prefers_axis_with_less_left() {
        let item = MaintenanceItem::new("3", "100 Hour", RuleType::DateOrHours)
            .with_interval_days(100)
            .with_interval_hours(100.0);

        let hours_lower = Gauge::from_status(&computed(
            item.clone(),
            StatusType::Good,
            Some(80),
            Some(40.0),
        ));
        assert_eq!(hours_lower.label, "40.0 hrs");
        assert_eq!(hours_lower.percent, 0.4);

        let date_lower = Gauge::from_status(&computed(
            item.clone(),
            StatusType::Good,
            Some(30),
            Some(40.0),
        ));
        assert_eq!(date_lower.label, "30 days");
        assert_eq!(date_lower.percent, 0.3);

        // ties go to hours
        let tie = Gauge::from_status(&computed(item, StatusType::Good, Some(50), Some(50.0)));
        assert_eq!(tie.label, "50.0 hrs");
    }

    #[test]
    fn test_overdue_forces_empty_gauge() {
        let item = MaintenanceItem::new("5", "Pitot", RuleType::Date).with_interval_days(365);
        let gauge = Gauge::from_status(&computed(item, StatusType::Overdue, Some(-35), None));

        assert_eq!(gauge.label, "-35 days");
        assert_eq!(gauge.percent, 0.0);
        assert_eq!(gauge.color, StatusColor::Red);
    }

    #[test]
    fn test_percent_is_clamped() {
        let item = MaintenanceItem::new("1", "Odd", RuleType::Date).with_interval_days(10);
        let gauge = Gauge::from_status(&computed(item, StatusType::Good, Some(25), None));
        assert_eq!(gauge.percent, 1.0);
    }

    #[test]
    fn test_missing_interval_is_not_applicable() {
        let item = MaintenanceItem::new("1", "Unknown", RuleType::DateOrHours)
            .with_interval_days(0)
            .with_interval_hours(0.0);
        let gauge = Gauge::from_status(&computed(item, StatusType::Good, Some(5), Some(5.0)));

        assert_eq!(gauge.label, "N/A");
        assert_eq!(gauge.percent, 0.0);
    }

    #[test]
    fn test_bar_rendering() {
        let gauge = Gauge {
            label: "5 days".to_string(),
            percent: 0.5,
            color: StatusColor::Green,
        };
        assert_eq!(gauge.bar(10), "[#####-----]");

        let empty = Gauge {
            percent: 0.0,
            ..gauge.clone()
        };
        assert_eq!(empty.bar(4), "[----]");

        let full = Gauge {
            percent: 1.0,
            ..gauge
        };
        assert_eq!(full.bar(4), "[####]");
    }
}
