//! Data models for aircraft, maintenance items and computed statuses
//!
//! Serialized names follow the fleet document format: camelCase fields and
//! upper-case rule/meter identifiers.

use avtrack_common::{DEFAULT_DATE_THRESHOLD_DAYS, DEFAULT_HOUR_THRESHOLDS};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which axes drive an item's due calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// Calendar interval only
    #[serde(rename = "DATE")]
    Date,
    /// Operating-hour interval only
    #[serde(rename = "HOURS")]
    Hours,
    /// Whichever of the two comes first
    #[serde(rename = "DATE_OR_HOURS")]
    DateOrHours,
}

impl RuleType {
    /// Whether the calendar axis applies to this rule
    #[must_use]
    pub const fn uses_date(self) -> bool {
        matches!(self, Self::Date | Self::DateOrHours)
    }

    /// Whether the hour-meter axis applies to this rule
    #[must_use]
    pub const fn uses_hours(self) -> bool {
        matches!(self, Self::Hours | Self::DateOrHours)
    }
}

/// Hour meter that an hour-based interval is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HourSource {
    #[default]
    Hobbs,
    Tach,
}

/// Which meters an aircraft tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HourMode {
    Hobbs,
    Tach,
    #[default]
    Both,
}

/// Evaluated maintenance status, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusType {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "due_soon")]
    DueSoon,
    #[serde(rename = "overdue")]
    Overdue,
}

impl StatusType {
    /// Display label shown next to an item
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::DueSoon => "DUE SOON",
            Self::Overdue => "OVERDUE",
        }
    }

    /// Presentation color key for the status
    #[must_use]
    pub const fn color(self) -> StatusColor {
        match self {
            Self::Good => StatusColor::Green,
            Self::DueSoon => StatusColor::Yellow,
            Self::Overdue => StatusColor::Red,
        }
    }

    /// Identifier used in stored state and reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::DueSoon => "due_soon",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for StatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color key for a status or gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

/// Display colors for each status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPalette {
    pub status_green: String,
    pub status_yellow: String,
    pub status_red: String,
}

impl StatusPalette {
    /// Resolve the display color for a status
    #[must_use]
    pub fn color_for(&self, status: StatusType) -> &str {
        match status.color() {
            StatusColor::Green => &self.status_green,
            StatusColor::Yellow => &self.status_yellow,
            StatusColor::Red => &self.status_red,
        }
    }
}

impl Default for StatusPalette {
    fn default() -> Self {
        Self {
            status_green: avtrack_common::STATUS_GREEN.to_string(),
            status_yellow: avtrack_common::STATUS_YELLOW.to_string(),
            status_red: avtrack_common::STATUS_RED.to_string(),
        }
    }
}

/// A maintenance task definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceItem {
    /// Opaque unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Which axes drive the due calculation
    pub rule_type: RuleType,
    /// Calendar interval in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<u32>,
    /// Operating-hour interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<f64>,
    /// Meter the hour interval is measured against (Hobbs when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_source: Option<HourSource>,
    /// ISO-8601 date or timestamp of the last completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<String>,
    /// Meter reading at the last completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_hours: Option<f64>,
    /// Notes from the last completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MaintenanceItem {
    /// Create an item with no intervals or completion markers
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, rule_type: RuleType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rule_type,
            interval_days: None,
            interval_hours: None,
            hour_source: None,
            last_completed_at: None,
            last_completed_hours: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_interval_days(mut self, days: u32) -> Self {
        self.interval_days = Some(days);
        self
    }

    #[must_use]
    pub fn with_interval_hours(mut self, hours: f64) -> Self {
        self.interval_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn with_hour_source(mut self, source: HourSource) -> Self {
        self.hour_source = Some(source);
        self
    }

    #[must_use]
    pub fn completed_at(mut self, timestamp: impl Into<String>) -> Self {
        self.last_completed_at = Some(timestamp.into());
        self
    }

    #[must_use]
    pub fn completed_hours(mut self, hours: f64) -> Self {
        self.last_completed_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// The meter this item reads, defaulting to Hobbs
    #[must_use]
    pub fn hour_source(&self) -> HourSource {
        self.hour_source.unwrap_or_default()
    }
}

/// Snapshot of the aircraft's meter readings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tach: Option<f64>,
    /// ISO timestamp of when the snapshot was taken
    #[serde(default)]
    pub updated_at: String,
}

impl CurrentHours {
    #[must_use]
    pub fn new(hobbs: Option<f64>, tach: Option<f64>, updated_at: impl Into<String>) -> Self {
        Self {
            hobbs,
            tach,
            updated_at: updated_at.into(),
        }
    }

    /// Reading of the given meter, if recorded
    #[must_use]
    pub const fn reading(&self, source: HourSource) -> Option<f64> {
        match source {
            HourSource::Hobbs => self.hobbs,
            HourSource::Tach => self.tach,
        }
    }
}

/// Per-aircraft warning breakpoints
///
/// Both lists are unordered. A margin at or below any breakpoint is due soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    #[serde(default = "default_date_thresholds")]
    pub date_threshold_days: Vec<u32>,
    #[serde(default = "default_hour_thresholds")]
    pub hour_thresholds: Vec<f64>,
}

fn default_date_thresholds() -> Vec<u32> {
    DEFAULT_DATE_THRESHOLD_DAYS.to_vec()
}

fn default_hour_thresholds() -> Vec<f64> {
    DEFAULT_HOUR_THRESHOLDS.to_vec()
}

impl Thresholds {
    #[must_use]
    pub fn new(date_threshold_days: Vec<u32>, hour_thresholds: Vec<f64>) -> Self {
        Self {
            date_threshold_days,
            hour_thresholds,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(default_date_thresholds(), default_hour_thresholds())
    }
}

/// Engine output for one item; derived on demand, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStatus {
    pub item: MaintenanceItem,
    pub status: StatusType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_hours: Option<f64>,
    /// Whole days until due; negative when overdue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    /// Hours until due; negative when overdue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<f64>,
    pub due_text: String,
    /// Sort key only; higher is more urgent
    pub urgency_score: f64,
}

/// An aircraft with its meters, thresholds and maintenance list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: String,
    pub tail: String,
    pub model: String,
    #[serde(default)]
    pub hour_mode: HourMode,
    #[serde(default)]
    pub current: CurrentHours,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub maintenance_items: Vec<MaintenanceItem>,
}

/// Last notified status per item, owned by the notification planner
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    #[serde(default)]
    pub last_notified_status: HashMap<String, StatusType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_weekly_digest: Option<String>,
}

/// The whole fleet document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub aircraft_list: Vec<Aircraft>,
    pub active_aircraft_id: String,
    #[serde(default)]
    pub notification_state: NotificationState,
    #[serde(default)]
    pub notifications_enabled: bool,
}
