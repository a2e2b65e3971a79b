//! avtrack Core - Maintenance status engine for aircraft
//!
//! This library evaluates whether each maintenance item on an aircraft is
//! good, due soon or overdue, based on calendar intervals, operating-hour
//! intervals, or whichever comes first.
//!
//! # Features
//!
//! - **Status Engine**: Pure, deterministic evaluation anchored at a fixed "today"
//! - **Urgency Ordering**: Items sorted most urgent first with a stable order
//! - **Gauges**: Fraction of each interval remaining, with a short label
//! - **Reminder Planning**: Transition-based reminders and a weekly digest
//! - **Fleet Loading**: Read-only access to the fleet JSON document
//! - **Export Support**: JSON, CSV and Markdown status reports
//! - **Layered Configuration**: Defaults, JSON/YAML files and environment
//!
//! # Quick Start
//!
//! ```
//! use avtrack_core::{Fleet, StatusEngine, StatusType};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
//! let fleet = Fleet::sample(&now);
//! let aircraft = fleet.active_aircraft().unwrap();
//!
//! let statuses = aircraft.statuses(&StatusEngine::new(now));
//! assert_eq!(statuses[0].item.name, "Annual Inspection");
//! assert_eq!(statuses[0].status, StatusType::DueSoon);
//! assert_eq!(statuses[0].due_text, "due in 23 days");
//! ```

pub mod config;
pub mod config_loader;
pub mod dates;
pub mod error;
pub mod export;
pub mod fleet;
pub mod gauge;
pub mod models;
pub mod notifications;
pub mod status;

pub use config::{AvtrackConfig, DataConfig, LoggingConfig, NotificationsConfig};
pub use config_loader::{load_config, ConfigLoader};
pub use dates::DateConversionError;
pub use error::{AvtrackError, Result};
pub use export::{ExportFormat, ReportExporter, StatusReport};
pub use fleet::FleetLoader;
pub use gauge::Gauge;
pub use models::*;
pub use notifications::{
    deep_link, plan_refresh, plan_transitions, status_changes, Reminder, WeeklyDigest,
};
pub use status::{format_due_text, overall_status, urgency_score, StatusEngine};

/// Re-export commonly used types
pub use chrono::{DateTime, Local, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
