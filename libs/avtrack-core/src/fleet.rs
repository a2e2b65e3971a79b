//! Fleet document loading
//!
//! The fleet file is owned by another application; it is only ever read here.

use crate::dates::start_of_day;
use crate::error::{AvtrackError, Result};
use crate::models::{
    Aircraft, ComputedStatus, CurrentHours, Fleet, HourMode, HourSource, MaintenanceItem,
    NotificationState, RuleType, Thresholds,
};
use crate::status::StatusEngine;
use avtrack_common::generate_id;
use chrono::{DateTime, Duration, TimeZone};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads fleet documents, filling in thresholds for aircraft that lack them
#[derive(Debug, Clone, Default)]
pub struct FleetLoader {
    default_thresholds: Thresholds,
}

impl FleetLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Thresholds applied to aircraft without a `thresholds` entry
    #[must_use]
    pub fn with_default_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.default_thresholds = thresholds;
        self
    }

    /// Load a fleet from a JSON file
    ///
    /// # Errors
    /// Returns `AvtrackError::FleetNotFound` if the file does not exist, and
    /// IO, parse or validation errors otherwise
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Fleet> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AvtrackError::FleetNotFound {
                path: path.display().to_string(),
            });
        }

        info!("Loading fleet from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Load a fleet from a JSON string
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed, does not match the fleet
    /// format, or contains no aircraft
    pub fn load_str(&self, json: &str) -> Result<Fleet> {
        let mut document: Value = serde_json::from_str(json)?;
        self.fill_missing_thresholds(&mut document)?;

        let fleet: Fleet = serde_json::from_value(document)?;
        validate_fleet(&fleet)?;

        debug!(
            "Loaded {} aircraft, active '{}'",
            fleet.aircraft_list.len(),
            fleet.active_aircraft_id
        );
        Ok(fleet)
    }

    fn fill_missing_thresholds(&self, document: &mut Value) -> Result<()> {
        let Some(aircraft_list) = document
            .get_mut("aircraftList")
            .and_then(Value::as_array_mut)
        else {
            return Ok(());
        };

        let defaults = serde_json::to_value(&self.default_thresholds)?;
        for aircraft in aircraft_list.iter_mut().filter_map(Value::as_object_mut) {
            if !aircraft.contains_key("thresholds") {
                aircraft.insert("thresholds".to_string(), defaults.clone());
            }
        }
        Ok(())
    }
}

fn validate_fleet(fleet: &Fleet) -> Result<()> {
    if fleet.aircraft_list.is_empty() {
        return Err(AvtrackError::validation("Fleet contains no aircraft"));
    }

    let mut seen = HashSet::new();
    for aircraft in &fleet.aircraft_list {
        if !seen.insert(aircraft.id.as_str()) {
            warn!("Duplicate aircraft id '{}' in fleet", aircraft.id);
        }
    }

    if fleet.aircraft(&fleet.active_aircraft_id).is_err() {
        warn!(
            "Active aircraft '{}' not in fleet; using first aircraft",
            fleet.active_aircraft_id
        );
    }
    Ok(())
}

impl Fleet {
    /// Load a fleet file with default thresholds
    ///
    /// # Errors
    /// See [`FleetLoader::load_file`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        FleetLoader::new().load_file(path)
    }

    /// Parse a fleet document with default thresholds
    ///
    /// # Errors
    /// See [`FleetLoader::load_str`]
    pub fn from_json(json: &str) -> Result<Self> {
        FleetLoader::new().load_str(json)
    }

    /// The active aircraft, or the first one if the active id is stale
    ///
    /// Only `None` for an empty fleet, which the loaders reject.
    #[must_use]
    pub fn active_aircraft(&self) -> Option<&Aircraft> {
        self.aircraft(&self.active_aircraft_id)
            .ok()
            .or_else(|| self.aircraft_list.first())
    }

    /// Look up an aircraft by id or tail number (tail match ignores case)
    ///
    /// # Errors
    /// Returns `AvtrackError::AircraftNotFound` if nothing matches
    pub fn aircraft(&self, id_or_tail: &str) -> Result<&Aircraft> {
        self.aircraft_list
            .iter()
            .find(|aircraft| aircraft.id == id_or_tail)
            .or_else(|| {
                self.aircraft_list
                    .iter()
                    .find(|aircraft| aircraft.tail.eq_ignore_ascii_case(id_or_tail))
            })
            .ok_or_else(|| AvtrackError::aircraft_not_found(id_or_tail))
    }

    /// The named aircraft, or the active one when no name is given
    ///
    /// # Errors
    /// Returns `AvtrackError::AircraftNotFound` for an unknown name, or a
    /// validation error for an empty fleet
    pub fn select(&self, id_or_tail: Option<&str>) -> Result<&Aircraft> {
        match id_or_tail {
            Some(wanted) => self.aircraft(wanted),
            None => self
                .active_aircraft()
                .ok_or_else(|| AvtrackError::validation("Fleet contains no aircraft")),
        }
    }

    /// Demo fleet: one PA-28 with the five standard items
    ///
    /// Completion dates are counted back from the start of `now`'s day.
    #[must_use]
    pub fn sample<Tz>(now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let today = start_of_day(now);
        let days_ago = |days: i64| (today.clone() - Duration::days(days)).to_rfc3339();

        let aircraft = Aircraft {
            id: generate_id(),
            tail: "N28PA".to_string(),
            model: "Piper PA-28".to_string(),
            hour_mode: HourMode::Both,
            current: CurrentHours::new(Some(1243.6), Some(1189.2), now.to_rfc3339()),
            thresholds: Thresholds::default(),
            maintenance_items: vec![
                MaintenanceItem::new("1", "Annual Inspection", RuleType::Date)
                    .with_interval_days(365)
                    .completed_at(days_ago(342)),
                MaintenanceItem::new("2", "Oil Change", RuleType::Hours)
                    .with_interval_hours(50.0)
                    .with_hour_source(HourSource::Hobbs)
                    .completed_hours(1200.0)
                    .with_notes("Aeroshell W100 Plus, 8 qt"),
                MaintenanceItem::new("3", "ELT Battery", RuleType::Date)
                    .with_interval_days(730)
                    .completed_at(days_ago(600)),
                MaintenanceItem::new("4", "Transponder Check", RuleType::Date)
                    .with_interval_days(730)
                    .completed_at(days_ago(365)),
                MaintenanceItem::new("5", "Pitot-Static Check", RuleType::Date)
                    .with_interval_days(730)
                    .completed_at(days_ago(400)),
            ],
        };

        Self {
            active_aircraft_id: aircraft.id.clone(),
            aircraft_list: vec![aircraft],
            notification_state: NotificationState::default(),
            notifications_enabled: false,
        }
    }
}

impl Aircraft {
    /// Evaluate every maintenance item on this aircraft, most urgent first
    #[must_use]
    pub fn statuses<Tz: TimeZone>(&self, engine: &StatusEngine<Tz>) -> Vec<ComputedStatus> {
        engine.compute_all_statuses(
            &self.maintenance_items,
            &self.current,
            &self.thresholds,
            self.hour_mode,
        )
    }
}
