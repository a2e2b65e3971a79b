//! Configuration for avtrack
//!
//! Config files are partial documents merged key by key over the current
//! values, so a file that only sets `logging.level` leaves everything else
//! alone. Environment variables are applied on top as typed overrides.

use crate::error::{AvtrackError, Result};
use crate::models::{StatusPalette, Thresholds};
use avtrack_common::{parse_bool, DEFAULT_FLEET_FILENAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const ENV_FLEET_PATH: &str = "AVTRACK_FLEET_PATH";
pub const ENV_LOG_LEVEL: &str = "AVTRACK_LOG_LEVEL";
pub const ENV_JSON_LOGS: &str = "AVTRACK_JSON_LOGS";
pub const ENV_LOG_FILE: &str = "AVTRACK_LOG_FILE";
pub const ENV_NOTIFICATIONS: &str = "AVTRACK_NOTIFICATIONS";
pub const ENV_DATE_THRESHOLDS: &str = "AVTRACK_DATE_THRESHOLDS";
pub const ENV_HOUR_THRESHOLDS: &str = "AVTRACK_HOUR_THRESHOLDS";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Effective avtrack configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AvtrackConfig {
    pub data: DataConfig,
    /// Applied to aircraft whose fleet entry has no thresholds
    pub thresholds: Thresholds,
    pub logging: LoggingConfig,
    pub notifications: NotificationsConfig,
    pub palette: StatusPalette,
}

/// Where the fleet document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub fleet_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fleet_path: PathBuf::from(DEFAULT_FLEET_FILENAME),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON-formatted log lines
    pub json_logs: bool,
    /// Also write logs to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_logs: false,
            log_file: None,
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Overrides the fleet document's own flag when set
    pub enabled: Option<bool>,
}

impl NotificationsConfig {
    /// Effective flag given the fleet document's setting
    #[must_use]
    pub fn resolve(&self, fleet_enabled: bool) -> bool {
        self.enabled.unwrap_or(fleet_enabled)
    }
}

impl AvtrackConfig {
    /// Load a configuration file on top of the defaults
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::default();
        config.merge_with(&Self::read_layer(path)?)?;
        Ok(config)
    }

    /// Read a config file as a partial document
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, everything else as JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, does not parse, or is not
    /// a mapping at the top level
    pub fn read_layer<P: AsRef<Path>>(path: P) -> Result<Value> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AvtrackError::Io(std::io::Error::other(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )))
        })?;

        if content.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let layer: Value = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| {
                AvtrackError::configuration(format!("Failed to parse YAML config: {e}"))
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                AvtrackError::configuration(format!("Failed to parse JSON config: {e}"))
            })?,
        };

        match layer {
            Value::Object(_) => Ok(layer),
            _ => Err(AvtrackError::configuration(format!(
                "Config file {} must contain a mapping",
                path.display()
            ))),
        }
    }

    /// Merge a partial document over this configuration
    ///
    /// Nested mappings merge key by key; any other value replaces the current
    /// one, so lists such as thresholds are replaced whole.
    ///
    /// # Errors
    /// Returns an error if the merged document no longer fits the schema
    pub fn merge_with(&mut self, layer: &Value) -> Result<()> {
        let mut merged = serde_json::to_value(&*self)?;
        merge_values(&mut merged, layer);
        *self = serde_json::from_value(merged).map_err(|e| {
            AvtrackError::configuration(format!("Invalid configuration value: {e}"))
        })?;
        Ok(())
    }

    /// Apply `AVTRACK_*` variables from the process environment
    ///
    /// # Errors
    /// Returns an error if a variable holds an unparseable value
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `AVTRACK_*` variables obtained through `lookup`
    ///
    /// # Errors
    /// Returns an error if a variable holds an unparseable value
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_FLEET_PATH) {
            self.data.fleet_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level.trim().to_lowercase();
        }
        if let Some(json_logs) = lookup(ENV_JSON_LOGS) {
            self.logging.json_logs = parse_bool(&json_logs);
        }
        if let Some(log_file) = lookup(ENV_LOG_FILE) {
            self.logging.log_file = Some(log_file)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from);
        }
        if let Some(enabled) = lookup(ENV_NOTIFICATIONS) {
            self.notifications.enabled = Some(parse_bool(&enabled));
        }
        if let Some(days) = lookup(ENV_DATE_THRESHOLDS) {
            self.thresholds.date_threshold_days = parse_list(ENV_DATE_THRESHOLDS, &days)?;
        }
        if let Some(hours) = lookup(ENV_HOUR_THRESHOLDS) {
            self.thresholds.hour_thresholds = parse_list(ENV_HOUR_THRESHOLDS, &hours)?;
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.data.fleet_path.as_os_str().is_empty() {
            return Err(AvtrackError::configuration("Fleet path cannot be empty"));
        }

        let date = &self.thresholds.date_threshold_days;
        if date.is_empty() || date.contains(&0) {
            return Err(AvtrackError::configuration(
                "Date thresholds must be a non-empty list of positive day counts",
            ));
        }
        let hours = &self.thresholds.hour_thresholds;
        if hours.is_empty() || hours.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(AvtrackError::configuration(
                "Hour thresholds must be a non-empty list of positive numbers",
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(AvtrackError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        let palette = &self.palette;
        if [&palette.status_green, &palette.status_yellow, &palette.status_red]
            .iter()
            .any(|color| color.trim().is_empty())
        {
            return Err(AvtrackError::configuration("Palette colors cannot be empty"));
        }

        Ok(())
    }

    /// Render as pretty JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as YAML
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn merge_values(base: &mut Value, layer: &Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, layer) => *base = layer.clone(),
    }
}

fn parse_list<T: std::str::FromStr>(name: &str, raw: &str) -> Result<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse()
                .map_err(|_| AvtrackError::configuration(format!("Invalid {name} value: {part}")))
        })
        .collect()
}
