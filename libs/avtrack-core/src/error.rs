//! Error types for the avtrack core library

use thiserror::Error;

/// Result type alias for avtrack operations
pub type Result<T> = std::result::Result<T, AvtrackError>;

/// Main error type for avtrack operations
///
/// The status engine itself never fails; these errors come from loading
/// fleet documents and configuration, and from exporting reports.
#[derive(Error, Debug)]
pub enum AvtrackError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Fleet file not found: {path}")]
    FleetNotFound { path: String },

    #[error("Aircraft not found: {id}")]
    AircraftNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AvtrackError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an aircraft-not-found error
    pub fn aircraft_not_found(id: impl Into<String>) -> Self {
        Self::AircraftNotFound { id: id.into() }
    }
}
