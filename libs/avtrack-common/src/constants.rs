//! Constants for avtrack

/// Default day counts at which an item becomes due soon
pub const DEFAULT_DATE_THRESHOLD_DAYS: [u32; 3] = [30, 10, 3];

/// Default hour margins at which an item becomes due soon
pub const DEFAULT_HOUR_THRESHOLDS: [f64; 3] = [10.0, 5.0, 1.0];

/// Days counted as one month in due text
pub const DAYS_PER_MONTH: i64 = 30;

/// Milliseconds in a fixed 24-hour day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Default fleet document filename
pub const DEFAULT_FLEET_FILENAME: &str = "fleet.json";

/// Directory name used under user and system config locations
pub const CONFIG_DIR_NAME: &str = "avtrack";

/// Base name of configuration files (`avtrack.json`, `avtrack.yaml`, ...)
pub const CONFIG_FILE_STEM: &str = "avtrack";

/// Prefix shared by every maintenance reminder identifier
pub const NOTIFICATION_PREFIX: &str = "avtrack_maintenance_";

/// URL scheme used for reminder deep links
pub const DEEP_LINK_SCHEME: &str = "avtrack";

/// Default display colors for good, due soon and overdue
pub const STATUS_GREEN: &str = "#34C759";
pub const STATUS_YELLOW: &str = "#FFD60A";
pub const STATUS_RED: &str = "#FF3B30";

/// Supported date formats
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Supported datetime formats without an offset
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];
