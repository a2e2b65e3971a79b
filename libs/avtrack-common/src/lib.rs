//! avtrack Common - Shared constants and utilities for avtrack
//!
//! # Examples
//!
//! ```
//! use avtrack_common::{format_hours, pluralize, DEFAULT_DATE_THRESHOLD_DAYS};
//!
//! assert_eq!(DEFAULT_DATE_THRESHOLD_DAYS, [30, 10, 3]);
//! assert_eq!(format_hours(6.4), "6.4");
//! assert_eq!(pluralize(2, "month"), "months");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
