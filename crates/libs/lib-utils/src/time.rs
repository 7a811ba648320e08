//! # Time Utilities
//!
//! Utilities for time formatting and manipulation using chrono.

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string with millisecond precision.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a duration as seconds with two decimals (e.g. `"3.42"`).
pub fn elapsed_secs(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}
