//! # Utilities Library
//!
//! Shared utility functions for base64 transport encoding, environment variables, time, and validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_encode, b64_decode};
pub use envs::{get_env, get_env_or, get_env_parse_or};
pub use time::{now_utc, format_time, elapsed_secs};
pub use validation::{validate_not_empty, validate_distinct};
