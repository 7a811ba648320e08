//! # Core Library
//!
//! Configuration, error taxonomy, swap domain model and API DTOs.

pub mod config;
pub mod error;
pub mod model;
pub mod dto;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
