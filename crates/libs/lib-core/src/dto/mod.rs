//! # Data Transfer Objects (DTOs)
//!
//! This module contains the JSON bodies exchanged with HTTP clients of the swap API.

pub mod swap;

pub use swap::*;
