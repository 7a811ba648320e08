//! # HTTP Request Handlers
//!
//! Axum handlers. Business logic lives in [`crate::services`]; handlers only decode
//! requests and map outcomes to responses.
//!
//! ## Handler Modules
//!
//! - **[`swap`]**: Swap execution and settlement status
//!   - `POST /api/swap` - Run a swap and verify its balances
//!   - `POST /api/check-status` - Query the status of a submitted transaction
//!
//! `GET /health` is served inline by the router in [`crate::server`].
//!
//! ## Error Handling
//!
//! Swap responses always include the run's `logs`, including on errors. Status codes
//! come from [`lib_core::AppError::status_code`].

pub mod swap;
