//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] shared by the router client, the
//! signer, the settlement machine and the HTTP layer. It follows the `thiserror`
//! pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Request Errors** (4xx) - rejected before any network call
//!    - [`Validation`](AppError::Validation) → 400 Bad Request
//!    - [`Decoding`](AppError::Decoding) → 400 Bad Request
//!
//! 2. **Swap Pipeline Errors** - each one terminates a swap run
//!    - [`Route`](AppError::Route) → 502 Bad Gateway (quote failed or rejected)
//!    - [`Sign`](AppError::Sign) → 500 Internal Server Error (malformed blob, signing failure)
//!    - [`Submit`](AppError::Submit) → 502 Bad Gateway (submission rejected)
//!    - [`Status`](AppError::Status) → 502 Bad Gateway (status query failed)
//!
//! 3. **Server Errors** (5xx)
//!    - [`Rpc`](AppError::Rpc) → 502 Bad Gateway
//!    - [`Config`](AppError::Config) / [`Internal`](AppError::Internal) → 500
//!
//! An expired transaction is *not* an error: it is a settlement outcome, see
//! [`SettlementStatus`](crate::model::swap::SettlementStatus). Balance read failures are
//! not errors either; they degrade to zero.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn check_amount(amount: f64) -> Result<f64> {
//!     if amount <= 0.0 {
//!         return Err(AppError::Validation("amount must be greater than 0".to_string()));
//!     }
//!     Ok(amount)
//! }
//! ```

use thiserror::Error;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error type covering every way a swap run or request can fail.
///
/// Each variant carries the human-readable reason. Router-originated variants hold
/// the router's own message verbatim (e.g. `"insufficient liquidity"`).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    /// Swap request rejected before any network call.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Quote request failed or the router rejected it.
    #[error("Route error: {0}")]
    Route(String),

    /// Route transaction could not be decoded or signed.
    #[error("Sign error: {0}")]
    Sign(String),

    /// Router rejected the signed transaction.
    #[error("Submit error: {0}")]
    Submit(String),

    /// Settlement status query failed.
    #[error("Status error: {0}")]
    Status(String),

    /// Solana RPC client error (network, rate limit, node issues).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request body or payload could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Decoding(_) => StatusCode::BAD_REQUEST,
            AppError::Route(_) | AppError::Submit(_) | AppError::Status(_) | AppError::Rpc(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Sign(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error code (the variant name) for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Route(_) => "Route",
            AppError::Sign(_) => "Sign",
            AppError::Submit(_) => "Submit",
            AppError::Status(_) => "Status",
            AppError::Rpc(_) => "Rpc",
            AppError::Config(_) => "Config",
            AppError::Decoding(_) => "Decoding",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Pipeline errors pass the reason through so the caller can see where the
    /// run stopped; infrastructure errors are reduced to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Route(msg)
            | AppError::Sign(msg)
            | AppError::Submit(msg)
            | AppError::Status(msg)
            | AppError::Decoding(msg) => msg.clone(),
            AppError::Rpc(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    /// Log at the level matching the status class.
    pub fn trace(&self) {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::debug!("Client error: {}", self);
        } else if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::warn!("Unexpected error: {}", self);
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.trace();

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (self.status_code(), body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}
