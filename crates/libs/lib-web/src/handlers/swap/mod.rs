//! # Swap Handlers
//!
//! HTTP endpoints that run a swap and query settlement.
//!
//! ## Endpoints
//!
//! - `POST /api/swap` - Run a swap end to end (route, sign, submit, verify)
//! - `POST /api/check-status` - One settlement status query
//!
//! ## Request Examples
//!
//! ```bash
//! # Swap 1.5 SOL to USDC
//! curl -X POST http://localhost:3001/api/swap \
//!   -H "Content-Type: application/json" \
//!   -d '{
//!     "inputToken": "So11111111111111111111111111111111111111112",
//!     "outputToken": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
//!     "amount": "1.5"
//!   }'
//!
//! # Check a submitted transaction
//! curl -X POST http://localhost:3001/api/check-status \
//!   -H "Content-Type: application/json" \
//!   -d '{"hash": "5xQ...", "lastValidBlockHeight": 280000123}'
//! ```
//!
//! ## Status Codes
//!
//! | Outcome                               | Status      |
//! |---------------------------------------|-------------|
//! | Settled                               | 200         |
//! | Expired / timed out / failed status   | 200 + error |
//! | Rejected request                      | 400         |
//! | Route / submit failure                | 502         |
//! | Sign failure                          | 500         |
//!
//! Every `/api/swap` response carries the run's `logs`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use lib_core::dto::{
    BalanceReport, CheckStatusRequest, CheckStatusResponse, ErrorResponse, SwapErrorResponse,
    SwapRequestBody, SwapSuccessResponse, TokenPair,
};
use lib_core::model::{BalanceDiff, BalanceSnapshot, RunLog, SettlementStatus, SwapRequest};
use lib_core::AppError;
use lib_utils::time::elapsed_secs;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::server::AppState;
use crate::services::settlement::reason_of;
use crate::services::swap::{SwapOutcome, SwapResult, SwapService};


/// Routes served by this module.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/swap", post(execute_swap))
        .route("/api/check-status", post(check_status))
}

// region: --- Swap

/// Run one swap.
///
/// **Route**: `POST /api/swap`
///
/// Success (200):
/// ```json
/// {
///   "success": true,
///   "hash": "5xQ...",
///   "duration": "4.21",
///   "solscanUrl": "https://solscan.io/tx/5xQ...",
///   "walletAddress": "8W6Q...",
///   "balances": { "before": {...}, "after": {...}, "diff": {...} },
///   "logs": ["[2024-05-01T12:30:00.000Z] === SWAP RUN START ===", "..."]
/// }
/// ```
///
/// Submitted but unsettled (200): `{ "error", "code", "hash", "walletAddress", "logs" }`
///
/// Failed before submission (4xx/5xx): `{ "error", "code", "logs" }`
#[instrument(skip_all)]
pub async fn execute_swap(
    State(service): State<Arc<SwapService>>,
    payload: Result<Json<SwapRequestBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let error = AppError::Decoding(rejection.body_text());
            error.trace();

            let mut log = RunLog::new(Uuid::new_v4().to_string());
            log.append(format!("Request rejected: {}", rejection.body_text()));
            return (
                error.status_code(),
                Json(SwapErrorResponse {
                    error: error.user_message(),
                    code: Some(error.code().to_string()),
                    hash: None,
                    wallet_address: None,
                    logs: log.lines(),
                }),
            )
                .into_response();
        }
    };

    let request = SwapRequest::new(body.input_token, body.output_token, body.amount);
    let outcome = service.execute(&request).await;

    outcome_response(outcome)
}

/// Map a run outcome to its HTTP response.
fn outcome_response(outcome: SwapOutcome) -> Response {
    let logs = outcome.log_lines();
    let wallet_address = outcome.wallet_address;

    match outcome.result {
        SwapResult::Settled(settled) => (
            StatusCode::OK,
            Json(SwapSuccessResponse {
                success: true,
                hash: settled.tracking_id,
                duration: elapsed_secs(settled.duration),
                solscan_url: settled.explorer_url,
                wallet_address,
                balances: BalanceReport {
                    before: snapshot_pair(&settled.before),
                    after: snapshot_pair(&settled.after),
                    diff: diff_pair(&settled.diff),
                },
                logs,
            }),
        )
            .into_response(),

        SwapResult::Unsettled { tracking_id, status } => {
            let (error, code) = match &status {
                SettlementStatus::Expired => ("Transaction expired".to_string(), "Expired"),
                other => (format!("Transaction not confirmed: {}", other), "TimedOut"),
            };
            (
                StatusCode::OK,
                Json(SwapErrorResponse {
                    error,
                    code: Some(code.to_string()),
                    hash: Some(tracking_id),
                    wallet_address: Some(wallet_address),
                    logs,
                }),
            )
                .into_response()
        }

        // Failed after submission: the transaction exists, report it like an unsettled one
        SwapResult::Failed { error, tracking_id: Some(tracking_id) } => (
            StatusCode::OK,
            Json(SwapErrorResponse {
                error: reason_of(&error),
                code: Some(error.code().to_string()),
                hash: Some(tracking_id),
                wallet_address: Some(wallet_address),
                logs,
            }),
        )
            .into_response(),

        SwapResult::Failed { error, tracking_id: None } => (
            error.status_code(),
            Json(SwapErrorResponse {
                error: error.user_message(),
                code: Some(error.code().to_string()),
                hash: None,
                wallet_address: None,
                logs,
            }),
        )
            .into_response(),
    }
}

fn snapshot_pair(snapshot: &BalanceSnapshot) -> TokenPair {
    TokenPair {
        input_token: snapshot.input_token_amount,
        output_token: snapshot.output_token_amount,
    }
}

fn diff_pair(diff: &BalanceDiff) -> TokenPair {
    TokenPair {
        input_token: diff.input_token,
        output_token: diff.output_token,
    }
}

// endregion: --- Swap

// region: --- Status

/// One status query for a submitted transaction.
///
/// **Route**: `POST /api/check-status`
///
/// Success (200): `{ "success": false, "expired": false, "status": { ...router data... } }`
///
/// Error (400): `{ "error": "..." }` for a bad body or a failed router query.
#[instrument(skip_all)]
pub async fn check_status(
    State(service): State<Arc<SwapService>>,
    payload: Result<Json<CheckStatusRequest>, JsonRejection>,
) -> Result<Json<CheckStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(body) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    if body.hash.trim().is_empty() {
        return Err(bad_request("hash is required".to_string()));
    }

    let status = service
        .check_status(body.hash.trim(), body.last_valid_block_height)
        .await
        .map_err(|e| {
            e.trace();
            bad_request(reason_of(&e))
        })?;

    Ok(Json(CheckStatusResponse {
        success: status.success,
        expired: status.expired,
        status: status.raw,
    }))
}

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

// endregion: --- Status
