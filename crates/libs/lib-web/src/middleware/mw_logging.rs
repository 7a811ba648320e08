//! # Request/Response Logging Middleware
//!
//! One structured line per request and one per response, tagged with the request ID.
//! Swap requests can run for minutes while settlement is polled, so the response line
//! carries the full duration.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::middleware::mw_req_stamp::RequestStamp;

/// Headers never written to the log.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key"];

/// Request/response logging middleware.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = RequestStamp::id_of(&req);

    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                Some((name.to_string(), "***REDACTED***".to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect();

    info!(request_id = %request_id, method = %method, path = %path, "[REQUEST] {} {}", method, path);
    debug!(request_id = %request_id, headers = ?headers, "[REQUEST HEADERS]");

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        error!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method, path, status, duration.as_millis()
        );
    } else if response.status().is_client_error() {
        warn!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method, path, status, duration.as_millis()
        );
    } else {
        info!(
            request_id = %request_id,
            status,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms)",
            method, path, status, duration.as_millis()
        );
    }

    response
}
