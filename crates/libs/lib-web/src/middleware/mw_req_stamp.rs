//! # Request Stamping Middleware
//!
//! Gives every request a unique ID, available to handlers and echoed back in the
//! `X-Request-ID` response header.
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use lib_web::middleware::mw_req_stamp::RequestStamp;
//!
//! async fn handler(Extension(stamp): Extension<RequestStamp>) -> String {
//!     format!("Request ID: {}", stamp.id)
//! }
//! ```

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request metadata for tracing.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    pub id: String,
}

impl RequestStamp {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    /// Stamp of a request, `"unknown"` when the middleware did not run.
    pub fn id_of<B>(req: &axum::http::Request<B>) -> String {
        req.extensions()
            .get::<RequestStamp>()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Request stamping middleware.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::new();
    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}
