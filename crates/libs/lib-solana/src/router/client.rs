//! # Router HTTP Client
//!
//! HTTP client wrapper shared by the quote, submit and status calls.

use super::types::{RouterEnvelope, RouterReply};
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// HTTP client wrapper for the swap router API
pub struct RouterHttpClient {
    pub http: Client,
    /// Base URL without trailing slash
    pub api_host: String,
    /// Slippage sent with every quote, in whole percent
    pub slippage_pct: u8,
    /// Priority fee sent with every quote, in SOL
    pub fee_sol: Decimal,
}

impl RouterHttpClient {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_host, path)
    }

    /// Read a reply into a validated [`RouterReply`].
    ///
    /// The envelope is parsed even on non-2xx responses since the router reports
    /// its reason there. Only an unparsable body falls back to the HTTP status.
    pub async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<RouterReply<T>, String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read router reply: {}", e))?;

        match serde_json::from_str::<RouterEnvelope>(&body) {
            Ok(envelope) => Ok(envelope.into_reply()),
            Err(_) if !status.is_success() => Err(format!("router returned HTTP {}: {}", status, body.trim())),
            Err(e) => Err(format!("malformed router reply: {}", e)),
        }
    }
}
