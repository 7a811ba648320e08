//! # Router Submit API
//!
//! Hands a signed transaction to the router for broadcast.

use super::client::RouterHttpClient;
use super::types::SubmitData;
use lib_core::error::{AppError, Result};
use lib_core::model::SignedTransaction;
use serde_json::json;
use tracing::debug;

pub const SUBMIT_PATH: &str = "/defi/router/v1/sol/tx/submit_signed_transaction";

impl RouterHttpClient {
    /// Submit a signed transaction and return the router's tracking id. Not retried.
    pub async fn submit_signed_transaction(&self, tx: &SignedTransaction) -> Result<String> {
        let url = self.endpoint(SUBMIT_PATH);

        debug!("Router submit request for signature {}", tx.signature());

        let response = self
            .http
            .post(&url)
            .json(&json!({ "signed_tx": tx.encoded() }))
            .send()
            .await
            .map_err(|e| AppError::Submit(format!("submit request failed: {}", e)))?;

        let data = self
            .read_envelope::<SubmitData>(response)
            .await
            .map_err(AppError::Submit)?
            .into_result(AppError::Submit)?;

        if data.hash.trim().is_empty() {
            return Err(AppError::Submit("router returned an empty hash".to_string()));
        }

        Ok(data.hash)
    }
}
