//! # Router Status API

use super::client::RouterHttpClient;
use super::types::TxStatus;
use lib_core::error::{AppError, Result};
use serde_json::Value;
use tracing::debug;

pub const STATUS_PATH: &str = "/defi/router/v1/sol/tx/get_transaction_status";

impl RouterHttpClient {
    /// Query the settlement status of a submitted transaction.
    pub async fn get_transaction_status(
        &self,
        tracking_id: &str,
        last_valid_block_height: u64,
    ) -> Result<TxStatus> {
        let url = self.endpoint(STATUS_PATH);
        let last_valid_height = last_valid_block_height.to_string();

        debug!("Router status request: {} (valid until {})", tracking_id, last_valid_height);

        let response = self
            .http
            .get(&url)
            .query(&[("hash", tracking_id), ("last_valid_height", last_valid_height.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Status(format!("status request failed: {}", e)))?;

        let raw = self
            .read_envelope::<Value>(response)
            .await
            .map_err(AppError::Status)?
            .into_result(AppError::Status)?;

        Ok(TxStatus::from_value(raw))
    }
}
