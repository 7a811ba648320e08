//! # Router Quote API
//!
//! Fetches a ready-to-sign swap transaction for a token pair.

use super::client::RouterHttpClient;
use super::types::{RouteParams, SwapRouteData};
use lib_core::error::{AppError, Result};
use lib_core::model::Route;
use tracing::debug;

pub const ROUTE_PATH: &str = "/defi/router/v1/sol/tx/get_swap_route";

impl RouterHttpClient {
    /// Get a swap route. Not retried.
    pub async fn get_swap_route(&self, params: &RouteParams) -> Result<Route> {
        let url = self.endpoint(ROUTE_PATH);
        let in_amount = params.in_amount.to_string();
        let slippage = self.slippage_pct.to_string();
        let fee = self.fee_sol.normalize().to_string();

        debug!(
            "Router quote request: {} -> {} ({} base units, slippage {}%)",
            params.input_token, params.output_token, in_amount, slippage
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("token_in_address", params.input_token.as_str()),
                ("token_out_address", params.output_token.as_str()),
                ("in_amount", in_amount.as_str()),
                ("from_address", params.from_address.as_str()),
                ("slippage", slippage.as_str()),
                ("fee", fee.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Route(format!("quote request failed: {}", e)))?;

        let route = self
            .read_envelope::<SwapRouteData>(response)
            .await
            .map_err(AppError::Route)?
            .into_result(AppError::Route)?
            .into_route();

        if route.swap_transaction.is_empty() {
            return Err(AppError::Route("router returned an empty transaction".to_string()));
        }

        debug!(
            "Router route received (last valid block height {})",
            route.last_valid_block_height
        );

        Ok(route)
    }
}
