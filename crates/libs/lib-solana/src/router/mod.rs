//! # Swap Router Client
//!
//! Client for the swap router's three calls: quote a route, submit a signed
//! transaction, query settlement status. Every call is a single attempt; retry
//! policy belongs to the caller.

// region: --- Modules
pub mod types;
pub mod client;
pub mod quote;
pub mod submit;
pub mod status;

// endregion: --- Modules

use async_trait::async_trait;
use client::RouterHttpClient;
use lib_core::error::Result;
use lib_core::model::{Route, SignedTransaction};
use rust_decimal::Decimal;
use std::time::Duration;

pub use types::{RouteParams, RouterReply, TxStatus};

const DEFAULT_API_HOST: &str = "https://gmgn.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The router operations the swap engine depends on.
///
/// Implemented over HTTP by [`RouterClient`]; tests substitute scripted mocks.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    /// Quote a route. Failures are `AppError::Route`.
    async fn get_swap_route(&self, params: &RouteParams) -> Result<Route>;

    /// Submit a signed transaction, returning the tracking id. Failures are `AppError::Submit`.
    async fn submit_signed_transaction(&self, tx: &SignedTransaction) -> Result<String>;

    /// One status observation. Failures are `AppError::Status`.
    async fn get_transaction_status(&self, tracking_id: &str, last_valid_block_height: u64) -> Result<TxStatus>;
}

// region: --- Main Client

/// Builder for configuring RouterClient.
#[derive(Debug, Clone)]
pub struct RouterClientBuilder {
    timeout: Option<Duration>,
    api_host: Option<String>,
    slippage_pct: u8,
    fee_sol: Decimal,
}

impl Default for RouterClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            api_host: Some(DEFAULT_API_HOST.to_string()),
            slippage_pct: 3,
            fee_sol: Decimal::ZERO,
        }
    }
}

impl RouterClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the router base URL.
    pub fn api_host(mut self, url: String) -> Self {
        self.api_host = Some(url);
        self
    }

    /// Slippage tolerance in whole percent.
    pub fn slippage_pct(mut self, slippage_pct: u8) -> Self {
        self.slippage_pct = slippage_pct;
        self
    }

    /// Priority fee in SOL.
    pub fn fee_sol(mut self, fee_sol: Decimal) -> Self {
        self.fee_sol = fee_sol;
        self
    }

    /// Build the RouterClient with configured settings.
    pub fn build(self) -> anyhow::Result<RouterClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        let api_host = self
            .api_host
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
            .trim_end_matches('/')
            .to_string();

        let inner = RouterHttpClient {
            http,
            api_host,
            slippage_pct: self.slippage_pct,
            fee_sol: self.fee_sol,
        };

        Ok(RouterClient { inner })
    }
}

/// HTTP client for the swap router API.
pub struct RouterClient {
    inner: RouterHttpClient,
}

impl RouterClient {
    /// Create a router client using a builder for configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use lib_solana::router::RouterClient;
    ///
    /// let client = RouterClient::builder()
    ///     .api_host("https://gmgn.ai".to_string())
    ///     .slippage_pct(3)
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn builder() -> RouterClientBuilder {
        RouterClientBuilder::default()
    }
}

#[async_trait]
impl SwapRouter for RouterClient {
    async fn get_swap_route(&self, params: &RouteParams) -> Result<Route> {
        self.inner.get_swap_route(params).await
    }

    async fn submit_signed_transaction(&self, tx: &SignedTransaction) -> Result<String> {
        self.inner.submit_signed_transaction(tx).await
    }

    async fn get_transaction_status(&self, tracking_id: &str, last_valid_block_height: u64) -> Result<TxStatus> {
        self.inner.get_transaction_status(tracking_id, last_valid_block_height).await
    }
}

// endregion: --- Main Client
