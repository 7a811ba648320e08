//! # Application Configuration
//!
//! This module manages swap engine configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! if let Some(config) = core_config() {
//!     let router = &config.router_api_host;
//! }
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].
//! Signing key material is deliberately not part of [`Config`]; the server reads it
//! separately so it never ends up in a `Debug` print.

use lib_utils::envs::{get_env_or, get_env_parse_or};
use rust_decimal::Decimal;
use std::sync::OnceLock;
use std::time::Duration;

/// Swap engine configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Solana JSON-RPC endpoint used for balance and mint reads
    pub solana_rpc_url: String,

    /// Base URL of the swap router (quote / submit / status)
    pub router_api_host: String,

    /// Slippage tolerance sent with every quote, in whole percent.
    ///
    /// Valid range: 1-50
    pub slippage_pct: u8,

    /// Priority fee sent with every quote, in SOL
    pub fee_sol: Decimal,

    /// Wait between two settlement status queries
    pub poll_interval_ms: u64,

    /// Give up polling after this many status queries (0 = unbounded)
    pub poll_max_attempts: u32,

    /// Give up polling after this many seconds (0 = unbounded)
    pub poll_timeout_secs: u64,

    /// Pause between a successful settlement and the "after" balance read,
    /// giving RPC nodes time to observe the new state
    pub balance_settle_delay_ms: u64,

    /// Explorer prefix; the tracking id is appended to build a link
    pub explorer_tx_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solana_rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            router_api_host: "https://gmgn.ai".to_string(),
            slippage_pct: 3,
            fee_sol: Decimal::ZERO,
            poll_interval_ms: 1_000,
            poll_max_attempts: 120,
            poll_timeout_secs: 180,
            balance_settle_delay_ms: 2_000,
            explorer_tx_url: "https://solscan.io/tx/".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables take the values of [`Config::default()`].
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let solana_rpc_url = get_env_or("SOLANA_RPC_URL", &defaults.solana_rpc_url);
        let router_api_host = get_env_or("ROUTER_API_HOST", &defaults.router_api_host)
            .trim_end_matches('/')
            .to_string();
        let explorer_tx_url = get_env_or("EXPLORER_TX_URL", &defaults.explorer_tx_url);

        let slippage_pct = get_env_parse_or("SWAP_SLIPPAGE_PCT", defaults.slippage_pct)
            .map_err(|e| e.to_string())?;
        let fee_sol = get_env_parse_or("SWAP_FEE_SOL", defaults.fee_sol)
            .map_err(|e| e.to_string())?;
        let poll_interval_ms = get_env_parse_or("POLL_INTERVAL_MS", defaults.poll_interval_ms)
            .map_err(|e| e.to_string())?;
        let poll_max_attempts = get_env_parse_or("POLL_MAX_ATTEMPTS", defaults.poll_max_attempts)
            .map_err(|e| e.to_string())?;
        let poll_timeout_secs = get_env_parse_or("POLL_TIMEOUT_SECS", defaults.poll_timeout_secs)
            .map_err(|e| e.to_string())?;
        let balance_settle_delay_ms =
            get_env_parse_or("BALANCE_SETTLE_DELAY_MS", defaults.balance_settle_delay_ms)
                .map_err(|e| e.to_string())?;

        Ok(Self {
            solana_rpc_url,
            router_api_host,
            slippage_pct,
            fee_sol,
            poll_interval_ms,
            poll_max_attempts,
            poll_timeout_secs,
            balance_settle_delay_ms,
            explorer_tx_url,
        })
    }

    /// Validate configuration values against business rules.
    pub fn validate(&self) -> Result<(), String> {
        if !self.router_api_host.starts_with("http://") && !self.router_api_host.starts_with("https://") {
            return Err("ROUTER_API_HOST must be an http(s) URL".to_string());
        }

        if !self.solana_rpc_url.starts_with("http://") && !self.solana_rpc_url.starts_with("https://") {
            return Err("SOLANA_RPC_URL must be an http(s) URL".to_string());
        }

        if self.slippage_pct < 1 || self.slippage_pct > 50 {
            return Err("SWAP_SLIPPAGE_PCT must be between 1 and 50".to_string());
        }

        if self.fee_sol.is_sign_negative() {
            return Err("SWAP_FEE_SOL cannot be negative".to_string());
        }

        if self.poll_interval_ms == 0 {
            return Err("POLL_INTERVAL_MS must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Wait between two status queries.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Maximum number of status queries, `None` when unbounded.
    pub fn poll_max_attempts(&self) -> Option<u32> {
        (self.poll_max_attempts > 0).then_some(self.poll_max_attempts)
    }

    /// Overall polling deadline, `None` when unbounded.
    pub fn poll_timeout(&self) -> Option<Duration> {
        (self.poll_timeout_secs > 0).then(|| Duration::from_secs(self.poll_timeout_secs))
    }

    /// Pause before the post-settlement balance read.
    pub fn balance_settle_delay(&self) -> Duration {
        Duration::from_millis(self.balance_settle_delay_ms)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// This should be called once at application startup, before any handlers
/// or services that need configuration are used.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG.set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// The global configuration, `None` until [`init_config()`] has run.
pub fn core_config() -> Option<&'static Config> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.poll_max_attempts(), Some(120));
        assert_eq!(config.poll_timeout(), Some(Duration::from_secs(180)));
    }

    #[test]
    fn test_zero_bounds_mean_unbounded() {
        let config = Config {
            poll_max_attempts: 0,
            poll_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_max_attempts(), None);
        assert_eq!(config.poll_timeout(), None);
    }

    #[test]
    fn test_validate_rejects_out_of_range_slippage() {
        let config = Config { slippage_pct: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = Config { slippage_pct: 51, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_fee() {
        let config = Config { fee_sol: Decimal::new(-1, 3), ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), "SWAP_FEE_SOL cannot be negative");
    }

    #[test]
    fn test_validate_rejects_non_http_router() {
        let config = Config { router_api_host: "gmgn.ai".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }
}
