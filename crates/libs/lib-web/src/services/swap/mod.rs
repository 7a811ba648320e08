//! # Swap Service
//!
//! Runs one swap end to end and verifies its settlement.
//!
//! ## Run Order
//!
//! ```text
//! validate ─► decimals ─► before snapshot ─► route ─► sign ─► submit ─► poll
//!                                                                        │
//!                                  Success ─► settle delay ─► after snapshot ─► diff
//! ```
//!
//! A rejected request never reaches the network. Route, sign and submit errors end
//! the run on the spot. `Expired` and `TimedOut` are reported as non-success
//! outcomes without an "after" snapshot. Every outcome carries the run's log.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lib_web::services::swap::SwapService;
//! # async fn example(service: SwapService) {
//! use lib_core::model::SwapRequest;
//! use rust_decimal::Decimal;
//!
//! let request = SwapRequest::new(
//!     "So11111111111111111111111111111111111111112",
//!     "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
//!     Decimal::new(15, 1),
//! );
//! let outcome = service.execute(&request).await;
//! for line in outcome.log_lines() {
//!     println!("{}", line);
//! }
//! # }
//! ```

use crate::services::balance::{self, format_change};
use crate::services::settlement::{self, reason_of, PollPolicy};
use lib_core::config::Config;
use lib_core::error::{AppError, Result};
use lib_core::model::{
    to_base_units, BalanceDiff, BalanceSnapshot, LogEntry, RunLog, SettlementStatus, SnapshotPhase,
    SwapRequest,
};
use lib_solana::balance::BalanceReader;
use lib_solana::router::{RouteParams, SwapRouter, TxStatus};
use lib_solana::signer;
use lib_utils::time::elapsed_secs;
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

#[cfg(test)]
pub(crate) mod tests;

/// A swap that settled, with its balance verification.
#[derive(Debug, Clone, PartialEq)]
pub struct SettledSwap {
    pub tracking_id: String,
    /// From the start of the run to confirmed settlement
    pub duration: Duration,
    pub explorer_url: String,
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
    pub diff: BalanceDiff,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SwapResult {
    Settled(SettledSwap),
    /// Submitted but not settled: `Expired` or `TimedOut`.
    Unsettled {
        tracking_id: String,
        status: SettlementStatus,
    },
    /// `tracking_id` is set when the failure happened after submission.
    Failed {
        error: AppError,
        tracking_id: Option<String>,
    },
}

/// Return value of [`SwapService::execute`].
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub run_id: String,
    pub wallet_address: String,
    pub result: SwapResult,
    pub logs: Vec<LogEntry>,
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.result, SwapResult::Settled(_))
    }

    /// Log entries rendered as `[timestamp] message`.
    pub fn log_lines(&self) -> Vec<String> {
        self.logs.iter().map(ToString::to_string).collect()
    }
}

/// Orchestrates swap runs. Cheap to share: every collaborator sits behind an `Arc`.
pub struct SwapService {
    router: Arc<dyn SwapRouter>,
    reader: Arc<dyn BalanceReader>,
    keypair: Arc<Keypair>,
    policy: PollPolicy,
    settle_delay: Duration,
    explorer_tx_url: String,
}

impl SwapService {
    pub fn new(
        router: Arc<dyn SwapRouter>,
        reader: Arc<dyn BalanceReader>,
        keypair: Arc<Keypair>,
        config: &Config,
    ) -> Self {
        Self {
            router,
            reader,
            keypair,
            policy: PollPolicy::from_config(config),
            settle_delay: config.balance_settle_delay(),
            explorer_tx_url: config.explorer_tx_url.clone(),
        }
    }

    /// Override the polling bounds.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn wallet_address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Run one swap. Never fails; the outcome says how the run ended.
    #[instrument(skip_all, fields(input = %request.input_token, output = %request.output_token, amount = %request.amount))]
    pub async fn execute(&self, request: &SwapRequest) -> SwapOutcome {
        let mut log = RunLog::new(Uuid::new_v4().to_string());
        let result = self.run(request, &mut log).await;

        match &result {
            SwapResult::Settled(settled) => info!("Swap settled: {}", settled.tracking_id),
            SwapResult::Unsettled { tracking_id, status } => info!("Swap {} not settled: {}", tracking_id, status),
            SwapResult::Failed { error, .. } => error.trace(),
        }

        SwapOutcome {
            run_id: log.run_id().to_string(),
            wallet_address: self.wallet_address(),
            result,
            logs: log.drain(),
        }
    }

    /// One status query for an already submitted transaction.
    pub async fn check_status(&self, tracking_id: &str, last_valid_block_height: u64) -> Result<TxStatus> {
        self.router.get_transaction_status(tracking_id, last_valid_block_height).await
    }

    async fn run(&self, request: &SwapRequest, log: &mut RunLog) -> SwapResult {
        if let Err(error) = request.validate() {
            log.append(format!("Request rejected: {}", reason_of(&error)));
            return failed(error, None);
        }

        let started = Instant::now();
        let wallet = self.keypair.pubkey();

        log.append("=== SWAP RUN START ===");
        log.append(format!(
            "Request: {} of {} -> {}",
            request.amount, request.input_token, request.output_token
        ));
        log.append(format!("Wallet address: {}", wallet));

        // region: --- Amount
        let decimals = match self.reader.token_decimals(&request.input_token).await {
            Ok(decimals) => decimals,
            Err(e) => {
                let error = AppError::Validation(format!(
                    "cannot resolve decimals of {}: {}",
                    request.input_token,
                    reason_of(&e)
                ));
                log.append(format!("Request rejected: {}", reason_of(&error)));
                return failed(error, None);
            }
        };
        log.append(format!("Input token decimals: {}", decimals));

        let in_amount = match to_base_units(request.amount, decimals) {
            Ok(raw) => raw,
            Err(error) => {
                log.append(format!("Request rejected: {}", reason_of(&error)));
                return failed(error, None);
            }
        };
        // endregion: --- Amount

        let before = balance::snapshot(
            self.reader.as_ref(),
            &wallet,
            &request.input_token,
            &request.output_token,
            SnapshotPhase::Before,
            log,
        )
        .await;
        log.append(format!(
            "Balance before - input: {}, output: {}",
            before.input_token_amount, before.output_token_amount
        ));

        // region: --- Route / Sign
        log.append("Requesting swap route...");
        let params = RouteParams {
            input_token: request.input_token.clone(),
            output_token: request.output_token.clone(),
            in_amount,
            from_address: wallet.to_string(),
        };
        let route = match self.router.get_swap_route(&params).await {
            Ok(route) => route,
            Err(error) => {
                log.append(format!("Route error: {}", reason_of(&error)));
                return failed(error, None);
            }
        };
        log.append("Route received");
        if let Some(quote) = &route.quote {
            log.append(format!(
                "Quote: {} -> {} base units (price impact {}%)",
                quote.in_amount,
                quote.out_amount,
                quote.price_impact_pct.map(|p| p.to_string()).unwrap_or_else(|| "n/a".to_string())
            ));
        }

        log.append("Signing transaction...");
        let signed = match signer::sign(&route, &self.keypair) {
            Ok(signed) => signed,
            Err(error) => {
                log.append(format!("Sign error: {}", reason_of(&error)));
                return failed(error, None);
            }
        };
        log.append("Transaction signed");
        // endregion: --- Route / Sign

        // region: --- Settlement
        let handle = match settlement::submit(self.router.as_ref(), &signed, log).await {
            Ok(handle) => handle,
            Err(error) => return failed(error, None),
        };
        let explorer_url = format!("{}{}", self.explorer_tx_url, handle.tracking_id);
        log.append(format!("Explorer URL: {}", explorer_url));

        let status = settlement::poll_until_terminal(self.router.as_ref(), &handle, &self.policy, log).await;
        let tracking_id = handle.tracking_id;

        match status {
            SettlementStatus::Success => {}
            SettlementStatus::Expired | SettlementStatus::TimedOut { .. } => {
                return SwapResult::Unsettled { tracking_id, status };
            }
            SettlementStatus::Failed { reason } => {
                return failed(AppError::Status(reason), Some(tracking_id));
            }
            SettlementStatus::Pending => {
                return failed(
                    AppError::Internal("polling ended while pending".to_string()),
                    Some(tracking_id),
                );
            }
        }
        // endregion: --- Settlement

        let duration = started.elapsed();
        log.append(format!("Transaction processed in {}s", elapsed_secs(duration)));

        tokio::time::sleep(self.settle_delay).await;

        log.append("Reading final balances...");
        let after = balance::snapshot(
            self.reader.as_ref(),
            &wallet,
            &request.input_token,
            &request.output_token,
            SnapshotPhase::After,
            log,
        )
        .await;
        let diff = balance::diff(&before, &after);

        log.append(format!(
            "Balance after - input: {} ({})",
            after.input_token_amount,
            format_change(diff.input_token)
        ));
        log.append(format!(
            "Balance after - output: {} ({})",
            after.output_token_amount,
            format_change(diff.output_token)
        ));

        SwapResult::Settled(SettledSwap {
            tracking_id,
            duration,
            explorer_url,
            before,
            after,
            diff,
        })
    }
}

fn failed(error: AppError, tracking_id: Option<String>) -> SwapResult {
    SwapResult::Failed { error, tracking_id }
}
