//! # Submission & Settlement
//!
//! Hands a signed transaction to the router and follows it to a terminal state.
//!
//! ```text
//! submit ──► Pending ──► query status ──┬─► success == true  ──► Success
//!               ▲                       ├─► expired == true  ──► Expired
//!               │                       ├─► query failed     ──► Failed(reason)
//!               │                       └─► neither
//!               │                              │
//!               └──── sleep(interval) ◄── bound not reached ──► TimedOut
//! ```
//!
//! Status is always queried before sleeping, and nothing is retried or resubmitted.
//!
//! ## Cancellation
//!
//! There is no cancellation token. Dropping the future returned by
//! [`poll_until_terminal`] stops polling, but the submitted transaction may still
//! land on-chain afterwards.

use lib_core::config::Config;
use lib_core::error::{AppError, Result};
use lib_core::model::{PollObservation, RunLog, SettlementStatus, SignedTransaction, SubmissionHandle};
use lib_solana::router::SwapRouter;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Bounds of the status polling loop. `None` disables a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: Some(120),
            timeout: Some(Duration::from_secs(180)),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.poll_max_attempts(),
            timeout: config.poll_timeout(),
        }
    }

    fn bound_reached(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.timeout.is_some_and(|timeout| elapsed >= timeout)
    }
}

/// Submit a signed transaction. Not retried.
///
/// Once this returns `Ok`, the transaction may land regardless of what happens to
/// the caller.
#[instrument(skip_all, fields(run_id = %log.run_id()))]
pub async fn submit(
    router: &dyn SwapRouter,
    signed: &SignedTransaction,
    log: &mut RunLog,
) -> Result<SubmissionHandle> {
    log.append("Submitting signed transaction...");

    match router.submit_signed_transaction(signed).await {
        Ok(tracking_id) => {
            log.append("Transaction submitted");
            log.append(format!("Transaction hash: {}", tracking_id));
            Ok(SubmissionHandle {
                tracking_id,
                last_valid_block_height: signed.last_valid_block_height(),
            })
        }
        Err(e) => {
            log.append(format!("Transaction submit error: {}", reason_of(&e)));
            Err(e)
        }
    }
}

/// Poll the router until the transaction reaches a terminal state.
///
/// Never fails: a failed status query ends in [`SettlementStatus::Failed`] and a
/// reached bound ends in [`SettlementStatus::TimedOut`].
#[instrument(skip_all, fields(run_id = %log.run_id(), tracking_id = %handle.tracking_id))]
pub async fn poll_until_terminal(
    router: &dyn SwapRouter,
    handle: &SubmissionHandle,
    policy: &PollPolicy,
    log: &mut RunLog,
) -> SettlementStatus {
    let started = Instant::now();
    let mut status = SettlementStatus::Pending;
    let mut attempts: u32 = 0;

    log.append("Checking transaction status...");

    loop {
        attempts += 1;

        let observation = match router
            .get_transaction_status(&handle.tracking_id, handle.last_valid_block_height)
            .await
        {
            Ok(tx) if tx.success => PollObservation::Landed,
            Ok(tx) if tx.expired => PollObservation::Expired,
            Ok(_) => PollObservation::StillPending,
            Err(e) => PollObservation::QueryFailed(reason_of(&e)),
        };

        status = status.advance(observation);

        match &status {
            SettlementStatus::Pending => {
                debug!("Status check #{}: pending", attempts);
                log.append(format!("Transaction processing... (check #{})", attempts));
            }
            SettlementStatus::Success => {
                log.append("Transaction confirmed");
            }
            SettlementStatus::Expired => {
                log.append("Transaction expired");
            }
            SettlementStatus::Failed { reason } => {
                warn!("Status query failed: {}", reason);
                log.append(format!("Status check error: {}", reason));
            }
            SettlementStatus::TimedOut { .. } => {}
        }

        if status.is_terminal() {
            return status;
        }

        let elapsed = started.elapsed();
        if policy.bound_reached(attempts, elapsed) {
            status = status.advance(PollObservation::BoundReached { attempts, elapsed });
            log.append(format!("Stopped polling: {}", status));
            return status;
        }

        tokio::time::sleep(policy.interval).await;
    }
}

/// The bare reason of a pipeline error, without the variant prefix.
pub(crate) fn reason_of(err: &AppError) -> String {
    match err {
        AppError::Validation(msg)
        | AppError::Route(msg)
        | AppError::Sign(msg)
        | AppError::Submit(msg)
        | AppError::Status(msg) => msg.clone(),
        other => other.to_string(),
    }
}
