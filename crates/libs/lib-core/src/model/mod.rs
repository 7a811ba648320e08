//! # Domain Model
//!
//! Swap run types and the run-scoped log.

pub mod run_log;
pub mod swap;

pub use run_log::{LogEntry, RunLog};
pub use swap::{
    BalanceDiff, BalanceSnapshot, Mint, PollObservation, Route, RouteQuote, SettlementStatus,
    SignedTransaction, SnapshotPhase, SubmissionHandle, SwapRequest, from_base_units, to_base_units,
    NATIVE_DECIMALS, NATIVE_MINT,
};
