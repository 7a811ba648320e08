//! # Swap Domain Model
//!
//! Types that flow through one swap run: the caller's [`SwapRequest`], the router's
//! [`Route`], the [`SignedTransaction`], the [`SubmissionHandle`], the
//! [`SettlementStatus`] state machine, and the balance snapshots used to prove the
//! swap's effect.

use crate::error::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Wrapped SOL mint, used by routers to denote the native asset.
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// Decimal precision of the native asset (lamports per SOL = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// Largest precision a `Decimal` scale can carry.
const MAX_DECIMALS: u8 = 28;

// region: --- Mint

/// Address of a fungible token or of the native asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mint(String);

impl Mint {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().to_string())
    }

    /// The native asset mint.
    pub fn native() -> Self {
        Self(NATIVE_MINT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_MINT
    }
}

impl fmt::Display for Mint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mint {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Mint {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

// endregion: --- Mint

// region: --- Amounts

/// Convert a human amount to base units: `round(amount × 10^decimals)`.
///
/// Rounds half away from zero. Fails when the result does not fit in a `u64` or
/// when it rounds down to zero base units.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64> {
    if decimals > MAX_DECIMALS {
        return Err(AppError::Validation(format!("unsupported token precision: {decimals} decimals")));
    }

    let scale = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
    let base = amount
        .checked_mul(scale)
        .ok_or_else(|| AppError::Validation(format!("amount {amount} is too large")))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let base = base
        .to_u64()
        .ok_or_else(|| AppError::Validation(format!("amount {amount} is out of range")))?;

    if base == 0 {
        return Err(AppError::Validation(format!(
            "amount {amount} is below the smallest unit of this token"
        )));
    }

    Ok(base)
}

/// Convert a raw base-unit quantity to human units.
pub fn from_base_units(raw: u64, decimals: u8) -> Decimal {
    let decimals = decimals.min(MAX_DECIMALS);
    Decimal::from_i128_with_scale(raw as i128, decimals as u32).normalize()
}

// endregion: --- Amounts

// region: --- Request

/// One swap as asked for by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub input_token: Mint,
    pub output_token: Mint,
    /// Quantity of `input_token` to spend, in human units
    pub amount: Decimal,
}

impl SwapRequest {
    pub fn new(input_token: impl Into<Mint>, output_token: impl Into<Mint>, amount: Decimal) -> Self {
        Self {
            input_token: input_token.into(),
            output_token: output_token.into(),
            amount,
        }
    }

    /// Checks that need no network access.
    pub fn validate(&self) -> Result<()> {
        lib_utils::validate_not_empty(self.input_token.as_str(), "inputToken")
            .map_err(AppError::Validation)?;
        lib_utils::validate_not_empty(self.output_token.as_str(), "outputToken")
            .map_err(AppError::Validation)?;
        lib_utils::validate_distinct(
            self.input_token.as_str(),
            self.output_token.as_str(),
            "inputToken",
            "outputToken",
        )
        .map_err(AppError::Validation)?;

        if self.amount <= Decimal::ZERO {
            return Err(AppError::Validation("amount must be greater than 0".to_string()));
        }

        Ok(())
    }
}

// endregion: --- Request

// region: --- Route / Transaction

/// Router-computed bundle for one request. Consumed once by the signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Base64-encoded unsigned transaction
    pub swap_transaction: String,
    /// Block height past which the transaction can no longer land
    pub last_valid_block_height: u64,
    /// Quote metadata, when the router provides it
    pub quote: Option<RouteQuote>,
}

/// Routing metadata accompanying a [`Route`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub in_amount: String,
    pub out_amount: String,
    pub price_impact_pct: Option<f64>,
}

/// A route transaction carrying the wallet's signature, encoded for transport.
///
/// Keeps the route's deadline marker so the submission handle can be built without
/// holding on to the consumed [`Route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    encoded: String,
    signature: String,
    last_valid_block_height: u64,
}

impl SignedTransaction {
    pub fn new(encoded: String, signature: String, last_valid_block_height: u64) -> Self {
        Self { encoded, signature, last_valid_block_height }
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    /// Base64 transport encoding.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Base58 signature attached by the wallet.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// What the router hands back after accepting a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionHandle {
    pub tracking_id: String,
    pub last_valid_block_height: u64,
}

// endregion: --- Route / Transaction

// region: --- Settlement

/// Settlement state of a submitted transaction.
///
/// ```text
/// Pending ──► Success
///    │ ├────► Expired
///    │ ├────► Failed(reason)
///    └─┴────► TimedOut { attempts, elapsed }
/// ```
///
/// Every state except `Pending` is terminal: [`SettlementStatus::advance`] returns a
/// terminal state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Success,
    Expired,
    Failed { reason: String },
    TimedOut { attempts: u32, elapsed_ms: u64 },
}

/// One observation made by the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollObservation {
    Landed,
    Expired,
    StillPending,
    QueryFailed(String),
    BoundReached { attempts: u32, elapsed: Duration },
}

impl SettlementStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SettlementStatus::Pending)
    }

    /// Apply an observation. Only `Pending` moves.
    pub fn advance(self, observation: PollObservation) -> Self {
        if self.is_terminal() {
            return self;
        }

        match observation {
            PollObservation::Landed => SettlementStatus::Success,
            PollObservation::Expired => SettlementStatus::Expired,
            PollObservation::StillPending => SettlementStatus::Pending,
            PollObservation::QueryFailed(reason) => SettlementStatus::Failed { reason },
            PollObservation::BoundReached { attempts, elapsed } => SettlementStatus::TimedOut {
                attempts,
                elapsed_ms: elapsed.as_millis() as u64,
            },
        }
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::Pending => write!(f, "pending"),
            SettlementStatus::Success => write!(f, "success"),
            SettlementStatus::Expired => write!(f, "expired"),
            SettlementStatus::Failed { reason } => write!(f, "failed: {reason}"),
            SettlementStatus::TimedOut { attempts, elapsed_ms } => {
                write!(f, "timed out after {attempts} status checks ({elapsed_ms} ms)")
            }
        }
    }
}

// endregion: --- Settlement

// region: --- Balances

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotPhase {
    Before,
    After,
}

/// Wallet holdings of both swap tokens at one moment, in human units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub phase: SnapshotPhase,
    pub input_token_amount: Decimal,
    pub output_token_amount: Decimal,
}

/// Signed change per token between two snapshots. Positive = gained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDiff {
    pub input_token: Decimal,
    pub output_token: Decimal,
}

impl BalanceDiff {
    pub fn between(before: &BalanceSnapshot, after: &BalanceSnapshot) -> Self {
        Self {
            input_token: after.input_token_amount - before.input_token_amount,
            output_token: after.output_token_amount - before.output_token_amount,
        }
    }
}

// endregion: --- Balances

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_base_units_scales_and_rounds() {
        assert_eq!(to_base_units(dec("1.5"), 9).unwrap(), 1_500_000_000);
        assert_eq!(to_base_units(dec("0.0000005"), 6).unwrap(), 1);
        assert_eq!(to_base_units(dec("2.4999999"), 6).unwrap(), 2_500_000);
        assert_eq!(to_base_units(dec("12"), 0).unwrap(), 12);
    }

    #[test]
    fn test_to_base_units_is_monotonic() {
        let amounts = ["0.000001", "0.0000015", "0.1", "0.1000004", "0.1000006", "1", "1.5", "42.123456789", "1000"];
        for decimals in [0u8, 6, 9] {
            let mut previous = 0u64;
            for amount in amounts {
                let Ok(base) = to_base_units(dec(amount), decimals) else {
                    continue;
                };
                assert!(base >= previous, "{amount} at {decimals} decimals went backwards");
                previous = base;
            }
        }
    }

    #[test]
    fn test_to_base_units_rejects_dust_and_overflow() {
        assert!(matches!(to_base_units(dec("0.0000000001"), 9), Err(AppError::Validation(_))));
        assert!(matches!(to_base_units(dec("100000000000"), 9), Err(AppError::Validation(_))));
        assert!(matches!(to_base_units(dec("1"), 30), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_from_base_units() {
        assert_eq!(from_base_units(1_500_000_000, 9), dec("1.5"));
        assert_eq!(from_base_units(0, 6), Decimal::ZERO);
        assert_eq!(from_base_units(123, 0), dec("123"));
    }

    #[test]
    fn test_request_validation() {
        let ok = SwapRequest::new(NATIVE_MINT, "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm", dec("1.5"));
        assert!(ok.validate().is_ok());

        let same = SwapRequest::new(NATIVE_MINT, NATIVE_MINT, dec("1"));
        assert!(matches!(same.validate(), Err(AppError::Validation(_))));

        let zero = SwapRequest::new(NATIVE_MINT, "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm", Decimal::ZERO);
        assert!(matches!(zero.validate(), Err(AppError::Validation(_))));

        let empty = SwapRequest::new("", NATIVE_MINT, dec("1"));
        assert!(matches!(empty.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_terminal_states_never_move() {
        let observations = [
            PollObservation::Landed,
            PollObservation::Expired,
            PollObservation::StillPending,
            PollObservation::QueryFailed("boom".to_string()),
            PollObservation::BoundReached { attempts: 3, elapsed: Duration::from_secs(3) },
        ];
        let terminals = [
            SettlementStatus::Success,
            SettlementStatus::Expired,
            SettlementStatus::Failed { reason: "x".to_string() },
            SettlementStatus::TimedOut { attempts: 1, elapsed_ms: 10 },
        ];

        for terminal in terminals {
            for observation in observations.clone() {
                assert_eq!(terminal.clone().advance(observation), terminal);
            }
        }
    }

    #[test]
    fn test_pending_transitions() {
        assert_eq!(SettlementStatus::Pending.advance(PollObservation::Landed), SettlementStatus::Success);
        assert_eq!(SettlementStatus::Pending.advance(PollObservation::Expired), SettlementStatus::Expired);
        assert_eq!(SettlementStatus::Pending.advance(PollObservation::StillPending), SettlementStatus::Pending);
        assert_eq!(
            SettlementStatus::Pending.advance(PollObservation::QueryFailed("rate limited".to_string())),
            SettlementStatus::Failed { reason: "rate limited".to_string() }
        );
    }

    #[test]
    fn test_balance_diff_is_signed() {
        let before = BalanceSnapshot {
            phase: SnapshotPhase::Before,
            input_token_amount: dec("10"),
            output_token_amount: dec("0"),
        };
        let after = BalanceSnapshot {
            phase: SnapshotPhase::After,
            input_token_amount: dec("8.5"),
            output_token_amount: dec("312.25"),
        };

        let diff = BalanceDiff::between(&before, &after);
        assert_eq!(diff.input_token, dec("-1.5"));
        assert_eq!(diff.output_token, dec("312.25"));
    }
}
