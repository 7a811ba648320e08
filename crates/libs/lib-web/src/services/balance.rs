//! # Balance Snapshots
//!
//! Reads both swap tokens at one moment and compares two such readings.
//!
//! Balance reads are the one tolerant step of a swap run: a failed read is logged
//! and the token counts as zero, so a snapshot is always complete. Every other
//! network call in the run is fatal.

use lib_core::model::{BalanceDiff, BalanceSnapshot, Mint, RunLog, SnapshotPhase};
use lib_solana::balance::BalanceReader;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use tracing::warn;

/// Read both tokens for `wallet`. Never fails.
pub async fn snapshot(
    reader: &dyn BalanceReader,
    wallet: &Pubkey,
    input: &Mint,
    output: &Mint,
    phase: SnapshotPhase,
    log: &mut RunLog,
) -> BalanceSnapshot {
    let input_token_amount = read_or_zero(reader, wallet, input, log).await;
    let output_token_amount = read_or_zero(reader, wallet, output, log).await;

    BalanceSnapshot {
        phase,
        input_token_amount,
        output_token_amount,
    }
}

/// `after - before` per token.
pub fn diff(before: &BalanceSnapshot, after: &BalanceSnapshot) -> BalanceDiff {
    BalanceDiff::between(before, after)
}

async fn read_or_zero(reader: &dyn BalanceReader, wallet: &Pubkey, mint: &Mint, log: &mut RunLog) -> Decimal {
    log.append(format!("Reading {} balance...", mint));

    match reader.balance(wallet, mint).await {
        Ok(amount) => {
            log.append(format!("{} balance: {}", mint, amount));
            amount
        }
        Err(e) => {
            warn!("Balance read failed for {}: {}", mint, e);
            log.append(format!("Balance read failed for {}: {}", mint, e));
            Decimal::ZERO
        }
    }
}

/// Signed amount with an explicit `+` for gains.
pub fn format_change(amount: Decimal) -> String {
    if amount.is_sign_negative() {
        amount.normalize().to_string()
    } else {
        format!("+{}", amount.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lib_core::error::{AppError, Result};
    use std::str::FromStr;

    struct HalfBroken;

    #[async_trait]
    impl BalanceReader for HalfBroken {
        async fn token_decimals(&self, _mint: &Mint) -> Result<u8> {
            Ok(9)
        }

        async fn balance(&self, _wallet: &Pubkey, mint: &Mint) -> Result<Decimal> {
            if mint.is_native() {
                Ok(Decimal::from_str("2.5").unwrap())
            } else {
                Err(AppError::Rpc("node unavailable".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_failed_read_degrades_to_zero() {
        let mut log = RunLog::new("balance-test");
        let snap = snapshot(
            &HalfBroken,
            &Pubkey::new_unique(),
            &Mint::native(),
            &Mint::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            SnapshotPhase::Before,
            &mut log,
        )
        .await;

        assert_eq!(snap.input_token_amount, Decimal::from_str("2.5").unwrap());
        assert_eq!(snap.output_token_amount, Decimal::ZERO);
        assert!(log.lines().iter().any(|l| l.contains("Balance read failed")));
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Decimal::from_str("-1.500").unwrap()), "-1.5");
        assert_eq!(format_change(Decimal::from_str("310.2").unwrap()), "+310.2");
        assert_eq!(format_change(Decimal::ZERO), "+0");
    }
}
