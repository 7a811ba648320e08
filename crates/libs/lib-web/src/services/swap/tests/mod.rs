//! # Swap Service Tests
//!
//! End-to-end runs against scripted router and balance mocks. The tokio clock is
//! paused, so poll intervals and the settle delay elapse instantly.

mod scenarios;

use super::*;
use lib_core::model::Mint;
use mocks::{MockReader, MockRouter};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn test_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(1),
        max_attempts: Some(10),
        timeout: None,
    }
}

/// Service wired to the given mocks.
pub fn test_service(router: &Arc<MockRouter>, reader: &Arc<MockReader>, keypair: &Arc<Keypair>) -> SwapService {
    SwapService::new(router.clone(), reader.clone(), keypair.clone(), &Config::default())
        .with_policy(test_policy())
}

/// 1.5 SOL -> USDC.
pub fn sol_to_usdc() -> SwapRequest {
    SwapRequest::new(Mint::native(), Mint::new(USDC), dec("1.5"))
}
