//! # Balance Reader
//!
//! On-chain reads of token precision and wallet holdings.
//!
//! - Native SOL: lamports from `getBalance`, scaled by 10^9.
//! - SPL tokens: every token account the wallet owns for the mint, found with
//!   `getTokenAccountsByOwner`, summed and scaled by the mint's `decimals` (byte 44
//!   of the mint account). A wallet without a token account reads as zero.
//!
//! Both the Token and the Token-2022 programs are accepted as mint owners.

use async_trait::async_trait;
use lib_core::error::{AppError, Result};
use lib_core::model::{from_base_units, Mint, NATIVE_DECIMALS};
use rust_decimal::Decimal;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::debug;

use crate::client::SolanaClient;

pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const TOKEN_2022_PROGRAM_ID: Pubkey = Pubkey::from_str_const("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

const MINT_LEN: usize = 82;
const MINT_DECIMALS_OFFSET: usize = 44;

/// Reads token precision and wallet balances.
#[async_trait]
pub trait BalanceReader: Send + Sync {
    /// Decimal precision of a mint. The native mint is always 9.
    async fn token_decimals(&self, mint: &Mint) -> Result<u8>;

    /// Holding of `mint` by `wallet`, in human units.
    async fn balance(&self, wallet: &Pubkey, mint: &Mint) -> Result<Decimal>;
}

// region: --- Account layouts

/// `decimals` of an SPL mint account.
pub fn decode_mint_decimals(data: &[u8]) -> Option<u8> {
    if data.len() < MINT_LEN {
        return None;
    }
    Some(data[MINT_DECIMALS_OFFSET])
}

/// Sum of `tokenAmount.amount` over `jsonParsed` token accounts of `mint`.
///
/// Accounts of another mint are skipped. `None` when an account is not parsed token
/// data or its amount is unreadable.
pub fn sum_parsed_token_amounts(accounts: &[Value], mint: &str) -> Option<u64> {
    let mut total: u64 = 0;
    for data in accounts {
        let info = data.get("parsed")?.get("info")?;
        if info.get("mint").and_then(Value::as_str) != Some(mint) {
            continue;
        }
        let amount = info
            .get("tokenAmount")?
            .get("amount")?
            .as_str()?
            .parse::<u64>()
            .ok()?;
        total = total.checked_add(amount)?;
    }
    Some(total)
}

fn is_token_program(owner: &Pubkey) -> bool {
    *owner == TOKEN_PROGRAM_ID || *owner == TOKEN_2022_PROGRAM_ID
}

fn parse_pubkey(value: &str, what: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| AppError::Validation(format!("invalid {} {}: {}", what, value, e)))
}

// endregion: --- Account layouts

/// [`BalanceReader`] over Solana JSON-RPC.
pub struct RpcBalanceReader {
    rpc: SolanaClient,
}

impl RpcBalanceReader {
    pub fn new(rpc: SolanaClient) -> Self {
        Self { rpc }
    }

    /// Decimals of a mint owned by a token program.
    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let account = self
            .rpc
            .get_account_optional(mint)
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?
            .ok_or_else(|| AppError::Validation(format!("mint {} not found", mint)))?;

        if !is_token_program(&account.owner) {
            return Err(AppError::Validation(format!("{} is not a token mint", mint)));
        }

        decode_mint_decimals(&account.data)
            .ok_or_else(|| AppError::Decoding(format!("mint {} has a malformed account", mint)))
    }
}

#[async_trait]
impl BalanceReader for RpcBalanceReader {
    async fn token_decimals(&self, mint: &Mint) -> Result<u8> {
        if mint.is_native() {
            return Ok(NATIVE_DECIMALS);
        }

        let mint_key = parse_pubkey(mint.as_str(), "mint")?;
        self.mint_decimals(&mint_key).await
    }

    async fn balance(&self, wallet: &Pubkey, mint: &Mint) -> Result<Decimal> {
        if mint.is_native() {
            let lamports = self
                .rpc
                .get_balance(wallet)
                .await
                .map_err(|e| AppError::Rpc(e.to_string()))?;
            return Ok(from_base_units(lamports, NATIVE_DECIMALS));
        }

        let mint_key = parse_pubkey(mint.as_str(), "mint")?;
        let decimals = self.mint_decimals(&mint_key).await?;

        let accounts = self
            .rpc
            .get_token_accounts_by_owner(wallet, &mint_key)
            .await
            .map_err(|e| AppError::Rpc(e.to_string()))?;
        if accounts.is_empty() {
            debug!("No token account of {} for mint {}, reading 0", wallet, mint);
            return Ok(Decimal::ZERO);
        }

        let raw = sum_parsed_token_amounts(&accounts, mint.as_str())
            .ok_or_else(|| AppError::Decoding(format!("token accounts of {} for {} are malformed", wallet, mint)))?;

        Ok(from_base_units(raw, decimals))
    }
}
