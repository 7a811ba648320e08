//! # Router API Types
//!
//! Wire types of the swap router. Every reply is wrapped in the same envelope:
//!
//! ```json
//! { "code": 0, "msg": "success", "data": { ... } }
//! ```
//!
//! A non-zero `code` is a failure even when the HTTP status is 200.

use lib_core::error::{AppError, Result};
use lib_core::model::{Mint, Route, RouteQuote};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Raw reply envelope. `data` stays untyped until `code` says it is meaningful.
#[derive(Debug, Deserialize)]
pub struct RouterEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// A router reply, validated once.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterReply<T> {
    Success(T),
    Failure(String),
}

impl RouterEnvelope {
    /// Check the discriminator and decode `data` into `T`.
    pub fn into_reply<T: DeserializeOwned>(self) -> RouterReply<T> {
        if self.code != 0 {
            let reason = self
                .msg
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("router returned code {}", self.code));
            return RouterReply::Failure(reason);
        }

        let Some(data) = self.data else {
            return RouterReply::Failure("router reply has no data".to_string());
        };

        match serde_json::from_value(data) {
            Ok(parsed) => RouterReply::Success(parsed),
            Err(e) => RouterReply::Failure(format!("malformed router data: {}", e)),
        }
    }
}

impl<T> RouterReply<T> {
    /// Turn a failure into the caller's error variant.
    pub fn into_result(self, wrap: impl FnOnce(String) -> AppError) -> Result<T> {
        match self {
            RouterReply::Success(data) => Ok(data),
            RouterReply::Failure(reason) => Err(wrap(reason)),
        }
    }
}

// region: --- Route

/// `data` of a route reply.
#[derive(Debug, Deserialize)]
pub struct SwapRouteData {
    #[serde(default)]
    pub quote: Option<QuoteData>,
    pub raw_tx: RawTx,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTx {
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
}

/// Quote metadata. The router is loose about number vs string, so values stay raw.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    #[serde(default)]
    pub in_amount: Option<Value>,
    #[serde(default)]
    pub out_amount: Option<Value>,
    #[serde(default)]
    pub price_impact_pct: Option<Value>,
}

impl SwapRouteData {
    pub fn into_route(self) -> Route {
        Route {
            swap_transaction: self.raw_tx.swap_transaction,
            last_valid_block_height: self.raw_tx.last_valid_block_height,
            quote: self.quote.map(|q| RouteQuote {
                in_amount: q.in_amount.as_ref().map(value_to_string).unwrap_or_default(),
                out_amount: q.out_amount.as_ref().map(value_to_string).unwrap_or_default(),
                price_impact_pct: q.price_impact_pct.as_ref().and_then(value_to_f64),
            }),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// endregion: --- Route

// region: --- Submit / Status

#[derive(Debug, Deserialize)]
pub struct SubmitData {
    pub hash: String,
}

/// One status observation. `success` / `expired` are only true when the router
/// says exactly `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct TxStatus {
    pub success: bool,
    pub expired: bool,
    pub raw: Value,
}

impl TxStatus {
    pub fn from_value(raw: Value) -> Self {
        let flag = |name: &str| raw.get(name) == Some(&Value::Bool(true));
        Self {
            success: flag("success"),
            expired: flag("expired"),
            raw,
        }
    }
}

// endregion: --- Submit / Status

/// Parameters of one quote request. Slippage and fee come from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub input_token: Mint,
    pub output_token: Mint,
    /// Amount in the input token's base units
    pub in_amount: u64,
    /// Wallet that will sign the route
    pub from_address: String,
}
