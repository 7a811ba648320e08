//! # Swap Data Transfer Objects
//!
//! Request and response bodies of the swap endpoints.
//!
//! ## Wire Format
//!
//! All DTOs use **camelCase** field names. Amounts are decimal strings so no
//! precision is lost in transit.
//!
//! ```json
//! {
//!   "success": true,
//!   "hash": "5xQ...",
//!   "duration": "4.21",
//!   "solscanUrl": "https://solscan.io/tx/5xQ...",
//!   "walletAddress": "8W6Q...",
//!   "balances": {
//!     "before": { "inputToken": "2.5", "outputToken": "0" },
//!     "after":  { "inputToken": "1", "outputToken": "310.2" },
//!     "diff":   { "inputToken": "-1.5", "outputToken": "310.2" }
//!   },
//!   "logs": ["[2024-05-01T12:30:00.000Z] === SWAP RUN START ===", "..."]
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/swap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestBody {
    #[serde(default)]
    pub input_token: String,
    #[serde(default)]
    pub output_token: String,
    /// Accepts a JSON number or a decimal string
    pub amount: Decimal,
}

/// Per-token amounts, used for snapshots and the diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub input_token: Decimal,
    pub output_token: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub before: TokenPair,
    pub after: TokenPair,
    pub diff: TokenPair,
}

/// Successful swap response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapSuccessResponse {
    pub success: bool,
    pub hash: String,
    /// Seconds from request to confirmed settlement, two decimals
    pub duration: String,
    pub solscan_url: String,
    pub wallet_address: String,
    pub balances: BalanceReport,
    pub logs: Vec<String>,
}

/// Any non-success swap outcome. `logs` is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub logs: Vec<String>,
}

/// Body of `POST /api/check-status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusRequest {
    pub hash: String,
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatusResponse {
    pub success: bool,
    pub expired: bool,
    /// Raw status payload from the router
    pub status: serde_json::Value,
}

/// Plain error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_amount_accepts_number_or_string() {
        let from_number: SwapRequestBody =
            serde_json::from_str(r#"{"inputToken":"a","outputToken":"b","amount":1.5}"#).unwrap();
        let from_string: SwapRequestBody =
            serde_json::from_str(r#"{"inputToken":"a","outputToken":"b","amount":"1.5"}"#).unwrap();

        assert_eq!(from_number.amount, Decimal::from_str("1.5").unwrap());
        assert_eq!(from_string.amount, from_number.amount);
    }

    #[test]
    fn test_missing_tokens_default_to_empty() {
        let body: SwapRequestBody = serde_json::from_str(r#"{"amount":"2"}"#).unwrap();
        assert!(body.input_token.is_empty());
        assert!(body.output_token.is_empty());
    }

    #[test]
    fn test_error_response_skips_empty_fields() {
        let body = SwapErrorResponse {
            error: "insufficient liquidity".to_string(),
            code: Some("Route".to_string()),
            hash: None,
            wallet_address: None,
            logs: vec![],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "insufficient liquidity");
        assert!(json.get("hash").is_none());
        assert!(json["logs"].as_array().unwrap().is_empty());
    }
}
