//! # Solana RPC Client
//!
//! Thin wrapper around the nonblocking Solana RPC client, limited to the reads the
//! swap engine needs: native balances, raw account data and token accounts by owner.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_solana::client::SolanaClient;
//! use solana_sdk::pubkey::Pubkey;
//! use std::str::FromStr;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = SolanaClient::builder()
//!     .rpc_url("https://api.mainnet-beta.solana.com".to_string())
//!     .build();
//!
//! let wallet = Pubkey::from_str("8W6QginLcAydYyMYjxuyKQN56NzeakDE3aRFrAmocS6D")?;
//! let lamports = client.get_balance(&wallet).await?;
//! println!("Balance: {} lamports", lamports);
//! # Ok(())
//! # }
//! ```

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{account::Account, pubkey::Pubkey};
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// High-level Solana RPC client wrapper.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SolanaClient {
    rpc: Arc<RpcClient>,
}

/// Builder for configuring SolanaClient.
#[derive(Debug, Clone, Default)]
pub struct SolanaClientBuilder {
    rpc_url: Option<String>,
}

impl SolanaClientBuilder {
    /// Set the JSON-RPC endpoint.
    pub fn rpc_url(mut self, url: String) -> Self {
        self.rpc_url = Some(url);
        self
    }

    /// Build the SolanaClient. Reads use `confirmed` commitment.
    pub fn build(self) -> SolanaClient {
        let url = self.rpc_url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        let commitment = CommitmentConfig::confirmed();

        info!("Connecting to Solana RPC: {}", url);

        SolanaClient {
            rpc: Arc::new(RpcClient::new_with_commitment(url, commitment)),
        }
    }
}

impl SolanaClient {
    /// Create a new Solana RPC client using a builder for configuration.
    pub fn builder() -> SolanaClientBuilder {
        SolanaClientBuilder::default()
    }

    /// Create a client for the given endpoint with default commitment.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::builder().rpc_url(rpc_url.into()).build()
    }

    /// Native balance in lamports.
    pub async fn get_balance(&self, pubkey: &Pubkey) -> anyhow::Result<u64> {
        self.rpc
            .get_balance(pubkey)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get balance for {}: {}", pubkey, e))
    }

    /// Retrieve account data, `None` when the account does not exist.
    pub async fn get_account_optional(&self, pubkey: &Pubkey) -> anyhow::Result<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(pubkey, self.rpc.commitment())
            .await
            .map_err(|e| anyhow::anyhow!("RPC error: {}", e))?;

        Ok(response.value)
    }

    /// Token accounts of `owner` holding `mint`, as `jsonParsed` account data.
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list token accounts of {}: {}", owner, e))?;

        accounts
            .into_iter()
            .map(|keyed| {
                serde_json::to_value(&keyed.account.data)
                    .map_err(|e| anyhow::anyhow!("Unreadable token account {}: {}", keyed.pubkey, e))
            })
            .collect()
    }

    /// Check if the RPC endpoint is healthy and responsive.
    pub async fn health_check(&self) -> anyhow::Result<()> {
        let _ = self
            .rpc
            .get_version()
            .await
            .map_err(|e| anyhow::anyhow!("Health check failed: {}", e))?;
        Ok(())
    }
}
