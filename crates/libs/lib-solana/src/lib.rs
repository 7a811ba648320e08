//! # Solana Library
//!
//! Solana-side collaborators of the swap engine: the router client, the
//! transaction signer and the on-chain balance reader.

pub mod balance;
pub mod client;
pub mod router;
pub mod signer;

// Re-export commonly used types from root for convenience
pub use balance::{BalanceReader, RpcBalanceReader};
pub use client::SolanaClient;
pub use router::{RouteParams, RouterClient, SwapRouter, TxStatus};
pub use signer::sign;
