//! # Services Layer
//!
//! Business logic of a swap run, kept apart from the HTTP handlers:
//!
//! ```text
//! Handlers (HTTP) → SwapService → Router / Signer / Balance Reader
//! ```
//!
//! ## Module Organization
//!
//! - [`swap`] - Orchestrates one run from validation to balance verification
//! - [`settlement`] - Submission and the status polling state machine
//! - [`balance`] - Tolerant balance snapshots and their diff
//!
//! ## Error Handling
//!
//! Fallible steps return `Result<T, AppError>`. The orchestrator itself never fails:
//! it folds every error into a [`swap::SwapOutcome`] together with the run's log.
//!
//! ## Testing
//!
//! Collaborators are injected as trait objects, so runs are tested against scripted
//! mocks with a paused tokio clock:
//!
//! ```rust,ignore
//! #[tokio::test(start_paused = true)]
//! async fn test_swap() {
//!     let service = SwapService::new(mock_router, mock_reader, keypair, &Config::default());
//!     let outcome = service.execute(&request).await;
//!     assert!(outcome.is_success());
//! }
//! ```

pub mod balance;
pub mod settlement;
pub mod swap;

// Re-export services for convenience
pub use settlement::PollPolicy;
pub use swap::{SwapOutcome, SwapResult, SwapService};
