//! # Transaction Signer
//!
//! Attaches the wallet's signature to a router-built transaction.
//!
//! The router returns a base64 bincode `VersionedTransaction` whose signature slots
//! are placeholders. Signing fills exactly the slot that belongs to the wallet and
//! leaves every other slot untouched. Ed25519 is deterministic, so signing the same
//! route twice yields byte-identical output.

use lib_core::error::{AppError, Result};
use lib_core::model::{Route, SignedTransaction};
use lib_utils::b64::{b64_decode, b64_encode};
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;
use tracing::debug;

/// Sign a route with the given keypair.
///
/// Fails with `AppError::Sign` when the blob does not decode or the keypair is not
/// one of the message's required signers.
pub fn sign(route: &Route, keypair: &Keypair) -> Result<SignedTransaction> {
    let bytes = b64_decode(&route.swap_transaction)
        .map_err(|e| AppError::Sign(format!("route transaction is not valid base64: {}", e)))?;

    let mut tx: VersionedTransaction = bincode::deserialize(&bytes)
        .map_err(|e| AppError::Sign(format!("route transaction failed to decode: {}", e)))?;

    let required = tx.message.header().num_required_signatures as usize;
    let signer = keypair.pubkey();
    let slot = tx
        .message
        .static_account_keys()
        .iter()
        .take(required)
        .position(|key| *key == signer)
        .ok_or_else(|| AppError::Sign(format!("{} is not a required signer of the route", signer)))?;

    tx.signatures.resize(required, Signature::default());

    let message = tx.message.serialize();
    let signature = keypair.sign_message(&message);
    tx.signatures[slot] = signature;

    let encoded = bincode::serialize(&tx)
        .map_err(|e| AppError::Sign(format!("signed transaction failed to encode: {}", e)))?;

    debug!("Route signed by {} at slot {}", signer, slot);

    Ok(SignedTransaction::new(
        b64_encode(encoded),
        signature.to_string(),
        route.last_valid_block_height,
    ))
}
