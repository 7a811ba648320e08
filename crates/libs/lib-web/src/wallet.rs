//! # Signing Wallet
//!
//! Loads the server's signing keypair from a base58 secret. Both the 64-byte
//! keypair export (secret + public half) and the bare 32-byte secret are accepted.

use lib_core::error::{AppError, Result};
use solana_sdk::signature::{Keypair, Signer};

pub fn load_keypair_from_base58(base58_key: &str) -> Result<Keypair> {
    let bytes = bs58::decode(base58_key.trim())
        .into_vec()
        .map_err(|e| AppError::Config(format!("PRIVATE_KEY is not valid base58: {}", e)))?;

    match bytes.len() {
        64 => {
            let keypair = Keypair::try_from(bytes.as_slice())
                .map_err(|e| AppError::Config(format!("PRIVATE_KEY is not a valid keypair: {}", e)))?;
            Ok(keypair)
        }
        32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&bytes);
            Ok(Keypair::new_from_array(arr))
        }
        n => Err(AppError::Config(format!("PRIVATE_KEY must be 32 or 64 bytes, got {}", n))),
    }
}

/// Public address of a keypair, for logs.
pub fn address_of(keypair: &Keypair) -> String {
    keypair.pubkey().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_full_keypair_export() {
        let original = Keypair::new();
        let encoded = bs58::encode(original.to_bytes()).into_string();

        let loaded = load_keypair_from_base58(&encoded).unwrap();
        assert_eq!(loaded.pubkey(), original.pubkey());
    }

    #[test]
    fn test_loads_bare_secret() {
        let original = Keypair::new();
        let encoded = bs58::encode(original.secret_bytes()).into_string();

        let loaded = load_keypair_from_base58(&format!("  {}\n", encoded)).unwrap();
        assert_eq!(address_of(&loaded), address_of(&original));
    }

    #[test]
    fn test_rejects_wrong_length_and_alphabet() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(load_keypair_from_base58(&short), Err(AppError::Config(_))));
        assert!(matches!(load_keypair_from_base58("0OIl"), Err(AppError::Config(_))));
    }
}
