//! # Base64 Encoding/Decoding
//!
//! Standard (padded) base64, the transport encoding used for serialized transactions.

use base64::{Engine as _, engine::general_purpose};

/// Encode bytes to a standard base64 string.
pub fn b64_encode(content: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(content)
}

/// Decode a standard base64 string to bytes.
pub fn b64_decode(b64: &str) -> Result<Vec<u8>, Error> {
    general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| Error::FailToB64Decode(e.to_string()))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToB64Decode(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::FailToB64Decode(reason) => write!(fmt, "invalid base64: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
