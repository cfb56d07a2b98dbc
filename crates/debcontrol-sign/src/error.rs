//! Error types for the signature envelope.

use thiserror::Error;

use crate::crypto::KeyId;

/// The clear-signed envelope could not be decoded.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Structural problem in the armor (missing markers, bad headers, bad escaping).
    #[error("malformed clear-signed message: {0}")]
    Malformed(String),

    /// The armor checksum line does not match the signature body.
    #[error("armor checksum mismatch: expected {expected:06x}, got {actual:06x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The signature body is not valid base64.
    #[error("invalid base64 in signature block: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl EnvelopeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// A signature was present but could not be verified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// The issuing key is not in the keyring.
    #[error("signature issued by unknown key {0}")]
    UnknownSigner(KeyId),

    /// The issuing key is known but the signature does not match the text.
    #[error("bad signature from key {0}")]
    BadSignature(KeyId),

    /// The signature body does not have the expected layout.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Errors that can occur while opening a possibly signed stream.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, SignError>;
