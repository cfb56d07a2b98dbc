//! Error types for the decode/encode pipeline.

use debcontrol_core::{MarshalError, ParseError};
use debcontrol_sign::{EnvelopeError, SignError, VerificationError};
use thiserror::Error;

/// Errors that can occur while decoding or encoding paragraph documents.
#[derive(Debug, Error)]
pub enum Error {
    /// The clear-sign envelope could not be decoded.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The envelope decoded but its signature did not verify.
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    /// The cleartext is not well-formed paragraph text.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A record field could not be rendered.
    #[error("marshal error: {0}")]
    Marshal(#[from] MarshalError),

    /// A signature was required but the input was not clear-signed.
    #[error("input is not clear-signed")]
    UnsignedData,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SignError> for Error {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Envelope(e) => Error::Envelope(e),
            SignError::Verification(e) => Error::Verification(e),
            SignError::Io(e) => Error::Io(e),
        }
    }
}

impl Error {
    /// The offending line, if this is a syntax error.
    pub fn syntax_line(&self) -> Option<&str> {
        match self {
            Error::Parse(e) => e.line(),
            _ => None,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
