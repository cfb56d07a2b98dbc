//! Signature envelope detection and opening.
//!
//! Input that begins with the ASCII-armor prefix `-----BEGIN PGP ` is
//! read in full, decoded as a clear-signed message and (if requested)
//! verified before any of its text is handed on. Any other input passes
//! through untouched.

use std::io::{self, BufRead, Chain, Cursor, Read};

use crate::armor::{decode_clearsigned, ARMOR_PREFIX};
use crate::error::Result;
use crate::keyring::{Keyring, SignerIdentity};

/// Whether signatures are checked.
///
/// `Unverified` is an explicit opt-out: signed input is unwrapped but its
/// signature is not checked.
#[derive(Clone, Copy)]
pub enum Verification<'k> {
    Verify(&'k dyn Keyring),
    Unverified,
}

impl<'k> Verification<'k> {
    pub fn verify(keyring: &'k dyn Keyring) -> Self {
        Self::Verify(keyring)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Verify(_))
    }
}

impl std::fmt::Debug for Verification<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verify(_) => f.write_str("Verify(..)"),
            Self::Unverified => f.write_str("Unverified"),
        }
    }
}

/// The text inside the envelope, readable as a stream.
#[derive(Debug)]
pub enum Cleartext<R> {
    /// Input was not armored; the peeked prefix is chained back in front.
    Unsigned(Chain<Cursor<Vec<u8>>, R>),
    /// Decoded cleartext of a clear-signed message.
    Signed(Cursor<Vec<u8>>),
}

impl<R: BufRead> Read for Cleartext<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Cleartext::Unsigned(inner) => inner.read(buf),
            Cleartext::Signed(inner) => inner.read(buf),
        }
    }
}

impl<R: BufRead> BufRead for Cleartext<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Cleartext::Unsigned(inner) => inner.fill_buf(),
            Cleartext::Signed(inner) => inner.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Cleartext::Unsigned(inner) => inner.consume(amt),
            Cleartext::Signed(inner) => inner.consume(amt),
        }
    }
}

/// Result of opening a stream.
#[derive(Debug)]
pub struct Opened<R> {
    pub cleartext: Cleartext<R>,
    /// Present only when a keyring was given and verification succeeded.
    pub signer: Option<SignerIdentity>,
    /// Whether the input was clear-signed at all.
    pub signed: bool,
}

/// Detect, decode and optionally verify a clear-sign envelope.
pub fn open<R: BufRead>(mut reader: R, verification: &Verification<'_>) -> Result<Opened<R>> {
    let mut data = Vec::with_capacity(ARMOR_PREFIX.len());
    (&mut reader)
        .take(ARMOR_PREFIX.len() as u64)
        .read_to_end(&mut data)?;

    if data != ARMOR_PREFIX {
        tracing::debug!("input is not armored, passing through");
        return Ok(Opened {
            cleartext: Cleartext::Unsigned(Cursor::new(data).chain(reader)),
            signer: None,
            signed: false,
        });
    }

    reader.read_to_end(&mut data)?;
    let message = decode_clearsigned(&data)?;
    tracing::debug!(
        hash = ?message.hash_algorithms,
        bytes = message.plaintext.len(),
        "decoded clear-signed envelope"
    );

    let signer = match verification {
        Verification::Verify(keyring) => {
            match keyring.check_detached_signature(&message.signed_bytes, &message.signature) {
                Ok(signer) => {
                    tracing::debug!(fingerprint = %signer.fingerprint(), "signature verified");
                    Some(signer)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "signature verification failed");
                    return Err(e.into());
                }
            }
        }
        Verification::Unverified => {
            tracing::debug!("signature verification disabled by caller");
            None
        }
    };

    Ok(Opened {
        cleartext: Cleartext::Signed(Cursor::new(message.plaintext.into_bytes())),
        signer,
        signed: true,
    })
}
