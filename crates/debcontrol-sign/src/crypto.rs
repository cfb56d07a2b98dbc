//! Key material for clear-signed paragraphs.
//!
//! Wraps Ed25519 signing and Blake3 fingerprints with strong types.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::armor::{canonical_text, encode_clearsigned, signable_lines, DetachedSignature};
use crate::error::VerificationError;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of a key id (low 64 bits of the fingerprint).
pub const KEY_ID_LEN: usize = 8;

/// Hash name advertised in the clear-sign `Hash:` header.
pub const HASH_NAME: &str = "SHA512";

/// A 32-byte Blake3 fingerprint of a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The key id: the last 8 bytes of the fingerprint.
    pub fn key_id(&self) -> KeyId {
        let mut id = [0u8; KEY_ID_LEN];
        id.copy_from_slice(&self.0[32 - KEY_ID_LEN..]);
        KeyId(id)
    }

    /// Convert to upper-case hex.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Short identifier of a signing key, embedded in every signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub [u8; KEY_ID_LEN]);

impl KeyId {
    pub const fn as_bytes(&self) -> &[u8; KEY_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.to_hex())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Blake3 fingerprint of the key bytes.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(*blake3::hash(&self.0).as_bytes())
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint().key_id()
    }

    /// Verify a signature over a message.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8; SIGNATURE_LEN],
    ) -> Result<(), VerificationError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| VerificationError::MalformedSignature("invalid public key".into()))?;

        verifying_key
            .verify(message, &Signature::from_bytes(signature))
            .map_err(|_| VerificationError::BadSignature(self.key_id()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A keypair for signing paragraph text.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct SigningKeypair {
    signing_key: SigningKey,
}

impl SigningKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKeypair({:?})", self.public_key())
    }
}

/// Produces clear-signed text that [`Ed25519Keyring`](crate::Ed25519Keyring) can verify.
///
/// The signature body is the signer's key id followed by the Ed25519
/// signature over the canonical (CRLF-joined) text.
#[derive(Debug, Clone)]
pub struct ClearSigner {
    keypair: SigningKeypair,
}

impl ClearSigner {
    pub fn new(keypair: SigningKeypair) -> Self {
        Self { keypair }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Wrap `text` in a clear-sign envelope.
    pub fn sign_text(&self, text: &str) -> String {
        let lines = signable_lines(text);
        let signature = self.keypair.sign(&canonical_text(&lines));

        let mut body = Vec::with_capacity(KEY_ID_LEN + SIGNATURE_LEN);
        body.extend_from_slice(self.public_key().key_id().as_bytes());
        body.extend_from_slice(&signature);

        let detached = DetachedSignature {
            headers: Vec::new(),
            body,
        };
        encode_clearsigned(&lines, HASH_NAME, &detached)
    }
}
