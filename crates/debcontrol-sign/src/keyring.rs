//! Keyrings: the trusted verification service behind the envelope.
//!
//! [`Keyring`] is the seam. The envelope hands it the signed bytes and
//! the detached signature and gets back the identity of the signer.
//! [`Ed25519Keyring`] is the bundled implementation.

use serde::{Deserialize, Serialize};

use crate::armor::DetachedSignature;
use crate::crypto::{Fingerprint, KeyId, PublicKey, KEY_ID_LEN, SIGNATURE_LEN};
use crate::error::VerificationError;

/// Identity of the key that produced a valid signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerIdentity {
    fingerprint: Fingerprint,
    user_id: Option<String>,
}

impl SignerIdentity {
    pub fn new(fingerprint: Fingerprint, user_id: Option<String>) -> Self {
        Self {
            fingerprint,
            user_id,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint.key_id()
    }

    /// Human-readable owner of the key, if the keyring knows one.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// A set of trusted keys able to check detached signatures.
///
/// Keyrings are read-only trust data and may be shared across threads.
pub trait Keyring: Send + Sync {
    /// Verify `signature` over `signed` and return who made it.
    fn check_detached_signature(
        &self,
        signed: &[u8],
        signature: &DetachedSignature,
    ) -> Result<SignerIdentity, VerificationError>;
}

impl<K: Keyring + ?Sized> Keyring for &K {
    fn check_detached_signature(
        &self,
        signed: &[u8],
        signature: &DetachedSignature,
    ) -> Result<SignerIdentity, VerificationError> {
        (**self).check_detached_signature(signed, signature)
    }
}

#[derive(Debug, Clone)]
struct TrustedKey {
    public_key: PublicKey,
    user_id: Option<String>,
}

/// Keyring of trusted Ed25519 public keys.
///
/// Signature bodies are an 8-byte issuer key id followed by a 64-byte
/// Ed25519 signature.
#[derive(Debug, Clone, Default)]
pub struct Ed25519Keyring {
    keys: Vec<TrustedKey>,
}

impl Ed25519Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust a key.
    pub fn add(&mut self, public_key: PublicKey) {
        self.insert(public_key, None);
    }

    /// Trust a key and record the user id reported for its signatures.
    pub fn add_with_user_id(&mut self, public_key: PublicKey, user_id: impl Into<String>) {
        self.insert(public_key, Some(user_id.into()));
    }

    /// Builder-style [`add`](Self::add).
    pub fn with_key(mut self, public_key: PublicKey) -> Self {
        self.add(public_key);
        self
    }

    fn insert(&mut self, public_key: PublicKey, user_id: Option<String>) {
        self.keys.retain(|k| k.public_key != public_key);
        self.keys.push(TrustedKey {
            public_key,
            user_id,
        });
    }

    /// Look up a trusted key by key id.
    pub fn get(&self, key_id: &KeyId) -> Option<&PublicKey> {
        self.find(key_id).map(|k| &k.public_key)
    }

    fn find(&self, key_id: &KeyId) -> Option<&TrustedKey> {
        self.keys.iter().find(|k| k.public_key.key_id() == *key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<PublicKey> for Ed25519Keyring {
    fn from_iter<I: IntoIterator<Item = PublicKey>>(iter: I) -> Self {
        let mut keyring = Self::new();
        for key in iter {
            keyring.add(key);
        }
        keyring
    }
}

fn split_signature_body(
    body: &[u8],
) -> Result<(KeyId, [u8; SIGNATURE_LEN]), VerificationError> {
    if body.len() != KEY_ID_LEN + SIGNATURE_LEN {
        return Err(VerificationError::MalformedSignature(format!(
            "expected {} signature bytes, got {}",
            KEY_ID_LEN + SIGNATURE_LEN,
            body.len()
        )));
    }
    let mut key_id = [0u8; KEY_ID_LEN];
    key_id.copy_from_slice(&body[..KEY_ID_LEN]);
    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(&body[KEY_ID_LEN..]);
    Ok((KeyId(key_id), signature))
}

impl Keyring for Ed25519Keyring {
    fn check_detached_signature(
        &self,
        signed: &[u8],
        signature: &DetachedSignature,
    ) -> Result<SignerIdentity, VerificationError> {
        let (key_id, sig) = split_signature_body(&signature.body)?;
        let key = self
            .find(&key_id)
            .ok_or(VerificationError::UnknownSigner(key_id))?;

        key.public_key.verify(signed, &sig)?;

        Ok(SignerIdentity::new(
            key.public_key.fingerprint(),
            key.user_id.clone(),
        ))
    }
}
