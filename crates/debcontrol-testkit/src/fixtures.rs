//! Test fixtures and helpers.
//!
//! Deterministic signing keys, matching keyrings and sample documents.

use debcontrol_sign::{ClearSigner, Ed25519Keyring, PublicKey, SigningKeypair};

/// A small two-paragraph document with a multi-line description.
pub const SAMPLE_DOCUMENT: &str = "\
Source: hello
Maintainer: Alice <alice@example.org>
Build-Depends: debhelper-compat (= 13), gettext

Package: hello
Architecture: any
Description: example package based on GNU hello
 The GNU hello program produces a familiar, friendly greeting.
 .
 It is an example of the GNU coding standards.
";

/// A test fixture with a signing identity.
pub struct TestFixture {
    pub keypair: SigningKeypair,
    pub user_id: String,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(SigningKeypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(SigningKeypair::from_seed(&seed))
    }

    fn from_keypair(keypair: SigningKeypair) -> Self {
        let user_id = format!("Test Signer {}", &keypair.public_key().key_id().to_hex()[..8]);
        Self { keypair, user_id }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// A keyring trusting only this fixture's key.
    pub fn keyring(&self) -> Ed25519Keyring {
        let mut keyring = Ed25519Keyring::new();
        keyring.add_with_user_id(self.public_key(), self.user_id.clone());
        keyring
    }

    pub fn signer(&self) -> ClearSigner {
        ClearSigner::new(self.keypair.clone())
    }

    /// Clear-sign `text` with this fixture's key.
    pub fn sign(&self, text: &str) -> String {
        self.signer().sign_text(text)
    }

    /// The sample document, clear-signed.
    pub fn signed_sample(&self) -> String {
        self.sign(SAMPLE_DOCUMENT)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
            seed[31] = 0xd5;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// A keyring trusting every fixture in `fixtures`.
pub fn shared_keyring(fixtures: &[TestFixture]) -> Ed25519Keyring {
    let mut keyring = Ed25519Keyring::new();
    for fixture in fixtures {
        keyring.add_with_user_id(fixture.public_key(), fixture.user_id.clone());
    }
    keyring
}

#[cfg(test)]
mod tests {
    use super::*;
    use debcontrol::{decode, Verification};
    use std::io::Cursor;

    #[test]
    fn test_fixture_signs_verifiable_text() {
        let fixture = TestFixture::with_seed([3; 32]);
        let keyring = fixture.keyring();

        let decoded = decode(
            Cursor::new(fixture.signed_sample()),
            Verification::Verify(&keyring),
        )
        .unwrap();

        assert_eq!(decoded.paragraphs.len(), 2);
        let signer = decoded.signer.unwrap();
        assert_eq!(signer.user_id(), Some(fixture.user_id.as_str()));
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_fixtures(3);

        // Each party has unique keys
        let pks: Vec<_> = parties.iter().map(|p| p.public_key()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
    }

    #[test]
    fn test_shared_keyring_accepts_every_party() {
        let parties = multi_party_fixtures(3);
        let keyring = shared_keyring(&parties);

        for party in &parties {
            let decoded = decode(
                Cursor::new(party.sign("Package: shared\n")),
                Verification::Verify(&keyring),
            )
            .unwrap();
            assert_eq!(
                decoded.signer.map(|s| s.key_id()),
                Some(party.public_key().key_id())
            );
        }
    }

    #[test]
    fn test_multi_party_seeds_do_not_wrap() {
        let parties = multi_party_fixtures(258);
        assert_ne!(parties[0].public_key(), parties[256].public_key());
        assert_ne!(parties[1].public_key(), parties[257].public_key());
    }
}
