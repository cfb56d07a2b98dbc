//! # debcontrol sign
//!
//! Clear-sign envelopes around paragraph text.
//!
//! ## Overview
//!
//! A paragraph document may be wrapped in an ASCII-armored clear-sign
//! envelope: the text stays readable, and a detached signature block
//! follows it. This crate:
//!
//! - detects the envelope by its `-----BEGIN PGP ` prefix
//! - decodes the armor into cleartext and a [`DetachedSignature`]
//! - verifies the signature against a caller-supplied [`Keyring`]
//!
//! ## Trust Model
//!
//! Verification is explicit. [`Verification::Verify`] checks every
//! signed input against the keyring and fails on an unknown signer or a
//! bad signature. [`Verification::Unverified`] unwraps signed input
//! without checking it.
//!
//! The bundled [`Ed25519Keyring`] trusts Ed25519 keys identified by their
//! Blake3 fingerprint; [`ClearSigner`] produces matching envelopes.
//!
//! ## Usage
//!
//! ```rust
//! use std::io::{Cursor, Read};
//! use debcontrol_sign::{open, ClearSigner, Ed25519Keyring, SigningKeypair, Verification};
//!
//! let keypair = SigningKeypair::from_seed(&[1; 32]);
//! let keyring = Ed25519Keyring::new().with_key(keypair.public_key());
//! let armored = ClearSigner::new(keypair).sign_text("Package: hello\n");
//!
//! let mut opened = open(Cursor::new(armored), &Verification::Verify(&keyring)).unwrap();
//! assert!(opened.signer.is_some());
//!
//! let mut text = String::new();
//! opened.cleartext.read_to_string(&mut text).unwrap();
//! assert_eq!(text, "Package: hello\n");
//! ```

pub mod armor;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod keyring;

pub use armor::{decode_clearsigned, encode_clearsigned, ClearSigned, DetachedSignature, ARMOR_PREFIX};
pub use crypto::{ClearSigner, Fingerprint, KeyId, PublicKey, SigningKeypair};
pub use envelope::{open, Cleartext, Opened, Verification};
pub use error::{EnvelopeError, Result, SignError, VerificationError};
pub use keyring::{Ed25519Keyring, Keyring, SignerIdentity};
