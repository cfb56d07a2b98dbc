//! # debcontrol
//!
//! Read and write RFC2822-like "paragraph" documents, the format of
//! Debian control files, with optional clear-signed envelopes.
//!
//! ## Overview
//!
//! - **Decode**: detect and verify a clear-sign envelope, then scan the
//!   cleartext into [`Paragraph`]s
//! - **Encode**: render typed records through an explicit [`Schema`]
//!   into paragraph text, optionally signed
//!
//! ## Key Concepts
//!
//! - **Paragraph**: ordered `key: value` fields; blank lines separate paragraphs.
//! - **Continuation**: a line starting with a space extends the previous value.
//! - **Envelope**: ASCII-armored clear-sign wrapper, verified against a [`Keyring`].
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Cursor;
//! use debcontrol::{decode, Verification};
//!
//! let text = "Package: hello\nDescription: greeter\n says hi\n\nPackage: world\n";
//! let decoded = decode(Cursor::new(text), Verification::Unverified).unwrap();
//!
//! assert_eq!(decoded.paragraphs.len(), 2);
//! assert_eq!(decoded.paragraphs[0].get("Description"), Some("greeter\nsays hi"));
//! ```
//!
//! ## Re-exports
//!
//! - `debcontrol::core` - Paragraphs, scanner, escaping and the record mapper
//! - `debcontrol::sign` - Armor, keyrings and the signature envelope

pub mod error;
pub mod pipeline;

// Re-export component crates
pub use debcontrol_core as core;
pub use debcontrol_sign as sign;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use pipeline::{
    decode, encode, encode_all, encode_signed, DecodeStream, Decoded, Decoder, DecoderConfig,
};

// Re-export commonly used component types
pub use debcontrol_core::{
    ControlRecord, FieldDescriptor, FieldValue, MarshalControl, Paragraph, Schema, ToFieldValue,
};
pub use debcontrol_sign::{
    ClearSigner, Ed25519Keyring, Keyring, SignerIdentity, SigningKeypair, Verification,
};
