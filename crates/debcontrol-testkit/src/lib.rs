//! # debcontrol testkit
//!
//! Testing utilities for debcontrol.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with the paragraphs they must decode to
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic signing keys, keyrings and sample documents
//!
//! ## Golden Vectors
//!
//! ```rust
//! use debcontrol_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed) in verify_all_vectors() {
//!     assert!(passed, "vector failed: {name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use debcontrol_testkit::generators::{field_key, field_value};
//!
//! proptest! {
//!     #[test]
//!     fn value_survives_escape(key in field_key(), value in field_value()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use debcontrol_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([7; 32]);
//! let armored = fixture.signed_sample();
//! assert!(armored.starts_with("-----BEGIN PGP SIGNED MESSAGE-----"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, shared_keyring, TestFixture, SAMPLE_DOCUMENT};
pub use generators::RecordParams;
pub use vectors::{all_vectors, verify_all_vectors, Expected, GoldenVector};
