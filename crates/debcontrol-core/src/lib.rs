//! # debcontrol core
//!
//! Pure primitives for the RFC2822-like paragraph format used by Debian
//! control files: paragraphs, the line scanner, value escaping, and the
//! schema-driven record renderer.
//!
//! This crate does no cryptography and no file handling; it reads from
//! any [`std::io::BufRead`] and renders into `String`s.
//!
//! ## Key Types
//!
//! - [`Paragraph`] - One block of `key: value` fields
//! - [`ParagraphReader`] - Incremental scanner over a line stream
//! - [`Schema`] / [`FieldDescriptor`] - Explicit field layout of a record
//! - [`ControlRecord`] - A record type that renders as one paragraph
//!
//! ## Format
//!
//! ```text
//! Package: hello
//! # comments are ignored
//! Description: short summary
//!  continuation line
//!  .
//!  after an empty line
//!
//! Package: next-paragraph
//! ```

pub mod error;
pub mod escape;
pub mod mapper;
pub mod paragraph;
pub mod scanner;

pub use error::{MarshalError, ParagraphError, ParseError};
pub use escape::{escape_value, unescape_continuation};
pub use mapper::{
    render, render_all, render_with, Accessor, ControlRecord, FieldDescriptor, FieldValue,
    MarshalControl, Schema, ToFieldValue, DEFAULT_DELIMITER,
};
pub use paragraph::Paragraph;
pub use scanner::{parse_paragraphs, parse_str, ParagraphReader};
