//! Error types for debcontrol core.

use thiserror::Error;

/// Errors that can occur while scanning paragraph text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line matched none of the line classes (blank, comment,
    /// continuation, `key: value`).
    #[error("line {line_number}: {line:?} is not 'key: value'")]
    Syntax { line_number: usize, line: String },

    /// Reading the underlying stream failed (includes invalid UTF-8).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// The offending raw line, if this is a syntax error.
    pub fn line(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { line, .. } => Some(line),
            ParseError::Io(_) => None,
        }
    }
}

/// A serialized paragraph whose key order and values disagree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParagraphError {
    #[error("key {0:?} is listed in order but has no value")]
    MissingValue(String),

    #[error("key {0:?} has a value but is missing from order")]
    UnorderedKey(String),
}

/// Errors that can occur while rendering a record into paragraph text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarshalError {
    #[error("field {field}: cannot render value of type {type_name}")]
    UnsupportedType { field: String, type_name: String },

    /// Raised by a custom [`MarshalControl`](crate::MarshalControl) implementation.
    #[error("custom render failed: {0}")]
    Custom(String),
}

impl MarshalError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
