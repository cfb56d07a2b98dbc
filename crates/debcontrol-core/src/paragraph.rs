//! Paragraph: one block of `key: value` lines.
//!
//! A paragraph keeps two views of its fields: a map from key to value
//! (last write wins) and the order in which keys were encountered. The
//! order keeps duplicates, so a key set twice appears twice.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::ParagraphError;
use crate::escape::escape_value;

/// A block of RFC2822-like key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParagraph")]
pub struct Paragraph {
    values: HashMap<String, String>,
    order: Vec<String>,
}

/// Unchecked serialized form of a [`Paragraph`].
#[derive(Deserialize)]
struct RawParagraph {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl TryFrom<RawParagraph> for Paragraph {
    type Error = ParagraphError;

    fn try_from(raw: RawParagraph) -> Result<Self, Self::Error> {
        if let Some(key) = raw.order.iter().find(|k| !raw.values.contains_key(*k)) {
            return Err(ParagraphError::MissingValue(key.clone()));
        }
        let ordered: HashSet<&str> = raw.order.iter().map(String::as_str).collect();
        if let Some(key) = raw.values.keys().find(|k| !ordered.contains(k.as_str())) {
            return Err(ParagraphError::UnorderedKey(key.clone()));
        }
        Ok(Self {
            values: raw.values,
            order: raw.order,
        })
    }
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a paragraph from fields, applying the same rules as the scanner.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut paragraph = Self::new();
        for (key, value) in fields {
            paragraph.set(key.into(), value.into());
        }
        paragraph
    }

    /// Set a field, overwriting any previous value and recording the key in order.
    pub(crate) fn set(&mut self, key: String, value: String) {
        self.order.push(key.clone());
        self.values.insert(key, value);
    }

    /// Append a continuation line to an existing field.
    ///
    /// Returns `false` if the key has no value yet.
    pub(crate) fn append_line(&mut self, key: &str, line: &str) -> bool {
        match self.values.get_mut(key) {
            Some(value) => {
                value.push('\n');
                value.push_str(line);
                true
            }
            None => false,
        }
    }

    /// Get the current value of a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Check whether a field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The key/value map.
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Keys in the order they were encountered, duplicates included.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::with_capacity(self.values.len());
        self.order
            .iter()
            .map(String::as_str)
            .filter(move |key| seen.insert(*key))
    }

    /// Distinct fields in first-seen order with their current values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys()
            .filter_map(move |key| self.values.get(key).map(|v| (key, v.as_str())))
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Renders each distinct field once, in first-seen order.
///
/// Values are escaped so the output parses back to the same paragraph.
impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}: {}", key, escape_value(value))?;
        }
        Ok(())
    }
}
