//! Golden test vectors for the paragraph scanner.
//!
//! Each vector pairs raw input text with the paragraphs it must decode
//! to, or with the line a syntax error must name. Vectors can be exported
//! as JSON for other implementations of the format.

use std::io::Cursor;

use debcontrol::{decode, Error, Paragraph, Verification};
use serde::Serialize;

/// Outcome a vector expects.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expected {
    /// Ordered `(key, value)` fields of each paragraph.
    Paragraphs(Vec<Vec<(&'static str, &'static str)>>),
    /// A syntax error naming this line.
    SyntaxError(&'static str),
}

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub input: &'static str,
    pub expected: Expected,
}

impl GoldenVector {
    /// The expected paragraphs, if this vector expects success.
    pub fn expected_paragraphs(&self) -> Option<Vec<Paragraph>> {
        match &self.expected {
            Expected::Paragraphs(paragraphs) => Some(
                paragraphs
                    .iter()
                    .map(|fields| Paragraph::from_fields(fields.iter().copied()))
                    .collect(),
            ),
            Expected::SyntaxError(_) => None,
        }
    }
}

fn ok(
    name: &'static str,
    input: &'static str,
    paragraphs: Vec<Vec<(&'static str, &'static str)>>,
) -> GoldenVector {
    GoldenVector {
        name,
        input,
        expected: Expected::Paragraphs(paragraphs),
    }
}

fn syntax_error(name: &'static str, input: &'static str, line: &'static str) -> GoldenVector {
    GoldenVector {
        name,
        input,
        expected: Expected::SyntaxError(line),
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        ok("empty input", "", vec![]),
        ok("blank lines only", "\n\n\r\n", vec![]),
        ok(
            "single field without trailing newline",
            "Key: a",
            vec![vec![("Key", "a")]],
        ),
        ok(
            "single field with trailing newline",
            "Key: a\n",
            vec![vec![("Key", "a")]],
        ),
        ok(
            "two blocks",
            "A: 1\nB: 2\n\nC: 3\n\n",
            vec![vec![("A", "1"), ("B", "2")], vec![("C", "3")]],
        ),
        ok(
            "runs of blank lines",
            "\n\nA: 1\n\n\n\nB: 2\n",
            vec![vec![("A", "1")], vec![("B", "2")]],
        ),
        ok(
            "crlf line endings",
            "A: 1\r\nB: 2\r\n\r\nC: 3\r\n",
            vec![vec![("A", "1"), ("B", "2")], vec![("C", "3")]],
        ),
        ok(
            "continuation",
            "Key: first\n value\n\n",
            vec![vec![("Key", "first\nvalue")]],
        ),
        ok(
            "dot continuation is an empty line",
            "Description: summary\n first\n .\n second\n",
            vec![vec![("Description", "summary\nfirst\n\nsecond")]],
        ),
        ok(
            "comment inside paragraph",
            "A: 1\n# note\nB: 2\n",
            vec![vec![("A", "1"), ("B", "2")]],
        ),
        ok(
            "indented comment",
            "A: 1\n   # note\n",
            vec![vec![("A", "1")]],
        ),
        ok(
            "duplicate key keeps last value",
            "Key: a\nKey: b\n\n",
            vec![vec![("Key", "a"), ("Key", "b")]],
        ),
        ok(
            "value split at first colon",
            "Url: http://example.org:8080/\n",
            vec![vec![("Url", "http://example.org:8080/")]],
        ),
        ok(
            "surrounding whitespace trimmed",
            "Key\t:   spaced value \t\n",
            vec![vec![("Key", "spaced value")]],
        ),
        ok("empty value", "Key:\n", vec![vec![("Key", "")]]),
        syntax_error("line without colon", "BadLine\n\n", "BadLine"),
        syntax_error(
            "bad line after a valid paragraph",
            "A: 1\n\nnot a field\n",
            "not a field",
        ),
        syntax_error(
            "continuation without a field",
            " orphan\nA: 1\n",
            " orphan",
        ),
    ]
}

/// Verify all golden vectors against the decoder.
///
/// Returns `(name, passed)` for every vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| (v.name.to_string(), check_vector(v)))
        .collect()
}

fn check_vector(vector: &GoldenVector) -> bool {
    let result = decode(Cursor::new(vector.input), Verification::Unverified);
    match (&vector.expected, result) {
        (Expected::Paragraphs(_), Ok(decoded)) => {
            Some(decoded.paragraphs) == vector.expected_paragraphs()
        }
        (Expected::SyntaxError(line), Err(err @ Error::Parse(_))) => {
            err.syntax_line() == Some(*line)
        }
        _ => false,
    }
}

/// All vectors as pretty-printed JSON.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }

    #[test]
    fn test_vectors_export_as_json() {
        let json = vectors_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();

        assert_eq!(array.len(), all_vectors().len());
        assert_eq!(array[0]["name"], "empty input");
        assert_eq!(array[0]["expected"]["kind"], "paragraphs");
    }
}
