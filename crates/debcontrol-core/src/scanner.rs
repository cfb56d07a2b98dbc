//! Paragraph scanner: turns a line stream into [`Paragraph`]s.
//!
//! Each line is classified, in priority order, as:
//!
//! 1. blank (exactly a line terminator): ends the pending paragraph
//! 2. comment (`#` after leading whitespace): dropped
//! 3. continuation (leading space): appended to the last field set
//! 4. field (`key: value`, split at the first colon)
//! 5. anything else: syntax error
//!
//! A paragraph is only emitted once it has at least one field, so runs
//! of blank lines never produce empty paragraphs. End of stream closes
//! the pending paragraph without requiring a trailing blank line.

use std::io::{BufRead, Cursor};
use std::mem;

use crate::error::ParseError;
use crate::escape::unescape_continuation;
use crate::paragraph::Paragraph;

/// Characters trimmed around keys, values and continuation lines.
const NOOP: &[char] = &[' ', '\n', '\r', '\t'];

/// Classification of a single raw line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Continuation(&'a str),
    Field(&'a str, &'a str),
    Invalid,
}

fn classify(line: &str) -> Line<'_> {
    if line == "\n" || line == "\r\n" {
        return Line::Blank;
    }
    if line.trim_start_matches(NOOP).starts_with('#') {
        return Line::Comment;
    }
    if let Some(rest) = line.strip_prefix(' ') {
        return Line::Continuation(unescape_continuation(rest.trim_matches(NOOP)));
    }
    match line.split_once(':') {
        Some((key, value)) => Line::Field(key.trim_matches(NOOP), value.trim_matches(NOOP)),
        None => Line::Invalid,
    }
}

/// Scanner state between lines.
#[derive(Debug)]
enum State {
    /// No field pending.
    Awaiting,
    /// At least one field pending; `last_key` receives continuations.
    Accumulating {
        paragraph: Paragraph,
        last_key: String,
    },
    /// End of stream reached or a syntax error was returned.
    Done,
}

/// Incremental paragraph reader over any [`BufRead`].
///
/// Yields paragraphs one at a time, so callers can keep the paragraphs
/// completed before a syntax error. After an error or end of stream the
/// reader is fused and returns `None`.
#[derive(Debug)]
pub struct ParagraphReader<R> {
    reader: R,
    state: State,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> ParagraphReader<R> {
    /// Create a reader over the given stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: State::Awaiting,
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next paragraph, or `None` at end of stream.
    pub fn next_paragraph(&mut self) -> Result<Option<Paragraph>, ParseError> {
        if matches!(self.state, State::Done) {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let read = match self.reader.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    self.state = State::Done;
                    return Err(e.into());
                }
            };

            if read == 0 {
                return Ok(match mem::replace(&mut self.state, State::Done) {
                    State::Accumulating { paragraph, .. } => Some(paragraph),
                    _ => None,
                });
            }
            self.line_number += 1;

            match classify(&self.buf) {
                Line::Blank => {
                    if let State::Accumulating { paragraph, .. } =
                        mem::replace(&mut self.state, State::Awaiting)
                    {
                        return Ok(Some(paragraph));
                    }
                }
                Line::Comment => {}
                Line::Continuation(text) => match &mut self.state {
                    State::Accumulating {
                        paragraph,
                        last_key,
                    } => {
                        paragraph.append_line(last_key, text);
                    }
                    _ => return Err(self.syntax_error()),
                },
                Line::Field(key, value) => {
                    let (key, value) = (key.to_string(), value.to_string());
                    match &mut self.state {
                        State::Accumulating {
                            paragraph,
                            last_key,
                        } => {
                            paragraph.set(key.clone(), value);
                            *last_key = key;
                        }
                        _ => {
                            let mut paragraph = Paragraph::new();
                            paragraph.set(key.clone(), value);
                            self.state = State::Accumulating {
                                paragraph,
                                last_key: key,
                            };
                        }
                    }
                }
                Line::Invalid => return Err(self.syntax_error()),
            }
        }
    }

    fn syntax_error(&mut self) -> ParseError {
        self.state = State::Done;
        let line = self.buf.trim_end_matches(['\n', '\r']).to_string();
        ParseError::Syntax {
            line_number: self.line_number,
            line,
        }
    }

    /// Consume the reader and return the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for ParagraphReader<R> {
    type Item = Result<Paragraph, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_paragraph().transpose()
    }
}

/// Parse every paragraph in the stream.
///
/// All or nothing: on a syntax error the paragraphs parsed so far are
/// discarded. Use [`ParagraphReader`] to keep them.
pub fn parse_paragraphs<R: BufRead>(reader: R) -> Result<Vec<Paragraph>, ParseError> {
    let paragraphs = ParagraphReader::new(reader).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = paragraphs.len(), "parsed paragraphs");
    Ok(paragraphs)
}

/// Parse every paragraph in an in-memory string.
pub fn parse_str(text: &str) -> Result<Vec<Paragraph>, ParseError> {
    parse_paragraphs(Cursor::new(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_syntax_error(result: Result<Vec<Paragraph>, ParseError>, expected_line: &str) {
        match result {
            Err(ParseError::Syntax { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("\n"), Line::Blank);
        assert_eq!(classify("\r\n"), Line::Blank);
        assert_eq!(classify("# note\n"), Line::Comment);
        assert_eq!(classify("  \t# indented note\n"), Line::Comment);
        assert_eq!(classify(" more text \n"), Line::Continuation("more text"));
        assert_eq!(classify(" .\n"), Line::Continuation(""));
        assert_eq!(classify("Key: a: b\n"), Line::Field("Key", "a: b"));
        assert_eq!(classify("Key:\n"), Line::Field("Key", ""));
        assert_eq!(classify("BadLine\n"), Line::Invalid);
    }

    #[test]
    fn test_two_paragraphs() {
        let paragraphs = parse_str("Package: a\nVersion: 1\n\nPackage: b\n\n").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].get("Package"), Some("a"));
        assert_eq!(paragraphs[0].get("Version"), Some("1"));
        assert_eq!(paragraphs[0].order(), &["Package", "Version"]);
        assert_eq!(paragraphs[1].get("Package"), Some("b"));
    }

    #[test]
    fn test_continuation_line() {
        let paragraphs = parse_str("Key: first\n value\n\n").unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].get("Key"), Some("first\nvalue"));
        assert_eq!(paragraphs[0].order(), &["Key"]);
    }

    #[test]
    fn test_continuation_strips_exactly_one_space_then_trims() {
        let paragraphs = parse_str("Key: first\n   indented  \n .\n last\n").unwrap();
        assert_eq!(paragraphs[0].get("Key"), Some("first\nindented\n\nlast"));
    }

    #[test]
    fn test_continuation_applies_to_last_key() {
        let paragraphs = parse_str("A: 1\nB: 2\n more\n").unwrap();
        assert_eq!(paragraphs[0].get("A"), Some("1"));
        assert_eq!(paragraphs[0].get("B"), Some("2\nmore"));
    }

    #[test]
    fn test_comment_does_not_end_paragraph() {
        let paragraphs = parse_str("Key: a\n# comment\nKey2: b\n\n").unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].get("Key"), Some("a"));
        assert_eq!(paragraphs[0].get("Key2"), Some("b"));
        assert_eq!(paragraphs[0].order(), &["Key", "Key2"]);
    }

    #[test]
    fn test_comment_wins_over_continuation() {
        let paragraphs = parse_str("Key: a\n # not a continuation\n b\n").unwrap();
        assert_eq!(paragraphs[0].get("Key"), Some("a\nb"));
    }

    #[test]
    fn test_duplicate_key_overwrites_but_keeps_order() {
        let paragraphs = parse_str("Key: a\nKey: b\n\n").unwrap();
        assert_eq!(paragraphs[0].get("Key"), Some("b"));
        assert_eq!(paragraphs[0].order(), &["Key", "Key"]);
    }

    #[test]
    fn test_eof_without_blank_line() {
        let paragraphs = parse_str("Key: a\n").unwrap();
        assert_eq!(paragraphs, vec![Paragraph::from_fields([("Key", "a")])]);

        let paragraphs = parse_str("Key: a").unwrap();
        assert_eq!(paragraphs, vec![Paragraph::from_fields([("Key", "a")])]);
    }

    #[test]
    fn test_empty_and_blank_only_input() {
        assert!(parse_str("").unwrap().is_empty());
        assert!(parse_str("\n\n\n").unwrap().is_empty());
        assert!(parse_str("# only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_extra_blank_lines_do_not_create_paragraphs() {
        let paragraphs = parse_str("\n\nA: 1\n\n\n\nB: 2\n\n").unwrap();
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_crlf_input() {
        let paragraphs = parse_str("A: 1\r\n more\r\n\r\nB: 2\r\n").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].get("A"), Some("1\nmore"));
        assert_eq!(paragraphs[1].get("B"), Some("2"));
    }

    #[test]
    fn test_syntax_error_names_line() {
        assert_syntax_error(parse_str("BadLine\n\n"), "BadLine");

        match parse_str("A: 1\n\nB: 2\noops\n") {
            Err(ParseError::Syntax { line_number, line }) => {
                assert_eq!(line_number, 4);
                assert_eq!(line, "oops");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_continuation_without_field_is_error() {
        assert_syntax_error(parse_str(" orphan\n"), " orphan");
        assert_syntax_error(parse_str("A: 1\n\n orphan\n"), " orphan");
    }

    #[test]
    fn test_reader_yields_prefix_before_error() {
        let mut reader = ParagraphReader::new(Cursor::new("A: 1\n\nB: 2\n\nbroken\n\nC: 3\n"));

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.get("A"), Some("1"));
        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.get("B"), Some("2"));

        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some("broken"));

        // Fused after the error.
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_parse_everything_discards_prefix_on_error() {
        assert!(parse_str("A: 1\n\nbroken\n").is_err());
    }

    #[test]
    fn test_invalid_utf8_is_io_error() {
        let bytes: &[u8] = b"Key: \xff\xfe\n";
        let result = parse_paragraphs(Cursor::new(bytes));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
