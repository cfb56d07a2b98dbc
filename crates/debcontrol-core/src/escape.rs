//! Value escaping for multi-line field values.
//!
//! A value spanning several lines is written as a first line followed by
//! continuation lines, each prefixed with one space. An empty
//! continuation line would read as the blank line that ends a paragraph,
//! so it is written as a lone `.` instead:
//!
//! ```text
//! Description: first line
//!  second line
//!  .
//!  after an empty line
//! ```

/// Marker used for an empty continuation line.
pub const EMPTY_LINE_MARKER: &str = ".";

/// Escape a raw value so every embedded line becomes a continuation line.
pub fn escape_value(text: &str) -> String {
    let mut lines = text.split('\n');
    let mut out = String::with_capacity(text.len() + 8);

    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push_str("\n ");
        if line.is_empty() {
            out.push_str(EMPTY_LINE_MARKER);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Decode the trimmed remainder of a continuation line.
pub fn unescape_continuation(remainder: &str) -> &str {
    if remainder == EMPTY_LINE_MARKER {
        ""
    } else {
        remainder
    }
}
