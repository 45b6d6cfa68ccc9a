//! Line and word helpers.
//!
//! LSP clients only send a URI and a position, so the pieces an editor
//! would normally provide (line text, the word under the cursor, the span
//! of an arbitrary pattern at the cursor) are computed here from the
//! stored document text.
//!
//! All columns exchanged with the client are UTF-16 code units, as the
//! protocol requires.  Internally matching happens on byte offsets and is
//! converted at the edges.
use std::sync::LazyLock;

use regex::Regex;
use tower_lsp::lsp_types::{Position, Range};

/// Characters that end a word under the editor's default word definition.
/// Anything else that is not whitespace (letters, digits, `_`, `$`, …)
/// belongs to the word.
const WORD_SEPARATORS: &str = "`~!@#%^&*()-=+[{]}\\|;:'\",.<>/?";

static DEFAULT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    let class = regex::escape(WORD_SEPARATORS);
    Regex::new(&format!(r"[^\s{class}]+")).expect("default word pattern is valid")
});

/// A span on a single line, in UTF-16 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMatch<'a> {
    /// The matched text.
    pub text: &'a str,
    /// Start column (inclusive).
    pub start: u32,
    /// End column (exclusive).
    pub end: u32,
}

impl WordMatch<'_> {
    /// Turn the span into an LSP range on `line`.
    pub fn to_range(&self, line: u32) -> Range {
        Range {
            start: Position::new(line, self.start),
            end: Position::new(line, self.end),
        }
    }
}

/// Return the text of line `line` (zero-based), without its terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, as in LSP.  Asking for the
/// empty line after a final terminator yields `Some("")`; anything past
/// that is `None`.
pub fn line_at(content: &str, line: u32) -> Option<&str> {
    let mut rest = content;
    for _ in 0..line {
        let bytes = rest.as_bytes();
        let end = memchr::memchr2(b'\n', b'\r', bytes)?;
        let width = if bytes[end..].starts_with(b"\r\n") { 2 } else { 1 };
        rest = &rest[end + width..];
    }
    let end = memchr::memchr2(b'\n', b'\r', rest.as_bytes()).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Convert a UTF-16 column to a byte offset into `line`.
///
/// Columns past the end of the line clamp to `line.len()`.  A column that
/// lands in the middle of a surrogate pair snaps forward to the next char
/// boundary.
pub fn utf16_to_byte(line: &str, column: u32) -> usize {
    let mut units = 0u32;
    for (idx, ch) in line.char_indices() {
        if units >= column {
            return idx;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}

/// Convert a byte offset into `line` to a UTF-16 column.
pub fn byte_to_utf16(line: &str, byte: usize) -> u32 {
    let byte = byte.min(line.len());
    line[..byte].chars().map(|c| c.len_utf16() as u32).sum()
}

/// Return the word at `column`, using the editor's default word definition.
///
/// The cursor touching either edge of a word selects it, so `foo|(` and
/// `|foo` both yield `foo`.
pub fn word_at(line: &str, column: u32) -> Option<WordMatch<'_>> {
    word_at_with_pattern(line, column, &DEFAULT_WORD)
}

/// Return the first non-empty match of `pattern` on `line` whose span
/// contains `column` (both edges inclusive).
pub fn word_at_with_pattern<'a>(
    line: &'a str,
    column: u32,
    pattern: &Regex,
) -> Option<WordMatch<'a>> {
    let cursor = utf16_to_byte(line, column);
    pattern
        .find_iter(line)
        .filter(|m| !m.is_empty())
        .take_while(|m| m.start() <= cursor)
        .find(|m| cursor <= m.end())
        .map(|m| WordMatch {
            text: m.as_str(),
            start: byte_to_utf16(line, m.start()),
            end: byte_to_utf16(line, m.end()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_at_handles_crlf_and_trailing_newline() {
        let content = "first\r\nsecond\nthird\n";
        assert_eq!(line_at(content, 0), Some("first"));
        assert_eq!(line_at(content, 1), Some("second"));
        assert_eq!(line_at(content, 2), Some("third"));
        assert_eq!(line_at(content, 3), Some(""));
        assert_eq!(line_at(content, 4), None);
    }

    #[test]
    fn line_at_treats_lone_cr_as_a_terminator() {
        let content = "one\rtwo\r\nthree\nfour\r";
        assert_eq!(line_at(content, 0), Some("one"));
        assert_eq!(line_at(content, 1), Some("two"));
        assert_eq!(line_at(content, 2), Some("three"));
        assert_eq!(line_at(content, 3), Some("four"));
        assert_eq!(line_at(content, 4), Some(""));
        assert_eq!(line_at(content, 5), None);
    }

    #[test]
    fn utf16_columns_round_trip_through_astral_chars() {
        // '𝔸' is two UTF-16 units and four bytes.
        let line = "a𝔸b";
        assert_eq!(utf16_to_byte(line, 0), 0);
        assert_eq!(utf16_to_byte(line, 1), 1);
        assert_eq!(utf16_to_byte(line, 3), 5);
        assert_eq!(utf16_to_byte(line, 99), line.len());
        assert_eq!(byte_to_utf16(line, 5), 3);
    }

    #[test]
    fn word_at_selects_identifier_under_cursor() {
        let line = "x.toString()";
        let word = word_at(line, 4).unwrap();
        assert_eq!(word.text, "toString");
        assert_eq!((word.start, word.end), (2, 10));
    }

    #[test]
    fn word_at_accepts_cursor_touching_word_end() {
        let line = "x.toString()";
        assert_eq!(word_at(line, 10).unwrap().text, "toString");
        assert_eq!(word_at(line, 1).unwrap().text, "x");
    }

    #[test]
    fn word_at_keeps_dollar_and_underscore() {
        let line = "  this.get$Value_now();";
        assert_eq!(word_at(line, 10).unwrap().text, "get$Value_now");
    }

    #[test]
    fn word_at_on_whitespace_returns_none() {
        assert!(word_at("a    b", 3).is_none());
        assert!(word_at("", 0).is_none());
    }

    #[test]
    fn pattern_match_must_span_cursor() {
        let pattern = Regex::new(&regex::escape("run")).unwrap();
        let line = "run(); runner.run();";
        let hit = word_at_with_pattern(line, 15, &pattern).unwrap();
        assert_eq!((hit.start, hit.end), (14, 17));
        assert!(word_at_with_pattern(line, 5, &pattern).is_none());
    }

    #[test]
    fn to_range_uses_given_line() {
        let word = word_at("foo bar", 5).unwrap();
        let range = word.to_range(7);
        assert_eq!(range.start, Position::new(7, 4));
        assert_eq!(range.end, Position::new(7, 7));
    }
}
