//! Placeholder token scanner.
//!
//! Grammar: a token is `{{`, one or more word characters (`A-Z`, `a-z`,
//! `0-9`, `_`), then `}}`. No whitespace is allowed inside the braces.
//! Scanning is leftmost-first and non-overlapping: after a token matches,
//! the scan resumes right after its closing braces. A `{{` that does not
//! start a valid token is skipped one byte at a time, so `{{{name}}}`
//! yields the token `{{name}}` starting at offset 1.

use std::collections::HashSet;
use std::ops::Range;

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

/// One placeholder occurrence in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Identifier between the braces
    pub name: &'a str,
    /// Byte range of the whole token including braces
    pub span: Range<usize>,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Iterator over the tokens of a text, in order of appearance.
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();

        while self.pos + OPEN.len() <= bytes.len() {
            let start = self.pos;
            if !bytes[start..].starts_with(OPEN) {
                self.pos += 1;
                continue;
            }

            let name_start = start + OPEN.len();
            let name_len = bytes[name_start..]
                .iter()
                .take_while(|b| is_word_byte(**b))
                .count();
            let name_end = name_start + name_len;

            if name_len > 0 && bytes[name_end..].starts_with(CLOSE) {
                let end = name_end + CLOSE.len();
                self.pos = end;
                // Word bytes are ASCII, so the slice bounds fall on char boundaries.
                return Some(Token {
                    name: &self.text[name_start..name_end],
                    span: start..end,
                });
            }

            self.pos += 1;
        }

        self.pos = bytes.len();
        None
    }
}

/// Scan `text` for placeholder tokens.
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

/// Identifiers of all tokens in `text`, first occurrence order, no duplicates.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    extract_placeholders_from(&[text])
}

/// Identifiers across several texts scanned in sequence, deduplicated so
/// each identifier keeps its earliest position.
pub fn extract_placeholders_from(texts: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for token in texts.iter().flat_map(|text| tokens(text)) {
        if seen.insert(token.name) {
            names.push(token.name.to_string());
        }
    }

    names
}
