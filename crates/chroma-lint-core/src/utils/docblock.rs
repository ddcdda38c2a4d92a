//! Doc comment parsing.
//!
//! Splits a `/** ... */` token into its summary line and `@tag` lines,
//! keeping the source position of each tag so rules can report on it.

use crate::token::{Token, TokenKind};

/// A single `@tag` line inside a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name including the `@` (e.g. `@param`).
    pub name: String,
    /// Text after the tag on the same line, without surrounding whitespace.
    /// `None` when the tag has no content.
    pub content: Option<String>,
    /// Raw text after the tag name, with interior spacing preserved.
    pub raw: String,
    /// Line of the tag (1-indexed).
    pub line: usize,
    /// Column of the `@` (1-indexed).
    pub column: usize,
    /// Byte offset of the `@` in the source file.
    pub offset: usize,
}

/// A line of free text in a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    /// Text with comment decoration removed.
    pub text: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column of the first character (1-indexed).
    pub column: usize,
    /// Byte offset of the first character in the source file.
    pub offset: usize,
}

/// Parsed doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// First non-empty text line before any tag.
    pub summary: Option<DocLine>,
    /// Tags in source order.
    pub tags: Vec<DocTag>,
}

impl DocBlock {
    /// Parses a doc comment token. Returns `None` for any other token kind.
    #[must_use]
    pub fn parse(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::DocComment {
            return None;
        }

        let mut block = Self::default();
        let mut line_offset = 0usize;

        for (i, raw_line) in token.content.split('\n').enumerate() {
            let (start, text) = strip_decoration(raw_line, i == 0);
            let line = token.line + i;
            let base_column = if i == 0 { token.column } else { 1 };
            let column = base_column + raw_line[..start].chars().count();
            let offset = token.offset + line_offset + start;
            line_offset += raw_line.len() + 1;

            if text.is_empty() {
                continue;
            }

            if text.starts_with('@') {
                let name_len = text.find(char::is_whitespace).unwrap_or(text.len());
                let raw = text[name_len..].trim_start().to_string();
                let content = if raw.is_empty() {
                    None
                } else {
                    Some(raw.trim().to_string())
                };
                block.tags.push(DocTag {
                    name: text[..name_len].to_string(),
                    content,
                    raw,
                    line,
                    column,
                    offset,
                });
            } else if block.summary.is_none() && block.tags.is_empty() {
                block.summary = Some(DocLine {
                    text: text.to_string(),
                    line,
                    column,
                    offset,
                });
            }
        }

        Some(block)
    }

    /// Tags with the given name, in source order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }
}

/// Removes `/**`, leading `*` and trailing `*/` from one comment line.
///
/// Returns the byte index in `raw` where the remaining text starts, and the text.
fn strip_decoration(raw: &str, first: bool) -> (usize, &str) {
    let mut start = raw.len() - raw.trim_start().len();
    let rest = &raw[start..];

    if first && rest.starts_with("/**") {
        start += 3;
    } else if rest.starts_with('*') && !rest.starts_with("*/") {
        start += 1;
    }

    let rest = &raw[start..];
    start += rest.len() - rest.trim_start().len();

    let mut text = raw[start..].trim_end();
    if let Some(stripped) = text.strip_suffix("*/") {
        text = stripped.trim_end();
    }
    (start, text)
}
