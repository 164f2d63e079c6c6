//! Token model shared by the lexer, the zipper and every consumer built on top of it.
//!
//! Tokens never own a copy of the source text they came from. They carry a half-open
//! `[start, end)` range of *character* offsets into the line plus their semantic content
//! (the value after quote and escape processing). The literal slice is recovered through
//! [`Line::raw`], which keeps a char-to-byte table so that multi-byte characters count as
//! one position.

use crate::zipper::Zipper;

/// Half-open range of character offsets into the source line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of characters covered by the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An unquoted word or a terminated quoted string, e.g. `commit` or `'wip'`.
    String,
    /// The `&&` action.
    And,
    /// The `||` action.
    Or,
    /// The `;` action.
    End,
    /// A lone `&` or `|`. Never valid on its own.
    PartialAction,
    /// A quote that was opened but never closed, e.g. `"wip`.
    UnterminatedString,
    /// A `--` followed by whitespace. Strings after it are never options.
    EndOfOptions,
}

impl TokenKind {
    /// `&&`, `||` or `;`.
    pub fn is_action(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or | TokenKind::End)
    }

    /// Tokens that end up as command arguments.
    ///
    /// [`TokenKind::EndOfOptions`] counts: `--` is still passed to the command.
    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::EndOfOptions)
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    content: String,
    quoted: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, content: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            content: content.into(),
            quoted: false,
        }
    }

    /// Marks the token as having started with a `'` or `"`.
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// Semantic value: delimiters removed and escapes processed for quoted strings,
    /// the literal text for everything else.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if the raw content starts with a quote character.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// A lexed line: the frozen source text together with its tokens.
///
/// Built once per input line and never mutated. Every [`Zipper`] borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    source: String,
    // byte offset of every char position, plus one entry for the end of the line
    offsets: Vec<usize>,
    tokens: Vec<Token>,
}

impl Line {
    pub fn new(source: &str, tokens: Vec<Token>) -> Self {
        let offsets = source
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(source.len()))
            .collect();
        Self {
            source: source.to_string(),
            offsets,
            tokens,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Length of the source in characters.
    pub fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Byte offset of a character position, clamped to the end of the line.
    pub fn byte_offset(&self, char_pos: usize) -> usize {
        self.offsets[char_pos.min(self.char_len())]
    }

    /// The literal source text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        &self.source[self.byte_offset(span.start)..self.byte_offset(span.end)]
    }

    /// The literal source text of a token, quotes and escapes included.
    pub fn raw(&self, token: &Token) -> &str {
        self.slice(token.span)
    }

    /// Cursor positioned on the first token (or the tail when there are none).
    pub fn zipper(&self) -> Zipper<'_> {
        Zipper::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_uses_char_offsets() {
        let tokens = vec![
            Token::new(TokenKind::String, Span::new(0, 3), "add"),
            Token::new(TokenKind::String, Span::new(4, 11), "héllo").quoted(),
        ];
        let line = Line::new("add 'héllo'", tokens);
        assert_eq!(line.char_len(), 11);
        assert_eq!(line.raw(&line.tokens()[0]), "add");
        assert_eq!(line.slice(Span::new(4, 11)), "'héllo'");
        assert_eq!(line.byte_offset(100), "add 'héllo'".len());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TokenKind::End.is_action());
        assert!(!TokenKind::PartialAction.is_action());
        assert!(TokenKind::EndOfOptions.is_string());
        assert!(!TokenKind::UnterminatedString.is_string());
    }
}
