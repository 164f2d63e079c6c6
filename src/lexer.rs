//! A module implementing lexical analysis (tokenization) of a gitline input line.
//!
//! Lexing never fails. Malformed input such as an unclosed quote or a lone `&` still
//! produces a token, so that the parser, the highlighter and the completer can all point
//! at the exact characters involved.

use crate::token::{Line, Span, Token, TokenKind};

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
}

impl LexingFSM {
    /// Creates a new lexer over the characters of `line`.
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
        }
    }

    /// Scans the whole input left to right, longest match first at each position.
    fn make_tokens(&mut self) -> Vec<Token> {
        let mut out = Vec::new();

        while let Some(ch) = self.peek_char() {
            let start = self.pos;
            match ch {
                c if c.is_whitespace() => {
                    self.read_char();
                }
                '&' | '|' => {
                    self.read_char();
                    if self.peek_char() == Some(ch) {
                        self.read_char();
                        let kind = if ch == '&' {
                            TokenKind::And
                        } else {
                            TokenKind::Or
                        };
                        out.push(self.literal(kind, start));
                    } else {
                        out.push(self.literal(TokenKind::PartialAction, start));
                    }
                }
                ';' => {
                    self.read_char();
                    out.push(self.literal(TokenKind::End, start));
                }
                '\'' | '"' => out.push(self.quoted(ch)),
                '-' if self.at_end_of_options() => {
                    self.pos += 2;
                    out.push(self.literal(TokenKind::EndOfOptions, start));
                }
                _ => out.push(self.unquoted()),
            }
        }

        out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input.get(self.pos + n).copied()
    }

    /// `--` directly followed by whitespace.
    fn at_end_of_options(&self) -> bool {
        self.peek_char() == Some('-')
            && self.peek_nth(1) == Some('-')
            && self.peek_nth(2).is_some_and(char::is_whitespace)
    }

    /// A token whose content is exactly the text it was scanned from.
    fn literal(&self, kind: TokenKind, start: usize) -> Token {
        let content: String = self.input[start..self.pos].iter().collect();
        Token::new(kind, Span::new(start, self.pos), content)
    }

    /// Scans an unquoted word up to the next unescaped action, quote or whitespace.
    fn unquoted(&mut self) -> Token {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            match ch {
                '&' | '|' | ';' | '\'' | '"' => break,
                c if c.is_whitespace() => break,
                '\\' => {
                    self.read_char();
                    // the escaped character belongs to the word whatever it is
                    self.read_char();
                }
                _ => {
                    self.read_char();
                }
            }
        }
        self.literal(TokenKind::String, start)
    }

    /// Scans a string opened by `delimiter` until the matching unescaped delimiter.
    fn quoted(&mut self, delimiter: char) -> Token {
        let start = self.pos;
        self.read_char();

        let mut content = String::new();
        loop {
            match self.read_char() {
                None => {
                    return Token::new(
                        TokenKind::UnterminatedString,
                        Span::new(start, self.pos),
                        content,
                    )
                    .quoted();
                }
                Some(c) if c == delimiter => break,
                Some('\\') => match self.read_char() {
                    Some(c) if c == delimiter || c == '\\' => content.push(c),
                    Some(c) => {
                        content.push('\\');
                        content.push(c);
                    }
                    None => content.push('\\'),
                },
                Some(c) => content.push(c),
            }
        }

        Token::new(TokenKind::String, Span::new(start, self.pos), content).quoted()
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Returns the frozen line together with its tokens. Blank lines yield no tokens.
pub fn tokenize(line: &str) -> Line {
    let mut lexer = LexingFSM::new(line);
    let tokens = lexer.make_tokens();
    Line::new(line, tokens)
}
