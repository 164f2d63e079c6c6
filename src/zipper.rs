//! Cursor over the tokens of a lexed [`Line`].
//!
//! A [`Zipper`] is a shared reference to the line plus an index in `[-1, len]`, where
//! `-1` is the *head* (before the first token) and `len` is the *tail* (after the last
//! token). Moving produces a new `Copy` value, so any number of cursors over the same line
//! can be alive at once and none of them invalidates another.

use crate::token::{Line, Token, TokenKind};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `-`, `-X…`, `--` or `--xxx`, but never three leading dashes.
static OPTION_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--?(?:[^-].*)?$").expect("valid option regex"));

#[derive(Clone, Copy)]
pub struct Zipper<'a> {
    line: &'a Line,
    index: isize,
}

impl<'a> Zipper<'a> {
    /// Cursor on the first token, or on the tail for an empty line.
    pub fn new(line: &'a Line) -> Self {
        Self::at_index(line, 0)
    }

    fn at_index(line: &'a Line, index: isize) -> Self {
        let len = line.tokens().len() as isize;
        Self {
            line,
            index: index.clamp(-1, len),
        }
    }

    /// Current index; `-1` at the head and `len` at the tail.
    pub fn index(&self) -> isize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.line.tokens().len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.tokens().is_empty()
    }

    /// The previous position, or `self` at the head.
    pub fn before(&self) -> Self {
        if self.is_head() {
            *self
        } else {
            Self::at_index(self.line, self.index - 1)
        }
    }

    /// The next position, or `self` at the tail.
    pub fn after(&self) -> Self {
        if self.is_tail() {
            *self
        } else {
            Self::at_index(self.line, self.index + 1)
        }
    }

    /// A cursor at an absolute index, clamped into `[-1, len]`.
    pub fn at(&self, index: isize) -> Self {
        Self::at_index(self.line, index)
    }

    /// Cursor on the first token, or the head when there are none.
    pub fn first(&self) -> Self {
        if self.is_empty() { self.at(-1) } else { self.at(0) }
    }

    /// Cursor on the last token, or the tail when there are none.
    pub fn last(&self) -> Self {
        let len = self.len() as isize;
        if self.is_empty() { self.at(len) } else { self.at(len - 1) }
    }

    /// Cursors for every token, front to back.
    pub fn iter(&self) -> impl Iterator<Item = Zipper<'a>> + use<'a> {
        let line = self.line;
        (0..line.tokens().len() as isize).map(move |index| Self::at_index(line, index))
    }

    pub fn is_head(&self) -> bool {
        self.index < 0
    }

    pub fn is_tail(&self) -> bool {
        self.index >= self.len() as isize
    }

    /// On the first token; never at the head or the tail.
    pub fn is_first(&self) -> bool {
        self.token().is_some() && self.before().is_head()
    }

    /// On the last token; never at the head or the tail.
    pub fn is_last(&self) -> bool {
        self.token().is_some() && self.after().is_tail()
    }

    /// The token under the cursor, `None` at the head or the tail.
    pub fn token(&self) -> Option<&'a Token> {
        if self.is_head() {
            return None;
        }
        self.line.tokens().get(self.index as usize)
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.token().map(|token| token.kind)
    }

    /// Literal source text of the current token, empty at the boundaries.
    pub fn raw(&self) -> &'a str {
        self.token().map_or("", |token| self.line.raw(token))
    }

    /// Processed content of the current token, empty at the boundaries.
    pub fn content(&self) -> &'a str {
        self.token().map_or("", Token::content)
    }

    /// Whitespace between the current token and the next one.
    pub fn gap_to_next(&self) -> usize {
        match (self.token(), self.after().token()) {
            (Some(current), Some(next)) => next.start() - current.end(),
            _ => 0,
        }
    }

    /// Whitespace between the previous token and the current one.
    pub fn gap_to_prev(&self) -> usize {
        match (self.before().token(), self.token()) {
            (Some(previous), Some(current)) => current.start() - previous.end(),
            _ => 0,
        }
    }

    pub fn is_string(&self) -> bool {
        self.kind().is_some_and(TokenKind::is_string)
    }

    pub fn is_action(&self) -> bool {
        self.kind().is_some_and(TokenKind::is_action)
    }

    pub fn is_and(&self) -> bool {
        self.kind() == Some(TokenKind::And)
    }

    pub fn is_or(&self) -> bool {
        self.kind() == Some(TokenKind::Or)
    }

    pub fn is_end(&self) -> bool {
        self.kind() == Some(TokenKind::End)
    }

    pub fn is_partial_action(&self) -> bool {
        self.kind() == Some(TokenKind::PartialAction)
    }

    pub fn is_unterminated_string(&self) -> bool {
        self.kind() == Some(TokenKind::UnterminatedString)
    }

    pub fn is_end_of_options(&self) -> bool {
        self.kind() == Some(TokenKind::EndOfOptions)
    }

    /// True if the current string names the command to run: it starts the line or
    /// follows an action (a partial action counts, the user probably meant one).
    pub fn is_command(&self) -> bool {
        let before = self.before();
        self.is_string() && (before.is_head() || before.is_action() || before.is_partial_action())
    }

    /// True if the current token is an option-shaped string outside command position.
    pub fn is_option(&self) -> bool {
        self.kind() == Some(TokenKind::String)
            && OPTION_SHAPE.is_match(self.raw())
            && !self.is_command()
    }

    /// False once a `--` separates the current token from its command.
    pub fn options_allowed(&self) -> bool {
        let mut zipper = *self;
        loop {
            if zipper.is_head() || zipper.is_end_of_options() {
                return false;
            }
            if zipper.is_command() {
                return true;
            }
            zipper = zipper.before();
        }
    }

    /// The command-position cursor that the current argument belongs to.
    pub fn current_command(&self) -> Option<Self> {
        let mut zipper = *self;
        while zipper.is_string() {
            if zipper.is_command() {
                return Some(zipper);
            }
            zipper = zipper.before();
        }
        None
    }

    /// Scans backward from the last token and returns the first cursor matching `predicate`.
    pub fn reverse_find(&self, predicate: impl Fn(&Zipper<'a>) -> bool) -> Option<Self> {
        let mut zipper = self.last();
        while !zipper.is_head() && !zipper.is_tail() {
            if predicate(&zipper) {
                return Some(zipper);
            }
            zipper = zipper.before();
        }
        None
    }
}

impl PartialEq for Zipper<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.line, other.line) && self.index == other.index
    }
}

impl Eq for Zipper<'_> {}

impl fmt::Debug for Zipper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zipper")
            .field("index", &self.index)
            .field("token", &self.token())
            .finish()
    }
}
