//! Errors raised while validating a line, before any command runs.
//!
//! Errors are plain data: the kind, the char span of the offending token and the reason.
//! [`LineError::render`] turns one into the caret report shown to the user.

use crate::style::{self, Color};
use crate::token::Span;
use std::fmt;

/// Which stage rejected the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed tokens: unterminated strings and lone `&` or `|`.
    Syntax,
    /// Well-formed tokens in an illegal order.
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => f.write_str("syntax"),
            ErrorKind::Parse => f.write_str("parse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reason {
    #[error("unterminated string")]
    UnterminatedString,
    #[error("expected '{expected}' but got '{got}' instead")]
    PartialAction { expected: String, got: String },
    #[error("unexpected '{action}' to start the line")]
    LeadingAction { action: String },
    #[error("unexpected '{action}' to end the line")]
    TrailingAction { action: String },
    #[error("expected a string after '{previous}' but got '{action}' instead")]
    MissingString { previous: String, action: String },
}

impl Reason {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Reason::UnterminatedString | Reason::PartialAction { .. } => ErrorKind::Syntax,
            Reason::LeadingAction { .. }
            | Reason::TrailingAction { .. }
            | Reason::MissingString { .. } => ErrorKind::Parse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} error at {}..{}: {reason}", .reason.kind(), .span.start, .span.end)]
pub struct LineError {
    pub span: Span,
    pub reason: Reason,
}

impl LineError {
    pub fn new(span: Span, reason: Reason) -> Self {
        Self { span, reason }
    }

    pub fn kind(&self) -> ErrorKind {
        self.reason.kind()
    }

    /// Formats the report with the source line and a caret under the offending characters.
    pub fn render(&self, source: &str, color: bool) -> String {
        let title = if color {
            style::paint("error>", Color::Blue)
        } else {
            "error>".to_string()
        };
        let indent = " ".repeat(self.span.start);
        let carets = "^".repeat(self.span.len().max(1));
        format!(
            "| {title} {}\n|\n| {source}\n| {indent}{carets}\n",
            self.reason
        )
    }
}
