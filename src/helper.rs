//! Line editor integration: completion, highlighting and hints.

use crate::completion::complete_at;
use crate::highlight::{highlight, hint, paint_hint};
use crate::metadata::Metadata;
use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::rc::Rc;

pub struct ShellHelper<M> {
    metadata: Rc<M>,
    color: bool,
    completion_limit: usize,
}

impl<M: Metadata> ShellHelper<M> {
    pub fn new(metadata: Rc<M>, color: bool, completion_limit: usize) -> Self {
        Self {
            metadata,
            color,
            completion_limit,
        }
    }

    /// Candidates for `line` with the byte offset they replace from.
    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        match complete_at(line, self.metadata.as_ref(), self.completion_limit) {
            Some(completion) => {
                let start = line
                    .char_indices()
                    .nth(completion.start)
                    .map_or(line.len(), |(byte, _)| byte);
                (start, completion.candidates)
            }
            None => (line.len(), Vec::new()),
        }
    }
}

impl<M: Metadata> Completer for ShellHelper<M> {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl<M: Metadata> Hinter for ShellHelper<M> {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        hint(line, self.metadata.as_ref())
    }
}

impl<M: Metadata> Highlighter for ShellHelper<M> {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !self.color {
            return Cow::Borrowed(line);
        }
        Cow::Owned(highlight(line, self.metadata.as_ref(), true))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if !self.color {
            return Cow::Borrowed(hint);
        }
        Cow::Owned(paint_hint(hint, true))
    }

    // every keystroke can change how earlier tokens are classified
    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        self.color
    }
}

impl<M: Metadata> Validator for ShellHelper<M> {}

impl<M: Metadata> Helper for ShellHelper<M> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::fake::FakeMetadata;

    #[test]
    fn test_candidates_start_at_byte_offset() {
        let helper = ShellHelper::new(Rc::new(FakeMetadata::new()), false, 250);
        assert_eq!(
            helper.candidates("añadir && che"),
            (11, vec!["checkout".to_string(), "cherry-pick".to_string()])
        );
        assert_eq!(helper.candidates("status "), (7, vec![]));
    }

    #[test]
    fn test_plain_highlight_borrows() {
        let helper = ShellHelper::new(Rc::new(FakeMetadata::new()), false, 250);
        assert!(matches!(helper.highlight("status", 6), Cow::Borrowed("status")));
    }
}
