//! Syntax highlighting and inline hints for the line being edited.

use crate::lexer::tokenize;
use crate::metadata::Metadata;
use crate::style::{self, Color};
use crate::token::{Line, Span};
use crate::zipper::Zipper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Action,
    PartialAction,
    /// The opening quote of a string that never closes.
    UnterminatedQuote,
    /// Everything after that quote.
    UnterminatedContent,
    ValidCommand,
    InvalidCommand,
    QuotedString,
    Option,
    Argument,
}

impl Category {
    fn color(self) -> Color {
        match self {
            Category::Action => Color::SpringGreen,
            Category::PartialAction => Color::Orange,
            Category::UnterminatedQuote => Color::Crimson,
            Category::UnterminatedContent => Color::Green,
            Category::ValidCommand => Color::Aqua,
            Category::InvalidCommand => Color::Crimson,
            Category::QuotedString => Color::YellowGreen,
            Category::Option => Color::Blue,
            Category::Argument => Color::SlateBlue,
        }
    }
}

/// Classifies every token of `line`, in order.
///
/// An unterminated string yields two spans: its opening quote and the rest.
pub fn annotate(line: &str, metadata: &dyn Metadata) -> Vec<(Span, Category)> {
    annotate_line(&tokenize(line), metadata)
}

fn annotate_line(line: &Line, metadata: &dyn Metadata) -> Vec<(Span, Category)> {
    let mut spans = Vec::with_capacity(line.tokens().len());
    for zipper in line.zipper().iter() {
        let Some(token) = zipper.token() else {
            continue;
        };
        let span = token.span;
        if zipper.is_unterminated_string() {
            let quote = Span::new(span.start, span.start + 1);
            spans.push((quote, Category::UnterminatedQuote));
            if span.len() > 1 {
                spans.push((Span::new(quote.end, span.end), Category::UnterminatedContent));
            }
            continue;
        }
        spans.push((span, categorize(zipper, metadata)));
    }
    spans
}

fn categorize(zipper: Zipper<'_>, metadata: &dyn Metadata) -> Category {
    if zipper.is_action() {
        Category::Action
    } else if zipper.is_partial_action() {
        Category::PartialAction
    } else if zipper.is_command() {
        if metadata.is_command(zipper.content()) {
            Category::ValidCommand
        } else {
            Category::InvalidCommand
        }
    } else if zipper.is_option() && zipper.options_allowed() {
        Category::Option
    } else if zipper.token().is_some_and(|token| token.is_quoted()) {
        Category::QuotedString
    } else {
        Category::Argument
    }
}

/// Paints `line`, keeping the original whitespace between tokens byte for byte.
pub fn highlight(line: &str, metadata: &dyn Metadata, color: bool) -> String {
    if !color {
        return line.to_string();
    }

    let tokens = tokenize(line);
    let mut out = String::with_capacity(line.len() * 2);
    let mut cursor = 0;
    for (span, category) in annotate_line(&tokens, metadata) {
        out.push_str(tokens.slice(Span::new(cursor, span.start)));
        out.push_str(&style::paint(tokens.slice(span), category.color()));
        cursor = span.end;
    }
    out.push_str(tokens.slice(Span::new(cursor, tokens.char_len())));
    out
}

/// Usage suffix of the option being typed, e.g. `[=<when>]` after `diff --color`.
pub fn hint(line: &str, metadata: &dyn Metadata) -> Option<String> {
    if line.chars().last().is_none_or(char::is_whitespace) {
        return None;
    }

    let tokens = tokenize(line);
    let last = tokens.zipper().last();
    if !last.is_option() || !last.options_allowed() {
        return None;
    }
    let command = last.reverse_find(|zipper| zipper.is_command())?;
    metadata
        .option_suffix(command.content(), last.content())
        .filter(|suffix| !suffix.is_empty())
}

/// Gray rendering of a hint.
pub fn paint_hint(hint: &str, color: bool) -> String {
    if color {
        style::tint(hint, Color::Gray)
    } else {
        hint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::fake::FakeMetadata;

    fn categories(line: &str) -> Vec<Category> {
        annotate(line, &FakeMetadata::new())
            .into_iter()
            .map(|(_, category)| category)
            .collect()
    }

    #[test]
    fn test_categories() {
        use Category::*;
        assert_eq!(
            categories("add --all file.txt && commit -m 'wip'"),
            vec![ValidCommand, Option, Argument, Action, ValidCommand, Option, QuotedString]
        );
        assert_eq!(categories("dance; status"), vec![InvalidCommand, Action, ValidCommand]);
        assert_eq!(categories("diff & x"), vec![ValidCommand, PartialAction, InvalidCommand]);
        assert_eq!(categories("add -- -x"), vec![ValidCommand, Argument, Argument]);
    }

    #[test]
    fn test_unterminated_string_is_split() {
        let spans = annotate("commit -m \"wip", &FakeMetadata::new());
        assert_eq!(
            spans[2..],
            [
                (Span::new(10, 11), Category::UnterminatedQuote),
                (Span::new(11, 14), Category::UnterminatedContent),
            ]
        );

        let spans = annotate("log '", &FakeMetadata::new());
        assert_eq!(spans[1..], [(Span::new(4, 5), Category::UnterminatedQuote)]);
    }

    #[test]
    fn test_highlight_preserves_text() {
        let fake = FakeMetadata::new();
        for line in [
            "  add\tfile.txt  &&   commit -m 'wip'  ",
            "log --author='Zoë' ;",
            "diff &lskdf \"oops",
            "",
        ] {
            assert_eq!(style::strip(&highlight(line, &fake, true)), line);
        }
    }

    #[test]
    fn test_highlight_colors_commands() {
        let fake = FakeMetadata::new();
        let painted = highlight("status", &fake, true);
        assert_eq!(painted, style::paint("status", Color::Aqua));
        let painted = highlight("statsu", &fake, true);
        assert_eq!(painted, style::paint("statsu", Color::Crimson));
        assert_eq!(highlight("statsu", &fake, false), "statsu");
    }

    #[test]
    fn test_hint() {
        let fake = FakeMetadata::new();
        assert_eq!(hint("diff --color", &fake), Some("[=<when>]".to_string()));
        assert_eq!(hint("commit -m", &fake), Some(" <msg>".to_string()));
        assert_eq!(hint("commit -m ", &fake), None);
        assert_eq!(hint("commit --amend", &fake), None);
        assert_eq!(hint("diff -- --color", &fake), None);
        assert_eq!(hint("diff", &fake), None);
    }
}
