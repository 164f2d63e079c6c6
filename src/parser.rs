//! Groups the tokens of a line into commands joined by `&&`, `||` and `;`.

use crate::error::{LineError, Reason};
use crate::lexer::tokenize;
use crate::token::Line;
use crate::zipper::Zipper;

/// The join operator between a group and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `&&`: run only if the previous command succeeded.
    And,
    /// `||`: run only if the previous command failed.
    Or,
    /// `;`: run no matter what. The first group of a line is always `End`.
    End,
}

/// One command of the line: its argument vector and how it joins the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub action: Action,
    pub args: Vec<String>,
}

impl Group {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            args: Vec::new(),
        }
    }

    /// Convenience constructor, mostly for tests.
    pub fn with_args(action: Action, args: &[&str]) -> Self {
        Self {
            action,
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// The command name, i.e. the first argument.
    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

struct GroupBuilder<'a> {
    zipper: Zipper<'a>,
    groups: Vec<Group>,
}

impl<'a> GroupBuilder<'a> {
    fn from(line: &'a Line) -> Self {
        GroupBuilder {
            zipper: line.zipper(),
            groups: Vec::new(),
        }
    }

    fn build(mut self) -> Result<Vec<Group>, LineError> {
        if self.zipper.is_empty() {
            return Ok(self.groups);
        }

        self.groups.push(Group::new(Action::End));
        for zipper in self.zipper.iter() {
            if zipper.is_string() {
                self.push_string(zipper);
            } else if zipper.is_action() {
                self.push_action(zipper)?;
            } else if zipper.is_unterminated_string() {
                return Err(error_at(zipper, Reason::UnterminatedString));
            } else if zipper.is_partial_action() {
                let got = zipper.raw().to_string();
                return Err(error_at(
                    zipper,
                    Reason::PartialAction {
                        expected: got.repeat(2),
                        got,
                    },
                ));
            }
        }

        Ok(self.groups)
    }

    /// Adds the string as a new argument, or splices it onto the previous one when no
    /// whitespace separates them (`a'b'c` is the single argument `abc`).
    fn push_string(&mut self, zipper: Zipper<'a>) {
        let content = zipper.content();
        let adjacent = zipper.before().is_string() && zipper.gap_to_prev() == 0;
        // build() opens the first group before any token is visited
        let Some(group) = self.groups.last_mut() else {
            return;
        };
        match group.args.last_mut() {
            Some(previous) if adjacent => previous.push_str(content),
            _ => group.args.push(content.to_string()),
        }
    }

    fn push_action(&mut self, zipper: Zipper<'a>) -> Result<(), LineError> {
        let action = zipper.raw().to_string();
        if zipper.is_first() {
            return Err(error_at(zipper, Reason::LeadingAction { action }));
        }
        if zipper.is_last() && !zipper.is_end() {
            return Err(error_at(zipper, Reason::TrailingAction { action }));
        }
        if !zipper.before().is_string() {
            let previous = zipper.before().raw().to_string();
            return Err(error_at(zipper, Reason::MissingString { previous, action }));
        }

        if zipper.is_and() {
            self.groups.push(Group::new(Action::And));
        } else if zipper.is_or() {
            self.groups.push(Group::new(Action::Or));
        } else if !zipper.is_last() {
            self.groups.push(Group::new(Action::End));
        }
        Ok(())
    }
}

fn error_at(zipper: Zipper<'_>, reason: Reason) -> LineError {
    let span = zipper
        .token()
        .map(|token| token.span)
        .unwrap_or_default();
    LineError::new(span, reason)
}

/// Parses an already lexed line.
pub fn parse_line(line: &Line) -> Result<Vec<Group>, LineError> {
    GroupBuilder::from(line).build()
}

/// Lexes and parses `line`. A blank line yields no groups.
pub fn parse(line: &str) -> Result<Vec<Group>, LineError> {
    parse_line(&tokenize(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::token::Span;
    use proptest::prelude::*;

    fn end(args: &[&str]) -> Group {
        Group::with_args(Action::End, args)
    }

    fn and(args: &[&str]) -> Group {
        Group::with_args(Action::And, args)
    }

    fn or(args: &[&str]) -> Group {
        Group::with_args(Action::Or, args)
    }

    #[test]
    fn test_blank_line_is_a_no_op() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("  \t ").unwrap(), vec![]);
    }

    #[test]
    fn test_single_command() {
        assert_eq!(
            parse("checkout auto_update_tap").unwrap(),
            vec![end(&["checkout", "auto_update_tap"])]
        );
    }

    #[test]
    fn test_each_join_operator() {
        assert_eq!(
            parse(r#"add --all; commit -m "tmp""#).unwrap(),
            vec![end(&["add", "--all"]), end(&["commit", "-m", "tmp"])]
        );
        assert_eq!(
            parse(r#"add --all || commit -m "tmp""#).unwrap(),
            vec![end(&["add", "--all"]), or(&["commit", "-m", "tmp"])]
        );
        assert_eq!(
            parse("add file.txt && commit -m 'wip'").unwrap(),
            vec![end(&["add", "file.txt"]), and(&["commit", "-m", "wip"])]
        );
    }

    #[test]
    fn test_long_chain() {
        assert_eq!(
            parse("add ex.js && add ex.rb; diff; commit -m 'commit'").unwrap(),
            vec![
                end(&["add", "ex.js"]),
                and(&["add", "ex.rb"]),
                end(&["diff"]),
                end(&["commit", "-m", "commit"]),
            ]
        );
    }

    #[test]
    fn test_adjacent_strings_are_concatenated() {
        assert_eq!(parse("a'b'c").unwrap(), vec![end(&["abc"])]);
        assert_eq!(parse("a 'b' c").unwrap(), vec![end(&["a", "b", "c"])]);
        assert_eq!(parse(r#"foo""bar"#).unwrap(), vec![end(&["foobar"])]);
        assert_eq!(
            parse("log --author='One Punch Man'").unwrap(),
            vec![end(&["log", "--author=One Punch Man"])]
        );
    }

    #[test]
    fn test_end_of_options_is_an_argument() {
        assert_eq!(
            parse("add -- '*.js'").unwrap(),
            vec![end(&["add", "--", "*.js"])]
        );
    }

    #[test]
    fn test_trailing_semicolon_is_inert() {
        assert_eq!(parse("status;").unwrap(), parse("status").unwrap());
        assert_eq!(
            parse("grep 'rescue Github::API';").unwrap(),
            vec![end(&["grep", "rescue Github::API"])]
        );
    }

    #[test]
    fn test_leading_action() {
        for action in ["&&", "||", ";"] {
            let error = parse(&format!("{action} second third")).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Parse);
            assert_eq!(error.span, Span::new(0, action.len()));
            assert_eq!(
                error.reason.to_string(),
                format!("unexpected '{action}' to start the line")
            );
        }
    }

    #[test]
    fn test_trailing_action() {
        for action in ["&&", "||"] {
            let error = parse(&format!("first second {action}")).unwrap_err();
            assert_eq!(error.span, Span::new(13, 15));
            assert_eq!(
                error.reason.to_string(),
                format!("unexpected '{action}' to end the line")
            );
        }
    }

    #[test]
    fn test_two_actions_in_a_row() {
        for first in ["&&", "||", ";"] {
            for second in ["&&", "||", ";"] {
                let error = parse(&format!("first {first} {second} last")).unwrap_err();
                assert_eq!(error.kind(), ErrorKind::Parse);
                assert_eq!(
                    error.reason.to_string(),
                    format!("expected a string after '{first}' but got '{second}' instead")
                );
            }
        }
    }

    #[test]
    fn test_double_and_report() {
        let line = "first && && third";
        let error = parse(line).unwrap_err();
        assert_eq!(error.span, Span::new(9, 11));
        assert_eq!(
            error.render(line, false),
            "\
| error> expected a string after '&&' but got '&&' instead
|
| first && && third
|          ^^
"
        );
    }

    #[test]
    fn test_partial_action() {
        let error = parse("diff &lskdf").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.span, Span::new(5, 6));
        assert_eq!(error.reason.to_string(), "expected '&&' but got '&' instead");

        let error = parse("log | less").unwrap_err();
        assert_eq!(error.reason.to_string(), "expected '||' but got '|' instead");
    }

    #[test]
    fn test_unterminated_string() {
        let error = parse("first second \"third fourth").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.span, Span::new(13, 26));
        assert_eq!(error.reason, Reason::UnterminatedString);
    }

    #[test]
    fn test_first_offending_token_wins() {
        let error = parse("a & && b '").unwrap_err();
        assert_eq!(error.span, Span::new(2, 3));
    }

    proptest! {
        #[test]
        fn prop_parse_is_total(parts in prop::collection::vec(
            prop_oneof![
                Just("&"), Just("|"), Just(";"), Just("&&"), Just("||"), Just("--"),
                Just("'"), Just("\""), Just(" "), Just("  "), Just("push"),
                Just("commit"), Just("--stat"), Just("--no-"), Just("--color=never"),
            ],
            0..16,
        )) {
            let line = parts.concat();
            match parse(&line) {
                Ok(groups) => {
                    prop_assert!(groups.iter().all(|group| !group.args.is_empty()));
                    if let Some(first) = groups.first() {
                        prop_assert_eq!(first.action, Action::End);
                    }
                }
                Err(error) => {
                    prop_assert!(error.span.end <= line.chars().count());
                }
            }
        }

        #[test]
        fn prop_parse_never_panics_on_arbitrary_text(line in any::<String>()) {
            let _ = parse(&line);
        }
    }
}
