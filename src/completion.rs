//! Tab completion for the token under the cursor.
//!
//! Only the end of the line is completed. The last token decides what is offered:
//! a command name, an option of the governing command, a `./` path, or an argument
//! that depends on the command (branches for `checkout`, unstaged files for `add`, ...).

use crate::lexer::tokenize;
use crate::metadata::Metadata;
use crate::zipper::Zipper;

/// Upper bound on the number of candidates offered at once.
pub const MAX_CANDIDATES: usize = 250;

/// Candidates for the partial token that ends the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Char offset where the partial token starts. Candidates replace everything from here.
    pub start: usize,
    pub candidates: Vec<String>,
}

/// Candidates for the end of `line`, or `None` when there is nothing to complete.
pub fn complete(line: &str, metadata: &dyn Metadata) -> Option<Vec<String>> {
    complete_at(line, metadata, MAX_CANDIDATES).map(|completion| completion.candidates)
}

pub fn complete_at(line: &str, metadata: &dyn Metadata, limit: usize) -> Option<Completion> {
    if line.chars().last().is_none_or(char::is_whitespace) {
        return None;
    }

    let line = tokenize(line);
    let last = line.zipper().last();
    if !last.is_string() {
        return None;
    }
    let partial = last.raw();
    let start = last.token()?.start();

    let found = if last.is_command() {
        if metadata.is_command(partial) {
            return None;
        }
        metadata.command_names()
    } else if last.is_option() && last.options_allowed() {
        let command = last.reverse_find(|zipper| zipper.is_command())?;
        let options = metadata.option_prefixes(command.content());
        if options.is_empty() {
            return None;
        }
        options
    } else if partial.starts_with("./") {
        metadata.file_paths(partial, limit)
    } else {
        arguments_for(last, partial, metadata, limit)?
    };

    Some(Completion {
        start,
        candidates: narrow(found, partial, limit),
    })
}

/// Arguments that make sense for the command governing `last`.
fn arguments_for(
    last: Zipper<'_>,
    partial: &str,
    metadata: &dyn Metadata,
    limit: usize,
) -> Option<Vec<String>> {
    let command = last.current_command()?;
    let seen = |flags: &[&str]| {
        let mut zipper = command.after();
        while zipper.index() < last.index() {
            if flags.iter().any(|flag| *flag == zipper.content()) {
                return true;
            }
            zipper = zipper.after();
        }
        false
    };

    match command.content() {
        "add" => Some(metadata.unstaged_files(partial, limit)),
        "checkout" | "switch" | "merge" | "rebase" | "branch" | "cherry-pick" => {
            Some(metadata.branch_names(partial, limit))
        }
        "diff" | "restore" => {
            if seen(&["--staged", "--cached"]) {
                Some(metadata.staged_files(partial, limit))
            } else {
                Some(metadata.unstaged_files(partial, limit))
            }
        }
        "reset" => Some(metadata.staged_files(partial, limit)),
        "rm" if seen(&["--cached"]) => Some(metadata.staged_files(partial, limit)),
        _ => None,
    }
}

/// Keeps candidates that start with `partial`, shortest first, then alphabetically.
pub(crate) fn narrow(mut candidates: Vec<String>, partial: &str, limit: usize) -> Vec<String> {
    candidates.retain(|candidate| candidate.starts_with(partial));
    candidates.sort_by(|a, b| {
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.cmp(b))
    });
    candidates.dedup();
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::fake::FakeMetadata;
    use proptest::prelude::*;

    fn complete_fake(line: &str) -> Option<Vec<String>> {
        complete(line, &FakeMetadata::new())
    }

    #[test]
    fn test_nothing_to_complete() {
        assert_eq!(complete_fake(""), None);
        assert_eq!(complete_fake("commit "), None);
        assert_eq!(complete_fake("status &&"), None);
        assert_eq!(complete_fake("commit -m 'wip"), None);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(
            complete_fake("c"),
            Some(vec![
                "commit".to_string(),
                "checkout".to_string(),
                "cherry-pick".to_string()
            ])
        );
        assert_eq!(
            complete_fake("status && re"),
            Some(vec![
                "reset".to_string(),
                "rebase".to_string(),
                "restore".to_string()
            ])
        );
        assert_eq!(complete_fake(":a"), Some(vec![":alias".to_string()]));
    }

    #[test]
    fn test_exact_command_is_left_alone() {
        assert_eq!(complete_fake("commit"), None);
        assert_eq!(complete_fake("status; diff"), None);
    }

    #[test]
    fn test_unknown_command_has_no_candidates() {
        assert_eq!(complete_fake("dance"), Some(vec![]));
    }

    #[test]
    fn test_options_of_governing_command() {
        assert_eq!(
            complete_fake("diff --st"),
            Some(vec!["--stat".to_string(), "--staged".to_string()])
        );
        assert_eq!(
            complete_fake("status && diff HEAD -"),
            Some(vec![
                "-p".to_string(),
                "--stat".to_string(),
                "--color".to_string(),
                "--cached".to_string(),
                "--staged".to_string(),
            ])
        );
        assert_eq!(complete_fake("commit --am"), Some(vec!["--amend".to_string()]));
    }

    #[test]
    fn test_no_options_known() {
        assert_eq!(complete_fake("log --one"), None);
    }

    #[test]
    fn test_no_options_after_end_of_options() {
        // falls through to argument completion for `add`
        assert_eq!(complete_fake("add -- -"), Some(vec![]));
        assert_eq!(complete_fake("diff -- --st"), Some(vec![]));
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            complete_fake("add ./"),
            Some(vec![
                "./src/".to_string(),
                "./README.md".to_string(),
                "./Cargo.toml".to_string(),
            ])
        );
        assert_eq!(
            complete_fake("log ./s"),
            Some(vec!["./src/".to_string()])
        );
    }

    #[test]
    fn test_unstaged_files_for_add() {
        assert_eq!(
            complete_fake("add src"),
            Some(vec!["src/main.rs".to_string()])
        );
        assert_eq!(
            complete_fake("add --all && add C"),
            Some(vec!["Cargo.toml".to_string()])
        );
    }

    #[test]
    fn test_branches() {
        for command in ["checkout", "switch", "merge", "rebase", "branch", "cherry-pick"] {
            assert_eq!(
                complete_fake(&format!("{command} f")),
                Some(vec![
                    "fix-prompt".to_string(),
                    "feature/completion".to_string()
                ]),
                "{command}"
            );
        }
    }

    #[test]
    fn test_staged_or_unstaged_for_diff() {
        assert_eq!(
            complete_fake("diff s"),
            Some(vec!["src/main.rs".to_string()])
        );
        assert_eq!(
            complete_fake("diff --staged s"),
            Some(vec!["src/lib.rs".to_string()])
        );
        assert_eq!(
            complete_fake("restore --cached R"),
            Some(vec!["README.md".to_string()])
        );
        // a flag from the previous group does not count
        assert_eq!(
            complete_fake("diff --cached; diff s"),
            Some(vec!["src/main.rs".to_string()])
        );
    }

    #[test]
    fn test_staged_files_for_reset_and_rm() {
        assert_eq!(
            complete_fake("reset s"),
            Some(vec!["src/lib.rs".to_string()])
        );
        assert_eq!(
            complete_fake("rm --cached s"),
            Some(vec!["src/lib.rs".to_string()])
        );
        assert_eq!(complete_fake("rm s"), None);
    }

    #[test]
    fn test_other_commands_have_no_arguments() {
        assert_eq!(complete_fake("log ma"), None);
    }

    #[test]
    fn test_start_offset() {
        let completion = complete_at("status && diff --st", &FakeMetadata::new(), 10).unwrap();
        assert_eq!(completion.start, 15);

        let completion = complete_at("añadir && c", &FakeMetadata::new(), 10).unwrap();
        assert_eq!(completion.start, 10);
    }

    #[test]
    fn test_limit_and_dedup() {
        let mut fake = FakeMetadata::new();
        fake.branches = (0..400).map(|n| format!("b{n}")).collect();
        fake.branches.push("b1".to_string());
        let candidates = complete("checkout b", &fake).unwrap();
        assert_eq!(candidates.len(), MAX_CANDIDATES);
        assert_eq!(candidates[..3], ["b0", "b1", "b2"]);
        assert_eq!(candidates.iter().filter(|name| *name == "b1").count(), 1);
    }

    proptest! {
        #[test]
        fn prop_candidates_extend_the_partial_token(
            prefix in prop_oneof![
                Just(""), Just("c"), Just("re"), Just("diff -"), Just("diff --"),
                Just("checkout "), Just("add ./"), Just("diff --cached "), Just("x && s"),
            ],
            suffix in "[a-z]{0,2}",
        ) {
            let line = format!("{prefix}{suffix}");
            let fake = FakeMetadata::new();
            if let Some(completion) = complete_at(&line, &fake, MAX_CANDIDATES) {
                let partial: String = line.chars().skip(completion.start).collect();
                let mut previous: Option<&String> = None;
                for candidate in &completion.candidates {
                    prop_assert!(candidate.starts_with(&partial));
                    if let Some(previous) = previous {
                        let key = |text: &String| (text.chars().count(), text.clone());
                        prop_assert!(key(previous) < key(candidate));
                    }
                    previous = Some(candidate);
                }
            }
        }
    }
}
