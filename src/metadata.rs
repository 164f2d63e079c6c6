//! What the completer and the highlighter need to know about the repository.

/// Read-only view of git metadata.
///
/// Every method is a query. The `prefix` and `limit` arguments are hints: callers
/// filter and truncate the results themselves, so implementations may return more.
pub trait Metadata {
    /// Git commands, aliases and internal commands.
    fn command_names(&self) -> Vec<String>;

    fn is_command(&self, name: &str) -> bool {
        self.command_names().iter().any(|command| command == name)
    }

    /// Options accepted by `command`, e.g. `--stat` or `-p`.
    fn option_prefixes(&self, command: &str) -> Vec<String>;

    /// Usage tail shown after an option, e.g. `=<when>` for `--color`.
    fn option_suffix(&self, command: &str, option: &str) -> Option<String>;

    fn branch_names(&self, prefix: &str, limit: usize) -> Vec<String>;

    fn staged_files(&self, prefix: &str, limit: usize) -> Vec<String>;

    fn unstaged_files(&self, prefix: &str, limit: usize) -> Vec<String>;

    /// Paths below the directory part of a `./` prefix, returned with the `./` kept.
    /// Directories end with `/`.
    fn file_paths(&self, prefix: &str, limit: usize) -> Vec<String>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::Metadata;
    use std::collections::HashMap;

    /// In-memory metadata for completion and highlighting tests.
    #[derive(Default)]
    pub(crate) struct FakeMetadata {
        pub commands: Vec<String>,
        pub options: HashMap<String, Vec<(String, String)>>,
        pub branches: Vec<String>,
        pub staged: Vec<String>,
        pub unstaged: Vec<String>,
        pub files: Vec<String>,
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    impl FakeMetadata {
        pub(crate) fn new() -> Self {
            let mut fake = Self {
                commands: owned(&[
                    "add", "branch", "checkout", "cherry-pick", "commit", "diff", "log",
                    "merge", "rebase", "reset", "restore", "rm", "status", "switch", ":alias",
                    ":commands", ":exit", ":history",
                ]),
                branches: owned(&["main", "feature/completion", "fix-prompt"]),
                staged: owned(&["src/lib.rs", "README.md"]),
                unstaged: owned(&["src/main.rs", "Cargo.toml", "notes.txt"]),
                files: owned(&["./src/", "./Cargo.toml", "./README.md"]),
                ..Default::default()
            };
            fake.with_options(
                "diff",
                &[
                    ("--stat", "[=<width>]"),
                    ("--staged", ""),
                    ("--cached", ""),
                    ("--color", "[=<when>]"),
                    ("-p", ""),
                ],
            );
            fake.with_options("commit", &[("-m", " <msg>"), ("--amend", "")]);
            fake
        }

        pub(crate) fn with_options(&mut self, command: &str, options: &[(&str, &str)]) {
            let options = options
                .iter()
                .map(|(prefix, suffix)| (prefix.to_string(), suffix.to_string()))
                .collect();
            self.options.insert(command.to_string(), options);
        }
    }

    impl Metadata for FakeMetadata {
        fn command_names(&self) -> Vec<String> {
            self.commands.clone()
        }

        fn option_prefixes(&self, command: &str) -> Vec<String> {
            self.options
                .get(command)
                .map(|options| options.iter().map(|(prefix, _)| prefix.clone()).collect())
                .unwrap_or_default()
        }

        fn option_suffix(&self, command: &str, option: &str) -> Option<String> {
            self.options
                .get(command)?
                .iter()
                .find(|(prefix, suffix)| prefix == option && !suffix.is_empty())
                .map(|(_, suffix)| suffix.clone())
        }

        fn branch_names(&self, _prefix: &str, _limit: usize) -> Vec<String> {
            self.branches.clone()
        }

        fn staged_files(&self, _prefix: &str, _limit: usize) -> Vec<String> {
            self.staged.clone()
        }

        fn unstaged_files(&self, _prefix: &str, _limit: usize) -> Vec<String> {
            self.unstaged.clone()
        }

        fn file_paths(&self, _prefix: &str, _limit: usize) -> Vec<String> {
            self.files.clone()
        }
    }
}
