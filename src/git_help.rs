//! Options mined from the text of `git help --man <command>`.
//!
//! Man pages list options in an indented block under a heading or a blank line, e.g.
//!
//! ```text
//! OPTIONS
//!        -p, -u, --patch
//!            Generate patch.
//!
//!        --color[=<when>]
//!            Show colored diff.
//! ```
//!
//! Only lines in that position are considered, so dashes inside descriptions and
//! examples are not mistaken for options.

use regex::Regex;
use std::sync::LazyLock;

static OVERSTRIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x08]\x08").expect("valid regex"));
static SHORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-[a-zA-Z]").expect("valid regex"));
static LONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-(?:-[a-zA-Z]+)+").expect("valid regex"));
// `--[no-]signed` as well as the older `--[no]-signed`
static REVERSIBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--\[no-?\]-?([a-zA-Z]+(?:-[a-zA-Z]+)*)").expect("valid regex"));
static SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^,]|,\S)*").expect("valid regex"));
static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[a-zA-Z0-9]").expect("valid regex"));

const INDENT: &str = "       ";

/// One documented form of an option: `--color` with suffix `[=<when>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOption {
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHelp {
    options: Vec<HelpOption>,
}

impl GitHelp {
    pub fn parse(text: &str) -> Self {
        let text = OVERSTRIKE.replace_all(text, "");
        let mut options: Vec<HelpOption> = Vec::new();
        let mut after_break = true;

        for line in text.lines() {
            let starts_block = after_break;
            after_break = line.trim().is_empty() || line.starts_with(|c: char| c.is_ascii_uppercase());
            if !starts_block {
                continue;
            }
            let Some(rest) = line.strip_prefix(INDENT) else {
                continue;
            };
            for option in parse_option_line(rest) {
                if !options.contains(&option) {
                    options.push(option);
                }
            }
        }

        Self { options }
    }

    /// Distinct option prefixes, in the order they are documented.
    pub fn option_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = Vec::with_capacity(self.options.len());
        for option in &self.options {
            if !prefixes.contains(&option.prefix) {
                prefixes.push(option.prefix.clone());
            }
        }
        prefixes
    }

    /// The first non-empty usage suffix documented for `prefix`.
    pub fn suffix_for(&self, prefix: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.prefix == prefix && !option.suffix.is_empty())
            .map(|option| option.suffix.as_str())
    }
}

/// Parses `-p, -u, --patch` style lists. Stops at the first entry that is not an option.
fn parse_option_line(mut rest: &str) -> Vec<HelpOption> {
    let mut found = Vec::new();
    while rest.starts_with('-') {
        let (prefixes, tail) = if let Some(m) = SHORT.find(rest) {
            (vec![m.as_str().to_string()], &rest[m.end()..])
        } else if let Some(m) = LONG.find(rest) {
            (vec![m.as_str().to_string()], &rest[m.end()..])
        } else if let Some(caps) = REVERSIBLE.captures(rest) {
            let name = &caps[1];
            let end = caps.get(0).map_or(0, |m| m.end());
            (vec![format!("--{name}"), format!("--no-{name}")], &rest[end..])
        } else {
            break;
        };

        let suffix = SUFFIX.find(tail).map_or("", |m| m.as_str());
        let after = &tail[suffix.len()..];
        let suffix = suffix.trim_end();
        let suffix = if DESCRIPTION.is_match(suffix) { "" } else { suffix };
        for prefix in prefixes {
            found.push(HelpOption {
                prefix,
                suffix: suffix.to_string(),
            });
        }

        match after.strip_prefix(", ") {
            Some(next) => rest = next,
            None => break,
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF_PAGE: &str = "\
GIT-DIFF(1)                       Git Manual                       GIT-DIFF(1)

NAME
       git-diff - Show changes between commits, commit and working tree, etc

SYNOPSIS
       git diff [<options>] [<commit>] [--] [<path>...]

DESCRIPTION
       Show changes between the working tree and the index or a tree, changes
       between the index and a tree.
       -- this line is a description, not an option

OPTIONS
       -p, -u, --patch
           Generate patch (see the section called \u{201c}GENERATING PATCH TEXT WITH
           -P\u{201d}).

       -U<n>, --unified=<n>
           Generate diffs with <n> lines of context instead of the usual three.

       --stat[=<width>[,<name-width>[,<count>]]]
           Generate a diffstat.

       --color[=<when>]
           Show colored diff.

       --[no-]relative[=<path>]
           When run from a subdirectory of the project, it can be told to
           exclude changes outside the directory.
           --this-is-not-an-option

       --cached, --staged
           This form is to view the changes you staged for the next commit.

       -z Do not munge pathnames.

GIT
       Part of the git(1) suite
";

    fn prefixes() -> Vec<String> {
        GitHelp::parse(DIFF_PAGE).option_prefixes()
    }

    #[test]
    fn test_option_prefixes() {
        assert_eq!(
            prefixes(),
            vec![
                "-p",
                "-u",
                "--patch",
                "-U",
                "--unified",
                "--stat",
                "--color",
                "--relative",
                "--no-relative",
                "--cached",
                "--staged",
                "-z",
            ]
        );
    }

    #[test]
    fn test_suffixes() {
        let help = GitHelp::parse(DIFF_PAGE);
        assert_eq!(help.suffix_for("--color"), Some("[=<when>]"));
        assert_eq!(help.suffix_for("-U"), Some("<n>"));
        assert_eq!(help.suffix_for("--unified"), Some("=<n>"));
        assert_eq!(help.suffix_for("--relative"), Some("[=<path>]"));
        assert_eq!(help.suffix_for("--no-relative"), Some("[=<path>]"));
        assert_eq!(
            help.suffix_for("--stat"),
            Some("[=<width>[,<name-width>[,<count>]]]")
        );
        assert_eq!(help.suffix_for("--patch"), None);
        // plain description text is not a usage suffix
        assert_eq!(help.suffix_for("-z"), None);
    }

    #[test]
    fn test_overstrike_is_removed() {
        let help = GitHelp::parse("OPTIONS\n       -\x08--\x08-s\x08st\x08ta\x08at\x08t\n");
        assert_eq!(help.option_prefixes(), vec!["--stat"]);
    }

    #[test]
    fn test_empty_page() {
        assert!(GitHelp::parse("").option_prefixes().is_empty());
    }
}
