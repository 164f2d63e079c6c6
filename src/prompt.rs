//! The `gitline(main|●1+2)[1]> ` prompt.

use crate::command::{ExitCode, SUCCESS_CODE};
use crate::env::Environment;
use crate::git;
use crate::style::{self, Color};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub branch: String,
    pub staged: usize,
    pub unstaged: usize,
}

impl RepoStatus {
    /// Counts porcelain lines: an uppercase index column means staged, an uppercase
    /// worktree column means unstaged. `??` lines count as neither.
    pub fn from_porcelain(branch: impl Into<String>, lines: &[String]) -> Self {
        let column = |line: &String, n: usize| {
            line.chars().nth(n).is_some_and(|c| c.is_ascii_uppercase())
        };
        Self {
            branch: branch.into(),
            staged: lines.iter().filter(|&line| column(line, 0)).count(),
            unstaged: lines.iter().filter(|&line| column(line, 1)).count(),
        }
    }
}

/// Status of the repository containing `env.current_dir`, if any.
pub fn query(env: &Environment) -> Option<RepoStatus> {
    if !git::is_repo(env) {
        return None;
    }
    let branch = git::current_branch(env)?;
    Some(RepoStatus::from_porcelain(branch, &git::status_lines(env)))
}

pub fn render(status: Option<&RepoStatus>, exit_code: ExitCode, color: bool) -> String {
    let paint = |text: &str, hue: Color| {
        if color {
            style::paint(text, hue)
        } else {
            text.to_string()
        }
    };

    let mut prompt = paint("gitline", Color::Aqua);
    if let Some(status) = status {
        prompt.push('(');
        prompt.push_str(&paint(&status.branch, Color::SlateBlue));
        prompt.push('|');
        if status.staged == 0 && status.unstaged == 0 {
            prompt.push_str(&paint("✔", Color::Green));
        }
        if status.staged > 0 {
            prompt.push_str(&paint(&format!("●{}", status.staged), Color::YellowGreen));
        }
        if status.unstaged > 0 {
            prompt.push_str(&paint(&format!("+{}", status.unstaged), Color::Blue));
        }
        prompt.push(')');
    }
    if exit_code != SUCCESS_CODE {
        prompt.push_str(&paint(&format!("[{exit_code}]"), Color::Crimson));
    }
    prompt.push_str("> ");
    prompt
}
