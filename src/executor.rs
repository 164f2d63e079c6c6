//! Runs the groups of a line, short-circuiting on `&&` and `||`.

use crate::command::{CommandRunner, ExitCode, NOT_FOUND_CODE, RunStatus, SUCCESS_CODE};
use crate::parser::{Action, Group, parse};
use std::io::Write;

/// Names that end the session when they appear in command position.
pub const EXIT_COMMANDS: [&str; 3] = [":exit", "exit", "quit"];

/// Result of executing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The line ran; carries the exit code of the last group that ran.
    Success(ExitCode),
    /// The line was rejected before anything ran.
    Failure(ExitCode),
    /// The user asked to leave, or interrupted a running command.
    Exit,
}

impl Outcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::Success(code) | Outcome::Failure(code) => *code,
            Outcome::Exit => SUCCESS_CODE,
        }
    }
}

pub fn is_exit_command(name: &str) -> bool {
    EXIT_COMMANDS.contains(&name)
}

/// Parses and runs `line`.
///
/// A syntax or parse error is rendered to `err` and nothing runs.
pub fn execute_line(
    line: &str,
    runner: &mut dyn CommandRunner,
    err: &mut dyn Write,
    color: bool,
) -> Outcome {
    match parse(line) {
        Ok(groups) => execute_groups(&groups, runner),
        Err(error) => {
            // nowhere left to report a failed write to stderr
            let _ = err.write_all(error.render(line, color).as_bytes());
            Outcome::Failure(NOT_FOUND_CODE)
        }
    }
}

/// Runs already parsed groups.
///
/// `||` after a success skips everything up to the next `;`, while `&&` after a
/// failure skips only its own group.
pub fn execute_groups(groups: &[Group], runner: &mut dyn CommandRunner) -> Outcome {
    let mut exit_code = SUCCESS_CODE;
    let mut skip_to_end = false;

    for group in groups {
        let skip = match group.action {
            Action::And => exit_code != SUCCESS_CODE || skip_to_end,
            Action::Or => {
                if exit_code == SUCCESS_CODE {
                    skip_to_end = true;
                }
                skip_to_end
            }
            Action::End => {
                skip_to_end = false;
                false
            }
        };
        if skip {
            continue;
        }

        if group.name().is_some_and(is_exit_command) {
            return Outcome::Exit;
        }
        match runner.run(&group.args) {
            RunStatus::Exited(code) => exit_code = code,
            RunStatus::Interrupted => return Outcome::Exit,
        }
    }

    Outcome::Success(exit_code)
}
