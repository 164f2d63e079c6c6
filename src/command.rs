use crate::env::Environment;
use anyhow::Result;
use std::io::Write;
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

pub const SUCCESS_CODE: ExitCode = 0;
pub const FAILURE_CODE: ExitCode = 1;
/// Reported when a line is rejected before running, or a command cannot be started.
pub const NOT_FOUND_CODE: ExitCode = 127;

/// How a single command invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The command ran to completion (or was killed by a signal other than SIGINT).
    Exited(ExitCode),
    /// The user interrupted the command. Evaluation of the line stops.
    Interrupted,
}

/// Runs one command group. The executor calls this once per group it does not skip.
///
/// Implementations must not fail on a non-zero exit status, and must report commands
/// that cannot be started as a non-zero [`RunStatus::Exited`].
pub trait CommandRunner {
    fn run(&mut self, args: &[String]) -> RunStatus;
}

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// A blanket implementation exists for any type that implements `Write` and `Into<Stdio>`
/// (e.g. `Stdout` or `Stderr`).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Object-safe trait for any command the shell can dispatch: internal commands and git.
pub trait ExecutableCommand {
    fn execute(self: Box<Self>, stdout: Box<dyn Stdout>, env: &mut Environment)
    -> Result<RunStatus>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
