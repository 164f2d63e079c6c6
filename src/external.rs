use crate::command::{CommandFactory, ExecutableCommand, RunStatus, Stdout};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::ExitStatus;

/// `git <args>`, for every line that is not an internal command.
pub struct GitCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl GitCommand {
    pub fn new(program: PathBuf, args: Vec<OsString>) -> Self {
        Self { program, args }
    }
}

impl CommandFactory for Factory<GitCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.get_var("PATH")?;
        let program = find_in_path(OsStr::new(&search_paths), OsStr::new("git"))?;
        let args = std::iter::once(name)
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect();
        Some(Box::new(GitCommand::new(program, args)))
    }
}

impl ExecutableCommand for GitCommand {
    fn execute(
        self: Box<Self>,
        stdout: Box<dyn Stdout>,
        env: &mut Environment,
    ) -> Result<RunStatus> {
        let mut command = std::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(stdout.stdio())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir);

        #[cfg(unix)]
        let _guard = interrupts::forward_to_child(&mut command);
        let exit_status = command
            .status()
            .with_context(|| format!("failed to run {}", self.program.display()))?;
        Ok(match exit_status.code() {
            Some(code) => RunStatus::Exited(code),
            None => terminated_by_signal(exit_status),
        })
    }
}

/// Ctrl-C while git runs reaches the whole foreground process group. The shell ignores it
/// and lets the child decide, then learns about it from the child's exit status.
#[cfg(unix)]
mod interrupts {
    use nix::sys::signal::{SigHandler, Signal, signal};
    use std::os::unix::process::CommandExt;
    use std::process::Command;

    pub(super) struct Guard {
        previous: Option<SigHandler>,
    }

    impl Drop for Guard {
        fn drop(&mut self) {
            if let Some(previous) = self.previous {
                // SAFETY: restores the disposition that was in place before spawning.
                let _ = unsafe { signal(Signal::SIGINT, previous) };
            }
        }
    }

    /// Ignores SIGINT in this process until the guard drops, while `command` starts
    /// with the default disposition.
    pub(super) fn forward_to_child(command: &mut Command) -> Guard {
        // SAFETY: only async-signal-safe work happens between fork and exec.
        unsafe {
            command.pre_exec(|| {
                signal(Signal::SIGINT, SigHandler::SigDfl)
                    .map(drop)
                    .map_err(std::io::Error::from)
            });
        }
        // SAFETY: SIG_IGN installs no handler code.
        let previous = unsafe { signal(Signal::SIGINT, SigHandler::SigIgn) }.ok();
        Guard { previous }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> RunStatus {
    use std::os::unix::process::ExitStatusExt;
    const SIGINT: i32 = 2;
    match ExitStatusExt::signal(&exit_status) {
        Some(SIGINT) => RunStatus::Interrupted,
        Some(signal) => RunStatus::Exited(128 + signal),
        None if ExitStatusExt::core_dumped(&exit_status) => RunStatus::Exited(255),
        None => RunStatus::Exited(-1),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> RunStatus {
    RunStatus::Exited(-1)
}

/// First regular file named `program` in the directories of `search_paths` (a PATH value).
fn find_in_path(search_paths: &OsStr, program: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
