//! Runtime settings, resolved once at startup from the environment and the command line.

use crate::completion::MAX_CANDIDATES;
use crate::env::Environment;
use crate::output::Verbosity;
use std::path::PathBuf;

/// Switches given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub no_color: bool,
    pub debug: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub color: bool,
    pub verbosity: Verbosity,
    /// `None` when no data directory can be found; history then lives in memory only.
    pub history_path: Option<PathBuf>,
    pub completion_limit: usize,
}

impl Settings {
    /// `NO_COLOR` set to any non-empty value and `--no-color` turn color off.
    /// `GITLINE_DEBUG` and `--debug` turn on debug output, `--quiet` hides warnings.
    /// `GITLINE_HISTORY` overrides the history file location.
    pub fn from_environment(env: &Environment, flags: Flags) -> Self {
        let color = !flags.no_color && !env.get_var("NO_COLOR").is_some_and(|v| !v.is_empty());
        let debug = flags.debug || env.flag("GITLINE_DEBUG");
        let history_path = env
            .get_var("GITLINE_HISTORY")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|dir| dir.join("gitline").join("history")));

        Self {
            color,
            verbosity: Verbosity::from_flags(flags.quiet, debug),
            history_path,
            completion_limit: MAX_CANDIDATES,
        }
    }
}
