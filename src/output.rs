//! Diagnostics written to stderr.
//!
//! Debug lines are only printed when the shell runs with `--debug` or
//! `GITLINE_DEBUG` set, and never interleave with git's own stdout.

use std::fmt::Display;

/// How much the shell reports about itself on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet`: errors only
    Quiet,
    /// Errors and warnings
    Normal,
    /// Also traces tokens, groups, runs and metadata loads
    Debug,
}

impl Verbosity {
    /// `--quiet` takes precedence over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("gitline: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("gitline: warning: {}", message);
    }
}
