use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// User-level view of the process environment.
///
/// Child processes receive `vars` and run in `current_dir`. Settings such as
/// `NO_COLOR` are read from here rather than from the global process state, so tests
/// can build an environment by hand.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The working directory for git and for file completion.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// An environment with no variables, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            current_dir: current_dir.into(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// True if the variable is set to something other than an empty string or `0`.
    pub fn flag(&self, key: &str) -> bool {
        self.vars
            .get(key)
            .is_some_and(|value| !value.is_empty() && value != "0")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
