//! Shell history: the entries of the current session and the file they persist to.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Lines entered so far, oldest first, shared between the editor loop and `:history`.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionHistory {
    entries: Rc<RefCell<Vec<String>>>,
}

impl SessionHistory {
    /// Replaces the entries with the lines of a history file.
    pub(crate) fn load(&self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read history file {}", path.display()))?;
        *self.entries.borrow_mut() = text.lines().map(str::to_string).collect();
        Ok(())
    }

    /// Adds `line` unless it repeats the newest entry.
    pub(crate) fn push(&self, line: &str) {
        let mut entries = self.entries.borrow_mut();
        if entries.last().is_none_or(|last| last != line) {
            entries.push(line.to_string());
        }
    }

    pub(crate) fn newest_first(&self) -> Vec<String> {
        self.entries.borrow().iter().rev().cloned().collect()
    }
}

/// Lines that ran are appended to the history file, one per line.
pub(crate) struct HistoryFile {
    path: Option<PathBuf>,
    last: Option<String>,
}

impl HistoryFile {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path, last: None }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends `line` unless it repeats the previous entry.
    pub(crate) fn append(&mut self, line: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if self.last.as_deref() == Some(line) {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("can't create {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("can't open history file {}", path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("can't write history file {}", path.display()))?;
        self.last = Some(line.to_string());
        Ok(())
    }
}
