//! Git command execution and the metadata the shell derives from it.
//!
//! Every query goes through [`run_git`], which captures stdout and never fails: a
//! missing binary or a non-zero exit simply yields an unsuccessful [`GitOutput`].
//! [`GitMetadata`] caches the answers for the line editor until [`GitMetadata::clear`].

use crate::builtin::INTERNAL_COMMANDS;
use crate::command::{ExitCode, FAILURE_CODE};
use crate::completion::narrow;
use crate::env::Environment;
use crate::git_help::GitHelp;
use crate::metadata::Metadata;
use crate::output::{self, Verbosity};
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::process::{Command, Stdio};
use std::rc::Rc;
use std::sync::LazyLock;

static ALIAS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scope>local|global)\s+alias\.(?P<name>\S+)\s+(?P<command>.+)$")
        .expect("valid regex")
});

#[derive(Debug, Clone)]
pub struct GitOutput {
    pub ok: bool,
    pub stdout: String,
}

impl GitOutput {
    /// Non-empty, trimmed lines of stdout. Empty when the command failed.
    pub fn lines(&self) -> Vec<String> {
        if !self.ok {
            return Vec::new();
        }
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn git(env: &Environment) -> Command {
    let mut command = Command::new("git");
    command
        .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&env.current_dir);
    command
}

fn capture(command: &mut Command) -> GitOutput {
    let output = command
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) => GitOutput {
            ok: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        },
        Err(_) => GitOutput {
            ok: false,
            stdout: String::new(),
        },
    }
}

/// Runs `git <args>` with stdin closed and stderr discarded.
pub fn run_git(env: &Environment, args: &[&str]) -> GitOutput {
    capture(git(env).args(args))
}

pub fn is_repo(env: &Environment) -> bool {
    run_git(env, &["rev-parse", "--is-inside-work-tree"])
        .stdout
        .trim()
        == "true"
}

pub fn current_branch(env: &Environment) -> Option<String> {
    let output = run_git(env, &["rev-parse", "--abbrev-ref", "HEAD"]);
    let branch = output.stdout.trim();
    (output.ok && !branch.is_empty()).then(|| branch.to_string())
}

/// `git status --porcelain` lines.
pub fn status_lines(env: &Environment) -> Vec<String> {
    let output = run_git(env, &["status", "--porcelain"]);
    if !output.ok {
        return Vec::new();
    }
    // the leading status column is significant, so no trimming here
    output
        .stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Porcelain commands such as `commit` and `log`, without helpers.
pub fn command_names(env: &Environment) -> Vec<String> {
    run_git(env, &["--list-cmds=main,nohelpers"]).lines()
}

/// The raw `git help --all` listing.
pub fn command_descriptions(env: &Environment) -> String {
    run_git(env, &["help", "--all"]).stdout.trim().to_string()
}

/// The man page text for `command`, rendered without a pager.
pub fn help_page(env: &Environment, command: &str) -> Option<String> {
    let output = capture(
        git(env)
            .args(["help", "--man", command])
            .env("MANPAGER", "cat")
            .env("PAGER", "cat")
            .env_remove("MAN_KEEP_FORMATTING"),
    );
    let text = output.stdout.trim();
    (output.ok && !text.is_empty()).then(|| text.to_string())
}

pub fn branch_names(env: &Environment) -> Vec<String> {
    run_git(env, &["branch", "--format=%(refname:short)"]).lines()
}

pub fn staged_files(env: &Environment) -> Vec<String> {
    run_git(env, &["diff", "--name-only", "--cached"]).lines()
}

pub fn unstaged_files(env: &Environment) -> Vec<String> {
    run_git(
        env,
        &["ls-files", "--modified", "--others", "--exclude-standard"],
    )
    .lines()
}

/// Lists the directory named by a `./` prefix. `./src/ma` lists `./src/`.
pub fn file_paths(env: &Environment, prefix: &str) -> Vec<String> {
    let dir = match prefix.rfind('/') {
        Some(slash) => &prefix[..=slash],
        None => return Vec::new(),
    };
    let Ok(entries) = fs::read_dir(env.current_dir.join(dir)) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
            if is_dir {
                format!("{dir}{name}/")
            } else {
                format!("{dir}{name}")
            }
        })
        .collect()
}

/// Git aliases by config scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    pub local: BTreeMap<String, String>,
    pub global: BTreeMap<String, String>,
}

impl Aliases {
    /// Parses `git config --show-scope --get-regexp ^alias\.` output.
    pub fn parse(text: &str) -> Self {
        let mut aliases = Aliases::default();
        for caps in text.lines().filter_map(|line| ALIAS_LINE.captures(line)) {
            let scope = match &caps["scope"] {
                "local" => &mut aliases.local,
                _ => &mut aliases.global,
            };
            scope.insert(caps["name"].to_string(), caps["command"].trim().to_string());
        }
        aliases
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.local.keys().chain(self.global.keys()).cloned().collect();
        names.sort();
        names.dedup();
        names
    }

    fn scope(&self, level: ConfigLevel) -> &BTreeMap<String, String> {
        match level {
            ConfigLevel::Local => &self.local,
            ConfigLevel::Global => &self.global,
        }
    }
}

pub fn aliases(env: &Environment) -> Aliases {
    let output = run_git(
        env,
        &["config", "--show-scope", "--get-regexp", r"^alias\."],
    );
    if output.ok {
        Aliases::parse(&output.stdout)
    } else {
        Aliases::default()
    }
}

/// Where `git config` writes an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    Local,
    Global,
}

impl ConfigLevel {
    fn flag(self) -> &'static str {
        match self {
            ConfigLevel::Local => "--local",
            ConfigLevel::Global => "--global",
        }
    }
}

/// Sets `alias.<name>`, or unsets it when `command` is `None`.
///
/// `git config` reports its own errors on the inherited stderr.
pub fn set_alias(
    env: &Environment,
    level: ConfigLevel,
    name: &str,
    command: Option<&str>,
) -> Result<ExitCode> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        bail!("alias name must not be empty or include whitespace");
    }

    let key = format!("alias.{name}");
    let mut config = git(env);
    config.arg("config").arg(level.flag());
    match command {
        Some(command) => {
            config.arg(&key).arg(command);
        }
        None => {
            if !aliases(env).scope(level).contains_key(name) {
                bail!("can't delete nonexistent {} alias: {name}", level.flag());
            }
            config.arg("--unset").arg(&key);
        }
    }

    let status = config
        .status()
        .with_context(|| format!("failed to run git config for {key}"))?;
    Ok(status.code().unwrap_or(FAILURE_CODE))
}

/// Cached git metadata for completion and highlighting.
///
/// Help pages never change during a session and are kept for good; everything else
/// is dropped by [`GitMetadata::clear`] after each executed line.
pub struct GitMetadata {
    env: Environment,
    verbosity: Verbosity,
    commands: RefCell<Option<Rc<Vec<String>>>>,
    git_commands: RefCell<Option<Rc<Vec<String>>>>,
    help: RefCell<HashMap<String, Rc<GitHelp>>>,
    branches: RefCell<Option<Rc<Vec<String>>>>,
    staged: RefCell<Option<Rc<Vec<String>>>>,
    unstaged: RefCell<Option<Rc<Vec<String>>>>,
}

impl GitMetadata {
    pub fn new(env: Environment, verbosity: Verbosity) -> Self {
        Self {
            env,
            verbosity,
            commands: RefCell::new(None),
            git_commands: RefCell::new(None),
            help: RefCell::new(HashMap::new()),
            branches: RefCell::new(None),
            staged: RefCell::new(None),
            unstaged: RefCell::new(None),
        }
    }

    pub fn clear(&self) {
        output::debug("clearing git metadata", self.verbosity);
        self.commands.replace(None);
        self.git_commands.replace(None);
        self.branches.replace(None);
        self.staged.replace(None);
        self.unstaged.replace(None);
    }

    fn cached(
        &self,
        cell: &RefCell<Option<Rc<Vec<String>>>>,
        what: &str,
        load: impl FnOnce(&Environment) -> Vec<String>,
    ) -> Rc<Vec<String>> {
        if let Some(values) = cell.borrow().as_ref() {
            return Rc::clone(values);
        }
        output::debug(format!("loading {what}"), self.verbosity);
        let values = Rc::new(load(&self.env));
        cell.replace(Some(Rc::clone(&values)));
        values
    }

    fn all_commands(&self) -> Rc<Vec<String>> {
        self.cached(&self.commands, "command names", |env| {
            let mut names = command_names(env);
            names.extend(aliases(env).names());
            names.extend(INTERNAL_COMMANDS.iter().map(|command| command.name.to_string()));
            names
        })
    }

    fn git_commands(&self) -> Rc<Vec<String>> {
        self.cached(&self.git_commands, "git commands", command_names)
    }

    fn help(&self, command: &str) -> Option<Rc<GitHelp>> {
        if !self.git_commands().iter().any(|name| name == command) {
            return None;
        }
        if let Some(help) = self.help.borrow().get(command) {
            return Some(Rc::clone(help));
        }
        output::debug(format!("loading help page for {command}"), self.verbosity);
        let help = Rc::new(
            help_page(&self.env, command)
                .map(|text| GitHelp::parse(&text))
                .unwrap_or_default(),
        );
        self.help
            .borrow_mut()
            .insert(command.to_string(), Rc::clone(&help));
        Some(help)
    }
}

impl Metadata for GitMetadata {
    fn command_names(&self) -> Vec<String> {
        self.all_commands().as_ref().clone()
    }

    fn is_command(&self, name: &str) -> bool {
        self.all_commands().iter().any(|command| command == name)
    }

    fn option_prefixes(&self, command: &str) -> Vec<String> {
        if let Some(internal) = INTERNAL_COMMANDS.iter().find(|c| c.name == command) {
            return internal
                .options
                .iter()
                .map(|(prefix, _)| prefix.to_string())
                .collect();
        }
        self.help(command)
            .map(|help| help.option_prefixes())
            .unwrap_or_default()
    }

    fn option_suffix(&self, command: &str, option: &str) -> Option<String> {
        if let Some(internal) = INTERNAL_COMMANDS.iter().find(|c| c.name == command) {
            return internal
                .options
                .iter()
                .find(|(prefix, suffix)| *prefix == option && !suffix.is_empty())
                .map(|(_, suffix)| suffix.to_string());
        }
        self.help(command)?.suffix_for(option).map(str::to_string)
    }

    fn branch_names(&self, prefix: &str, limit: usize) -> Vec<String> {
        let names = self.cached(&self.branches, "branches", branch_names);
        narrow(names.as_ref().clone(), prefix, limit)
    }

    fn staged_files(&self, prefix: &str, limit: usize) -> Vec<String> {
        let files = self.cached(&self.staged, "staged files", staged_files);
        narrow(files.as_ref().clone(), prefix, limit)
    }

    fn unstaged_files(&self, prefix: &str, limit: usize) -> Vec<String> {
        let files = self.cached(&self.unstaged, "unstaged files", unstaged_files);
        narrow(files.as_ref().clone(), prefix, limit)
    }

    fn file_paths(&self, prefix: &str, limit: usize) -> Vec<String> {
        narrow(file_paths(&self.env, prefix), prefix, limit)
    }
}
