use crate::command::{
    CommandFactory, ExecutableCommand, ExitCode, FAILURE_CODE, RunStatus, SUCCESS_CODE, Stdout,
};
use crate::env::Environment;
use crate::git::{self, ConfigLevel};
use crate::highlight::highlight;
use crate::history::SessionHistory;
use crate::interpreter::Factory;
use crate::metadata::Metadata;
use anyhow::{Result, bail};
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::rc::Rc;

/// Static description of an internal command, used for listings and completion.
pub struct InternalCommand {
    pub name: &'static str,
    pub description: &'static str,
    /// Option prefixes with their usage suffix. `--help` is left out.
    pub options: &'static [(&'static str, &'static str)],
}

pub const INTERNAL_COMMANDS: &[InternalCommand] = &[
    InternalCommand {
        name: ":alias",
        description: "Create local and global git aliases for common command combinations.",
        options: &[
            ("--global", " <name> [<command>]"),
            ("--list", ""),
            ("--local", " <name> [<command>]"),
        ],
    },
    InternalCommand {
        name: ":commands",
        description: "List all internal and external commands along with descriptions.",
        options: &[],
    },
    InternalCommand {
        name: ":exit",
        description: "Gracefully exit the program. This is equivalent to ctrl-c or ctrl-d.",
        options: &[],
    },
    InternalCommand {
        name: ":history",
        description: "Browse your gitline shell history with syntax highlighting.",
        options: &[],
    },
];

pub fn is_internal(name: &str) -> bool {
    INTERNAL_COMMANDS.iter().any(|command| command.name == name)
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. ":alias".
    fn name() -> &'static str;

    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        mut stdout: Box<dyn Stdout>,
        env: &mut Environment,
    ) -> Result<RunStatus> {
        match <T as BuiltinCommand>::execute(*self, &mut stdout, env) {
            Ok(code) => Ok(RunStatus::Exited(code)),
            Err(e) => {
                writeln!(stdout, "error: {e}")?;
                Ok(RunStatus::Exited(FAILURE_CODE))
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        mut stdout: Box<dyn Stdout>,
        _env: &mut Environment,
    ) -> Result<RunStatus> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(RunStatus::Exited(if self.is_error {
            FAILURE_CODE
        } else {
            SUCCESS_CODE
        }))
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Create local and global git aliases for common command combinations.
/// Aliases are stored with git config, so they work outside of gitline too.
pub struct Alias {
    #[argh(switch)]
    /// list all local and global aliases.
    pub list: bool,

    #[argh(option)]
    /// set or unset a local alias for the current repo.
    pub local: Option<String>,

    #[argh(option)]
    /// set or unset a global alias for the current user.
    pub global: Option<String>,

    #[argh(positional)]
    /// the aliased command; the alias is removed when omitted.
    pub command: Option<String>,
}

impl BuiltinCommand for Alias {
    fn name() -> &'static str {
        ":alias"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match (self.list, self.local, self.global) {
            (true, None, None) => {
                if self.command.is_some() {
                    bail!("--list takes no arguments");
                }
                list_aliases(stdout, &git::aliases(env))?;
                return Ok(SUCCESS_CODE);
            }
            (false, Some(name), None) => (ConfigLevel::Local, name),
            (false, None, Some(name)) => (ConfigLevel::Global, name),
            _ => bail!("expected exactly one of --list, --local or --global"),
        };

        let (level, name) = target;
        git::set_alias(env, level, &name, self.command.as_deref())
    }
}

fn list_aliases(stdout: &mut dyn Write, aliases: &git::Aliases) -> Result<()> {
    writeln!(stdout, "---Local---")?;
    for (name, command) in &aliases.local {
        writeln!(stdout, "{name}  =>  {command}")?;
    }
    writeln!(stdout)?;
    writeln!(stdout, "---Global---")?;
    for (name, command) in &aliases.global {
        writeln!(stdout, "{name}  =>  {command}")?;
    }
    writeln!(stdout)?;
    Ok(())
}

#[derive(FromArgs)]
/// List all internal and external commands along with descriptions.
pub struct Commands {}

impl BuiltinCommand for Commands {
    fn name() -> &'static str {
        ":commands"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        write_internal_commands(stdout)?;
        let external = git::command_descriptions(env);
        if !external.is_empty() {
            writeln!(stdout)?;
            writeln!(stdout, "{external}")?;
        }
        Ok(SUCCESS_CODE)
    }
}

fn write_internal_commands(stdout: &mut dyn Write) -> Result<()> {
    writeln!(stdout, "gitline internal commands")?;
    for command in INTERNAL_COMMANDS {
        writeln!(stdout, "   {:<24}{}", command.name, command.description)?;
    }
    Ok(())
}

#[derive(FromArgs)]
/// Gracefully exit the program. This is equivalent to ctrl-c or ctrl-d.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        ":exit"
    }

    // The executor stops the line on `:exit` itself; only `help :exit` gets here.
    fn execute(self, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        Ok(SUCCESS_CODE)
    }
}

#[derive(FromArgs)]
/// Browse your gitline shell history from newest to oldest.
pub struct History {}

/// `:history` reads the session, so its factory carries one.
pub(crate) struct HistoryFactory<M> {
    history: SessionHistory,
    metadata: Rc<M>,
    color: bool,
}

impl<M> HistoryFactory<M> {
    pub(crate) fn new(history: SessionHistory, metadata: Rc<M>, color: bool) -> Self {
        Self {
            history,
            metadata,
            color,
        }
    }
}

impl<M: Metadata + 'static> CommandFactory for HistoryFactory<M> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != ":history" {
            return None;
        }
        Some(match History::from_args(&[name], args) {
            Ok(History {}) => Box::new(ShowHistory {
                entries: self.history.newest_first(),
                metadata: Rc::clone(&self.metadata),
                color: self.color,
            }),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

struct ShowHistory<M> {
    entries: Vec<String>,
    metadata: Rc<M>,
    color: bool,
}

impl<M: Metadata> ExecutableCommand for ShowHistory<M> {
    fn execute(
        self: Box<Self>,
        mut stdout: Box<dyn Stdout>,
        _env: &mut Environment,
    ) -> Result<RunStatus> {
        for line in &self.entries {
            writeln!(stdout, "> {}", highlight(line, self.metadata.as_ref(), self.color))?;
        }
        Ok(RunStatus::Exited(SUCCESS_CODE))
    }
}

/// Reports an internal command typed without its leading colon.
struct Misspelled {
    name: String,
}

impl ExecutableCommand for Misspelled {
    fn execute(
        self: Box<Self>,
        _stdout: Box<dyn Stdout>,
        _env: &mut Environment,
    ) -> Result<RunStatus> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", misspelled_message(&self.name))?;
        Ok(RunStatus::Exited(FAILURE_CODE))
    }
}

fn misspelled_message(name: &str) -> String {
    format!(
        "gitline: '{name}' is not a gitline command. See ':commands'.\n\n\
         The most similar command is\n        :{name}\n"
    )
}

/// Catches `alias` or `commands` when git has no command of that name.
pub(crate) struct MisspellFactory<M> {
    metadata: Rc<M>,
}

impl<M> MisspellFactory<M> {
    pub(crate) fn new(metadata: Rc<M>) -> Self {
        Self { metadata }
    }
}

impl<M: Metadata> CommandFactory for MisspellFactory<M> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        _args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let colon = format!(":{name}");
        if is_internal(&colon) && !self.metadata.is_command(name) {
            Some(Box::new(Misspelled {
                name: name.to_string(),
            }))
        } else {
            None
        }
    }
}
