use crate::builtin::{Alias, Commands, Exit, HistoryFactory, MisspellFactory, is_internal};
use crate::command::{
    CommandFactory, CommandRunner, ExitCode, NOT_FOUND_CODE, RunStatus, SUCCESS_CODE, Stdout,
};
use crate::config::Settings;
use crate::env::Environment;
use crate::executor::{self, Outcome};
use crate::external::GitCommand;
use crate::git::GitMetadata;
use crate::helper::ShellHelper;
use crate::history::{HistoryFile, SessionHistory};
use crate::lexer::tokenize;
use crate::output::{self, Verbosity};
use crate::parser::parse;
use crate::prompt;
use anyhow::Result;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};
use std::rc::Rc;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: builtins and git itself.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The gitline shell: runs lines of `&&`, `||` and `;` separated git commands.
///
/// The interpreter owns the [`Environment`] and a list of [`CommandFactory`] objects
/// that are queried in order to create each command. Internal commands come first,
/// anything else is handed to git.
///
/// Example
/// ```no_run
/// use gitline::{Environment, Interpreter, Outcome, Settings};
/// let env = Environment::new();
/// let settings = Settings::from_environment(&env, Default::default());
/// let mut sh = Interpreter::new(env, settings);
/// assert!(matches!(sh.execute_line("status --short"), Outcome::Success(_)));
/// ```
pub struct Interpreter {
    env: Environment,
    settings: Settings,
    metadata: Rc<GitMetadata>,
    history: SessionHistory,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    pub fn new(env: Environment, settings: Settings) -> Self {
        let metadata = Rc::new(GitMetadata::new(env.clone(), settings.verbosity));
        let history = SessionHistory::default();
        let commands: Vec<Box<dyn CommandFactory>> = vec![
            Box::new(Factory::<Alias>::default()),
            Box::new(Factory::<Commands>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(HistoryFactory::new(
                history.clone(),
                Rc::clone(&metadata),
                settings.color,
            )),
            Box::new(MisspellFactory::new(Rc::clone(&metadata))),
            Box::new(Factory::<GitCommand>::default()),
        ];
        Self::with_commands(env, settings, metadata, history, commands)
    }

    /// Create an interpreter with a custom set of command factories.
    pub(crate) fn with_commands(
        env: Environment,
        settings: Settings,
        metadata: Rc<GitMetadata>,
        history: SessionHistory,
        commands: Vec<Box<dyn CommandFactory>>,
    ) -> Self {
        Self {
            env,
            settings,
            metadata,
            history,
            commands,
        }
    }

    /// Runs one line and drops cached metadata, since the line may have changed it.
    pub fn execute_line(&mut self, line: &str) -> Outcome {
        let verbosity = self.settings.verbosity;
        if verbosity == Verbosity::Debug {
            output::debug(format_args!("tokens: {:?}", tokenize(line).tokens()), verbosity);
            output::debug(format_args!("groups: {:?}", parse(line)), verbosity);
        }

        let color = self.settings.color;
        let outcome = executor::execute_line(line, self, &mut std::io::stderr(), color);
        output::debug(format_args!("outcome: {outcome:?}"), verbosity);
        self.metadata.clear();
        outcome
    }

    /// Find a factory for `args` and run the command it creates.
    fn dispatch(&mut self, args: &[String], stdout: Box<dyn Stdout>) -> RunStatus {
        let args: Vec<&str> = match args {
            // `help :alias` shows the internal command's own usage
            [help, name] if help == "help" && is_internal(name) => vec![name, "--help"],
            _ => args.iter().map(String::as_str).collect(),
        };
        let Some((name, rest)) = args.split_first() else {
            return RunStatus::Exited(SUCCESS_CODE);
        };

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, rest) {
                return match cmd.execute(stdout, &mut self.env) {
                    Ok(status) => status,
                    Err(e) => {
                        output::error(format_args!("{e:#}"));
                        RunStatus::Exited(NOT_FOUND_CODE)
                    }
                };
            }
        }
        output::error(format_args!("{name}: command not found"));
        RunStatus::Exited(NOT_FOUND_CODE)
    }

    /// Read-Eval-Print Loop with completion, highlighting and persistent history.
    pub fn repl(&mut self) -> Result<()> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .history_ignore_dups(true)?
            .build();
        let mut rl: Editor<ShellHelper<GitMetadata>, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(ShellHelper::new(
            Rc::clone(&self.metadata),
            self.settings.color,
            self.settings.completion_limit,
        )));

        let mut history = HistoryFile::new(self.settings.history_path.clone());
        if let Some(path) = history.path().filter(|path| path.exists()) {
            let loaded = rl
                .load_history(path)
                .map_err(anyhow::Error::from)
                .and_then(|()| self.history.load(path));
            if let Err(e) = loaded {
                output::warn(
                    format_args!("can't load history from {}: {e:#}", path.display()),
                    self.settings.verbosity,
                );
            }
        }

        let mut exit_code: ExitCode = SUCCESS_CODE;
        loop {
            let status = prompt::query(&self.env);
            let prompt = prompt::render(status.as_ref(), exit_code, self.settings.color);
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    let outcome = self.execute_line(&line);
                    self.history.push(&line);
                    match outcome {
                        Outcome::Exit => break,
                        Outcome::Success(code) => {
                            if let Err(e) = history.append(&line) {
                                output::warn(format_args!("{e:#}"), self.settings.verbosity);
                            }
                            exit_code = code;
                        }
                        Outcome::Failure(code) => exit_code = code,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        println!("Have a nice day!");
        Ok(())
    }
}

impl CommandRunner for Interpreter {
    fn run(&mut self, args: &[String]) -> RunStatus {
        output::debug(format_args!("run: {args:?}"), self.settings.verbosity);
        let status = self.dispatch(args, Box::new(std::io::stdout()));
        output::debug(format_args!("status: {status:?}"), self.settings.verbosity);
        status
    }
}
