//! An interactive shell for git.
//!
//! Every line is a chain of git subcommands joined with `&&`, `||` and `;`, so
//! `add -A && commit -m wip || status` runs `git add -A`, then `git commit -m wip` if
//! that worked, and `git status` otherwise. The line editor completes subcommands,
//! options, branches and paths from the repository in the current directory and
//! highlights each token as it is typed.
//!
//! The main entry point is [`Interpreter`]. The lower layers are usable on their own:
//! [`lexer`] and [`parser`] turn a line into [`parser::Group`]s, [`executor`] runs them
//! through any [`command::CommandRunner`], and [`completion`] and [`highlight`] work
//! against any [`metadata::Metadata`] source.

mod builtin;
pub mod command;
pub mod completion;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
mod external;
pub mod git;
pub mod git_help;
mod helper;
pub mod highlight;
mod history;
mod interpreter;
pub mod lexer;
pub mod metadata;
pub mod output;
pub mod parser;
pub mod prompt;
mod style;
pub mod token;
pub mod zipper;

#[cfg(test)]
mod io_adapters;

pub use config::Settings;
pub use env::Environment;
pub use executor::Outcome;
pub use interpreter::Interpreter;
