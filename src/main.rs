use argh::FromArgs;
use gitline::config::Flags;
use gitline::{Environment, Interpreter, Settings, output};

/// Interactive git shell. Type git subcommands without the `git` prefix and chain them
/// with `&&`, `||` and `;`.
#[derive(FromArgs)]
struct Args {
    /// print tokens, parsed groups and exit codes to stderr
    #[argh(switch)]
    debug: bool,

    /// hide warnings about history and metadata
    #[argh(switch, short = 'q')]
    quiet: bool,

    /// disable colored prompt and highlighting
    #[argh(switch)]
    no_color: bool,

    /// run a single line and exit with its status
    #[argh(option, short = 'c')]
    command: Option<String>,
}

fn main() {
    let args: Args = argh::from_env();
    let env = Environment::new();
    let flags = Flags {
        no_color: args.no_color,
        debug: args.debug,
        quiet: args.quiet,
    };
    let settings = Settings::from_environment(&env, flags);
    let mut sh = Interpreter::new(env, settings);

    let code = match args.command {
        Some(line) => sh.execute_line(&line).exit_code(),
        None => match sh.repl() {
            Ok(()) => 0,
            Err(e) => {
                output::error(format_args!("{e:#}"));
                1
            }
        },
    };
    std::process::exit(code);
}
