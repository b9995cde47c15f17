use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use infixcalc::calculator::copy_to_clipboard;
use infixcalc::config::{self, Config};
use infixcalc::history::History;
use infixcalc::session::{self, Reply, Session};

/// Evaluate mathematical expressions.
///
/// With no EXPRESSION, lines are read from stdin. In that mode `:mc`, `:mr`,
/// `:m+`, `:m-`, `:recall N`, `:history`, `:clear` and `:quit` are
/// available as commands.
#[derive(Parser, Debug)]
#[command(name = "infixcalc", version, about)]
struct Cli {
    /// Expression to evaluate (words are joined with spaces)
    expression: Vec<String>,

    /// Also print the postfix (RPN) form
    #[arg(long)]
    postfix: bool,

    /// Copy the last successful result to the clipboard
    #[arg(long)]
    copy: bool,

    /// Annotate stdin: lines that look like expressions get ` = result`
    #[arg(long, conflicts_with = "expression")]
    filter: bool,

    /// Print the calculation history and exit
    #[arg(long)]
    history: bool,

    /// Clear the calculation history and exit
    #[arg(long, conflicts_with = "history")]
    clear_history: bool,

    /// Do not record calculations in the history
    #[arg(long)]
    no_history: bool,

    /// Path to an alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let mut history = load_history(&config);

    if cli.history {
        println!("{}", session::format_history(&history));
        return Ok(());
    }
    if cli.clear_history {
        history.clear();
        history.save().context("failed to clear history")?;
        println!("History cleared");
        return Ok(());
    }

    let mut session = Session::new(config.display_options(), history)
        .recording(config.history.enabled && !cli.no_history)
        .show_postfix(cli.postfix);

    let outcome = if cli.filter {
        run_filter(&mut session)
    } else if cli.expression.is_empty() {
        run_interactive(&mut session)
    } else {
        run_once(&mut session, &cli.expression.join(" "))
    };
    if let Err(e) = session.save_history() {
        warn!(error = %e, "could not save history");
    }
    outcome?;

    if cli.copy {
        match session.last_clipboard() {
            Some(text) => copy_to_clipboard(text).context("failed to copy result")?,
            None => warn!("nothing to copy"),
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config::default_config_path() {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };
    debug!(path = %path.display(), "loading config");
    Config::from_file(&path).context("failed to load configuration")
}

/// Load the history, falling back to an empty one if the file is unusable.
fn load_history(config: &Config) -> History {
    let max_entries = config.history.max_entries;
    let Some(path) = config.history_path() else {
        return History::new(max_entries);
    };

    let mut history = History::with_file(max_entries, path);
    if let Err(e) = history.load() {
        warn!(error = %e, "starting with an empty history");
    }
    history
}

fn print_reply(reply: Reply) {
    match reply {
        Reply::Calculated { result, postfix } => {
            if let Some(postfix) = postfix {
                println!("postfix: {}", postfix);
            }
            if result.is_success() {
                println!("{}", result.display());
            } else {
                println!("Error: {}", result.display());
            }
        }
        Reply::Message(text) => println!("{}", text),
        Reply::Silent | Reply::Quit => {}
    }
}

fn run_once(session: &mut Session, expression: &str) -> Result<()> {
    match session.handle_line(expression) {
        Reply::Calculated { result, postfix } => {
            if let Some(postfix) = postfix {
                println!("postfix: {}", postfix);
            }
            if !result.is_success() {
                anyhow::bail!(result.display().to_string());
            }
            println!("{}", result.display());
        }
        reply => print_reply(reply),
    }
    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut stdout = io::stdout();

    let mut lines = stdin.lock().lines();
    loop {
        if prompt {
            print!("{}", session.prompt());
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read from stdin")?;

        match session.handle_line(&line) {
            Reply::Quit => break,
            reply => print_reply(reply),
        }
    }

    Ok(())
}

fn run_filter(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        println!("{}", session.annotate_line(&line));
    }
    Ok(())
}
