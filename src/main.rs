//! ghlink - GitHub permalinks from the command line
//!
//! Prints a link to a line range of a file at the commit currently checked
//! out, and copies it to the clipboard.

mod adapters;
mod app;
mod config;
mod domain;
mod logging;
mod ports;

use adapters::{ArboardClipboard, ConsoleNotifier, Git2Lookup, GitCliLookup};
use anyhow::{anyhow, Result};
use app::{App, Outcome};
use clap::Parser;
use config::{Backend, Settings};
use domain::LineRange;
use ports::{Clipboard, RepositoryLookup};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ghlink")]
#[command(about = "Copy a GitHub permalink to lines of a file at the current commit")]
#[command(version)]
struct Args {
    /// File to link to
    file: PathBuf,

    /// Lines to select, one-indexed: 12, 12-20 or L12-L20 (default: 1)
    #[arg(short, long, default_value = "1")]
    lines: LineRange,

    /// Print the link without copying it to the clipboard
    #[arg(long)]
    no_copy: bool,

    /// Print a JSON object instead of the bare link
    #[arg(long)]
    json: bool,

    /// How to read repository state (default: $GHLINK_BACKEND, config file, then git2)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Suppress informational messages on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let settings = Settings::load(args.backend, args.no_copy).map_err(|e| anyhow!(e))?;
    debug!(?settings, "loaded settings");

    let lookup: Box<dyn RepositoryLookup> = match settings.backend {
        Backend::Git2 => Box::new(Git2Lookup::new()),
        Backend::GitCli => Box::new(GitCliLookup::new()),
    };
    let clipboard: Option<Box<dyn Clipboard>> = if settings.clipboard {
        Some(Box::new(ArboardClipboard::new()))
    } else {
        None
    };
    let notifier = ConsoleNotifier { quiet: args.quiet };

    let mut app = App::new(lookup, clipboard, Box::new(notifier), args.json);
    let outcome = app.copy_permalink(&args.file, args.lines, &mut io::stdout().lock())?;

    Ok(match outcome {
        Outcome::Linked { permalink, copied } => {
            debug!(%permalink, copied, "permalink ready");
            ExitCode::SUCCESS
        }
        Outcome::Rejected => ExitCode::FAILURE,
    })
}
