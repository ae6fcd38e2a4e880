//! wisp - command-line REPL and script runner for the Wisp Scheme dialect.
//!
//! Usage:
//!   wisp                 # enter the REPL
//!   wisp program.scm     # load and evaluate the file, then exit
//!   wisp program.scm -   # load the file, then enter the REPL

mod config;
mod logging;
mod repl;
mod script;

use clap::{ArgAction, Parser};
use config::Config;
use std::path::PathBuf;
use wisp_core::Interpreter;

#[derive(Parser)]
#[command(name = "wisp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small Scheme dialect interpreter", long_about = None)]
struct Cli {
    /// Source file to load.
    file: Option<PathBuf>,

    /// When given as `-` after `file`, enter the REPL after loading it.
    repl_after: Option<String>,

    /// Override the top-level prompt (default `> `).
    #[arg(long)]
    prompt1: Option<String>,

    /// Override the continuation-line prompt (default `| `).
    #[arg(long)]
    prompt2: Option<String>,

    /// Disable reading/writing the REPL history file.
    #[arg(long)]
    no_history: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::default().with_file_config();
    if let Some(prompt1) = &cli.prompt1 {
        config = config.with_prompt1(prompt1.clone());
    }
    if let Some(prompt2) = &cli.prompt2 {
        config = config.with_prompt2(prompt2.clone());
    }
    if cli.no_history {
        config = config.with_history_file(None);
    }

    let mut interp = Interpreter::new();

    match (&cli.file, cli.repl_after.as_deref()) {
        (None, _) => repl::run(&mut interp, &config)?,
        (Some(path), Some("-")) => {
            script::run_file(&mut interp, path)?;
            repl::run(&mut interp, &config)?;
        }
        (Some(path), _) => script::run_file(&mut interp, path)?,
    }

    Ok(())
}
