mod commands;
mod config;
mod script;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, init, new, show, ApplyArgs, InitArgs, NewArgs, ShowArgs};

/// Blockpad CLI - structured block documents from the terminal
#[derive(Parser, Debug)]
#[command(name = "blockpad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blockpad.config.json in the current directory
    Init(InitArgs),

    /// Create an empty document
    New(NewArgs),

    /// Print a document's block tree
    Show(ShowArgs),

    /// Run a JSON script of edit operations against a document
    Apply(ApplyArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|dir| {
            let cwd = dir.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::New(args) => new(args, &cwd),
                Command::Show(args) => show(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
