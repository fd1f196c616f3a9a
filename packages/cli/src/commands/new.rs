use crate::commands::resolve_path;
use crate::config::Config;
use anyhow::{bail, Result};
use blockpad_model::{Document, IdGenerator};
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Document file to create
    pub file: String,

    /// Document title
    #[arg(short, long, default_value = "Untitled")]
    pub title: String,

    /// Author (defaults to the configured author)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve_path(cwd, &args.file);

    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let author = args.author.unwrap_or(config.author);
    let id = IdGenerator::new("doc").new_id();
    let doc = Document::new(id, &args.title).with_author(author);

    fs::write(&path, doc.to_json_pretty()?)?;

    println!(
        "{} Created {} {}",
        "✓".green(),
        args.title.bright_white().bold(),
        format!("({})", doc.id).dimmed()
    );
    Ok(())
}
