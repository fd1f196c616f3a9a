use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Author recorded on new documents
    #[arg(short, long)]
    pub author: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = Config::path(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Blockpad...".bright_blue().bold());

    let config = Config {
        author: args.author.unwrap_or_default(),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Run: blockpad new notes.json --title \"Notes\"");
    println!("  2. Run: blockpad apply notes.json edits.json");
    println!("  3. Run: blockpad show notes.json");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_and_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                author: Some("ada".into()),
                force: false,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(Config::load(&cwd).unwrap().author, "ada");

        // Without --force the existing file is kept
        init(
            InitArgs {
                author: Some("bob".into()),
                force: false,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(Config::load(&cwd).unwrap().author, "ada");

        init(
            InitArgs {
                author: Some("bob".into()),
                force: true,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(Config::load(&cwd).unwrap().author, "bob");
    }
}
