use crate::commands::{load_document, resolve_path, write_document};
use crate::config::Config;
use crate::script::{parse_script, ScriptSession, StepOutcome};
use anyhow::{Context, Result};
use blockpad_editor::{Editor, EventLog, TracingObserver};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Document file to edit
    pub file: String,

    /// JSON script of edit operations
    pub script: String,

    /// Write the result here instead of over the input
    #[arg(short, long)]
    pub out: Option<String>,

    /// Run the script without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log every change event through tracing
    #[arg(long)]
    pub trace: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = resolve_path(cwd, &args.file);
    let doc = load_document(&input)?;

    let script_path = resolve_path(cwd, &args.script);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read {}", script_path.display()))?;
    let ops = parse_script(&script)
        .with_context(|| format!("Invalid script {}", script_path.display()))?;

    println!(
        "{} {} ({} operations)",
        "✏️".bright_blue(),
        doc.title.bright_white().bold(),
        ops.len()
    );

    let mut editor = Editor::with_config(doc, config.editor);
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));
    if args.trace {
        editor.subscribe(Box::new(TracingObserver));
    }

    let mut session = ScriptSession::new(editor);
    let outcomes = session.run_all(ops)?;

    for outcome in &outcomes {
        println!("{}", describe(outcome));
    }

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for name in log.names() {
        *counts.entry(name).or_default() += 1;
    }

    println!();
    if counts.is_empty() {
        println!("{}", "No changes".dimmed());
    } else {
        for (name, count) in &counts {
            println!("  {} {}", format!("{count:>3}").bright_white(), name.cyan());
        }
    }

    let rejected = outcomes.iter().filter(|o| !o.applied).count();
    let undo_levels = session.editor().history().undo_levels();
    let doc = session.into_editor().into_document();

    if args.dry_run {
        println!();
        println!("{} Dry run, nothing written", "⚠️".yellow());
        return Ok(());
    }

    let output = match &args.out {
        Some(out) => resolve_path(cwd, out),
        None => input,
    };
    write_document(&output, &doc)?;

    println!();
    if rejected == 0 {
        println!(
            "{} Applied {} operations → {} {}",
            "✅".green(),
            outcomes.len(),
            output.display(),
            format!("({undo_levels} undo levels)").dimmed()
        );
    } else {
        println!(
            "{} Applied {} operations, {} rejected → {}",
            "⚠️".yellow(),
            outcomes.len() - rejected,
            rejected,
            output.display()
        );
    }

    Ok(())
}

fn describe(outcome: &StepOutcome) -> String {
    let mark = if outcome.applied { "✓".green() } else { "·".dimmed() };
    let mut line = format!("  {} {}", mark, outcome.op);

    if !outcome.created.is_empty() {
        line.push_str(&format!(" → {}", outcome.created.join(", ")).dimmed().to_string());
    }
    if !outcome.applied {
        line.push_str(&" (rejected)".dimmed().to_string());
    }
    line
}
