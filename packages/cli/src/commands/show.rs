use crate::commands::{load_document, resolve_path};
use anyhow::Result;
use blockpad_editor::{DocumentView, TreeNode};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Document file to print
    pub file: String,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let doc = load_document(&resolve_path(cwd, &args.file))?;
    let view = DocumentView::build(&doc);

    println!("{} {}", "📄".bright_blue(), doc.title.bright_white().bold());
    println!(
        "   {} · v{} · {}",
        doc.id.dimmed(),
        doc.version,
        if doc.author.is_empty() { "no author" } else { doc.author.as_str() }
    );
    println!();

    if view.tree.is_empty() {
        println!("{}", "   (no blocks)".dimmed());
        return Ok(());
    }

    for line in render_tree(&view.tree) {
        println!("{line}");
    }
    println!();
    println!("{} blocks", doc.len());

    Ok(())
}

/// One line per node, indented by depth
pub fn render_tree(nodes: &[TreeNode]) -> Vec<String> {
    let mut lines = Vec::new();
    for node in nodes {
        render_node(node, &mut lines);
    }
    lines
}

fn render_node(node: &TreeNode, lines: &mut Vec<String>) {
    let indent = "  ".repeat(node.depth + 1);
    let lock = if node.protected { " 🔒" } else { "" };

    lines.push(format!(
        "{}{} {} {}{}",
        indent,
        node.block_type.cyan(),
        node.id.dimmed(),
        format!("@{}", node.position).yellow(),
        lock
    ));

    for child in &node.children {
        render_node(child, lines);
    }
}
