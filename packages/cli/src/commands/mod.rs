pub mod apply;
pub mod init;
pub mod new;
pub mod show;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use show::{show, ShowArgs};

use anyhow::{Context, Result};
use blockpad_model::Document;
use std::path::{Path, PathBuf};

/// Resolve a user-supplied path against the working directory
pub fn resolve_path(cwd: &str, file: &str) -> PathBuf {
    Path::new(cwd).join(file)
}

pub fn load_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Document::from_json(&json).with_context(|| format!("Invalid document {}", path.display()))
}

pub fn write_document(path: &Path, doc: &Document) -> Result<()> {
    std::fs::write(path, doc.to_json_pretty()?)
        .with_context(|| format!("Cannot write {}", path.display()))
}
