// src/source/local.rs
// =============================================================================
// Reads a wiki that is checked out on disk.
//
// Every entry below the root becomes a DocumentRecord whose path is relative
// to the root, starts with '/' and uses '/' as separator, the same shape the
// GitHub source produces. Hidden entries (".git", ".attachments-cache", ...)
// are skipped together with everything inside them.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::DocumentSource;
use crate::markdown::DocumentRecord;

/// A directory tree on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(anyhow!("Not a directory: {}", root.display()));
        }
        Ok(Self { root })
    }
}

impl DocumentSource for LocalSource {
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let root = self.root.clone();

        // walkdir is blocking; keep it off the async worker threads
        tokio::task::spawn_blocking(move || list_tree(&root))
            .await
            .context("Directory listing task failed")?
    }

    async fn fetch_content(&self, record: &DocumentRecord) -> Result<String> {
        let path = self.root.join(record.path.trim_start_matches('/'));
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn list_tree(root: &Path) -> Result<Vec<DocumentRecord>> {
    let mut records = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let relative = entry.path().strip_prefix(root)?;

        let path = rooted_path(relative);
        records.push(if entry.file_type().is_dir() {
            DocumentRecord::directory(path)
        } else {
            DocumentRecord::file(path)
        });
    }

    Ok(records)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

// "Setup\Install.md" on Windows and "Setup/Install.md" elsewhere both
// become "/Setup/Install.md"
fn rooted_path(relative: &Path) -> String {
    let mut path = String::new();
    for component in relative.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    path
}
