// src/source/mod.rs
// =============================================================================
// This module is where documents come from.
//
// The checker only needs two things from a repository:
// - the full listing of entries (files and directories) with their paths
// - the raw text of one file, on demand
//
// `DocumentSource` captures exactly that. Two implementations ship:
// - GithubSource: a GitHub repository, through the REST API and raw files
// - LocalSource: a wiki that is checked out on disk
//
// Fetching may fail for one document without affecting the others; the
// orchestrator in `checker` records such failures per document.
// =============================================================================

mod github;
mod local;

pub use github::GithubSource;
pub use local::LocalSource;

use anyhow::Result;

use crate::markdown::DocumentRecord;

/// A repository that can list its entries and hand out file contents.
// The futures are driven on the calling task, so no Send bound is needed.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Every entry under the repository root, directories included.
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>>;

    /// Raw text of one file entry.
    async fn fetch_content(&self, record: &DocumentRecord) -> Result<String>;
}
