// src/checker/run.rs
// =============================================================================
// Runs a whole validation: list, extract, resolve.
//
// Two stages, each fanned out per document:
//
// 1. Extraction: fetch the text of every Markdown file and parse it. Fetches
//    are network or disk bound and run as a bounded stream of futures
//    (`buffer_unordered`).
// 2. Resolution: one blocking task per parsed document. The tasks share the
//    read-only listing and write into the Resolver's counters and verdicts.
//
// Neither stage stops at the first failure. Every per-document error is
// collected, the stage finishes with whatever succeeded, and the errors are
// handed back together in a StageErrors value.
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;

use super::counts::CountsSnapshot;
use super::resolve::{DocumentListing, Resolver};
use super::verdict::Verdict;
use crate::markdown::{self, DocumentMetadata, DocumentRecord};
use crate::source::DocumentSource;

/// Which half of a run an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    Resolution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extraction => f.write_str("extraction"),
            Stage::Resolution => f.write_str("resolution"),
        }
    }
}

/// Something went wrong with one document; the run carried on without it.
#[derive(Debug, thiserror::Error)]
#[error("{path}: {cause:#}")]
pub struct DocumentError {
    pub path: String,
    cause: anyhow::Error,
}

impl DocumentError {
    pub fn new(path: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

/// Every document error of one stage, reported together.
#[derive(Debug, thiserror::Error)]
#[error("{} document(s) failed during {stage}", .errors.len())]
pub struct StageErrors {
    pub stage: Stage,
    pub errors: Vec<DocumentError>,
}

/// The payload of a stage together with the errors it recovered from.
#[derive(Debug)]
pub struct StageOutcome<T> {
    pub value: T,
    pub errors: Vec<DocumentError>,
}

impl<T> StageOutcome<T> {
    /// Splits the outcome; the errors come back only if there were any.
    pub fn into_parts(self, stage: Stage) -> (T, Option<StageErrors>) {
        let errors = if self.errors.is_empty() {
            None
        } else {
            Some(StageErrors {
                stage,
                errors: self.errors,
            })
        };
        (self.value, errors)
    }
}

impl<T> StageOutcome<Vec<T>> {
    fn partition(results: Vec<Result<T, DocumentError>>) -> Self {
        let mut value = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(item) => value.push(item),
                Err(error) => errors.push(error),
            }
        }
        Self { value, errors }
    }
}

/// Everything a run produced, successes and failures alike.
#[derive(Debug)]
pub struct CheckReport {
    pub documents_listed: usize,
    pub documents_checked: usize,
    pub verdicts: Vec<Verdict>,
    pub counts: CountsSnapshot,
    pub failures: Vec<StageErrors>,
}

impl CheckReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn broken_count(&self) -> usize {
        self.verdicts.iter().filter(|verdict| !verdict.found).count()
    }
}

// Checks every link of every Markdown document in a source
//
// Parameters:
//   source: where documents are listed and fetched from
//   concurrency: how many documents are fetched at once
//
// Returns: a CheckReport. Only a failure to list the repository is an Err;
// per-document failures end up in CheckReport::failures.
pub async fn check_wiki<S: DocumentSource>(source: &S, concurrency: usize) -> Result<CheckReport> {
    tracing::info!("Getting repository content...");
    let records = source
        .list_documents()
        .await
        .context("Failed to list repository content")?;
    let listing = Arc::new(DocumentListing::new(records));

    tracing::info!("Selecting Markdown files...");
    let files: Vec<DocumentRecord> = listing.markdown_files().cloned().collect();
    tracing::info!(
        entries = listing.len(),
        markdown = files.len(),
        "Repository listed"
    );

    let mut failures = Vec::new();

    let (documents, errors) = extract_documents(source, files, concurrency)
        .await
        .into_parts(Stage::Extraction);
    if let Some(errors) = errors {
        tracing::warn!("{}", errors);
        failures.push(errors);
    }

    let documents_checked = documents.len();
    let (resolved, errors) = resolve_documents(documents, Arc::clone(&listing))
        .await
        .into_parts(Stage::Resolution);
    if let Some(errors) = errors {
        tracing::warn!("{}", errors);
        failures.push(errors);
    }
    let (verdicts, counts) = resolved;

    Ok(CheckReport {
        documents_listed: listing.len(),
        documents_checked,
        verdicts,
        counts,
        failures,
    })
}

// Stage 1: fetch and parse every file, at most `concurrency` at a time
pub async fn extract_documents<S: DocumentSource>(
    source: &S,
    files: Vec<DocumentRecord>,
    concurrency: usize,
) -> StageOutcome<Vec<DocumentMetadata>> {
    let results: Vec<_> = stream::iter(files)
        .map(|record| extract_document(source, record))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    StageOutcome::partition(results)
}

async fn extract_document<S: DocumentSource>(
    source: &S,
    record: DocumentRecord,
) -> Result<DocumentMetadata, DocumentError> {
    tracing::info!(path = %record.path, "Parsing");

    let content = source
        .fetch_content(&record)
        .await
        .map_err(|error| DocumentError::new(&record.path, error))?;

    let path = record.path.clone();
    let metadata =
        markdown::extract(&content, record).map_err(|error| DocumentError::new(path, error))?;
    log_metadata(&metadata);
    Ok(metadata)
}

fn log_metadata(metadata: &DocumentMetadata) {
    tracing::debug!(
        path = %metadata.record().path,
        bytes = metadata.content().len(),
        headings = metadata.headings().len(),
        ids = metadata.anchor_ids().len(),
        links = metadata.links().len(),
        "Parsed"
    );
    for heading in metadata.headings() {
        tracing::trace!(depth = heading.level(), text = heading.text(), "heading");
    }
    for anchor in metadata.anchor_ids() {
        tracing::trace!(id = anchor.id(), statement = anchor.source_statement(), "html id");
    }
}

// Stage 2: one task per document, links of a document checked in order
pub async fn resolve_documents(
    documents: Vec<DocumentMetadata>,
    listing: Arc<DocumentListing>,
) -> StageOutcome<(Vec<Verdict>, CountsSnapshot)> {
    let resolver = Resolver::new(listing);

    let tasks: Vec<_> = documents
        .into_iter()
        .map(|metadata| {
            let resolver = resolver.clone();
            let path = metadata.record().path.clone();
            let task = tokio::task::spawn_blocking(move || {
                tracing::info!(path = %metadata.record().path, "Checking");
                resolver.check_document(&metadata)
            });
            (path, task)
        })
        .collect();

    let mut errors = Vec::new();
    for (path, task) in tasks {
        match task.await {
            Ok(link_errors) => errors.extend(
                link_errors
                    .into_iter()
                    .map(|error| DocumentError::new(&path, error)),
            ),
            // A panicking task loses its own document only
            Err(join_error) => errors.push(DocumentError::new(&path, join_error)),
        }
    }

    StageOutcome {
        value: resolver.finish(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::{BTreeMap, HashSet};

    // In-memory wiki; paths in `failing` fail to fetch
    #[derive(Default)]
    struct MemorySource {
        files: BTreeMap<String, String>,
        directories: Vec<String>,
        failing: HashSet<String>,
    }

    impl MemorySource {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }

        fn with_directory(mut self, path: &str) -> Self {
            self.directories.push(path.to_string());
            self
        }

        fn failing(mut self, path: &str) -> Self {
            self.failing.insert(path.to_string());
            self
        }
    }

    impl DocumentSource for MemorySource {
        async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
            let directories = self.directories.iter().map(DocumentRecord::directory);
            let files = self.files.keys().map(DocumentRecord::file);
            Ok(directories.chain(files).collect())
        }

        async fn fetch_content(&self, record: &DocumentRecord) -> Result<String> {
            if self.failing.contains(&record.path) {
                return Err(anyhow!("HTTP 401 Unauthorized"));
            }
            self.files
                .get(&record.path)
                .cloned()
                .ok_or_else(|| anyhow!("no such file"))
        }
    }

    struct BrokenListing;

    impl DocumentSource for BrokenListing {
        async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
            Err(anyhow!("connection refused"))
        }

        async fn fetch_content(&self, _record: &DocumentRecord) -> Result<String> {
            unreachable!("nothing is listed")
        }
    }

    fn corpus() -> MemorySource {
        MemorySource::default()
            .with_directory("/Setup")
            .with_file(
                "/Home.md",
                "# Home\n\
                 [Install](/Setup/Install.md)\n\
                 [Missing](/Setup/Missing.md)\n\
                 [Relative](Install.md)\n\
                 [Top](#home)\n\
                 [Rust](https://www.rust-lang.org)\n\
                 [Folder](/Setup)",
            )
            .with_file(
                "/Setup/Install.md",
                "## Setup Guide\n\
                 <a id=\"steps\"></a>\n\
                 [Steps](#steps)\n\
                 [Guide](#setup-guide)\n\
                 [Nope](#nope)\n\
                 [Back](Home.md)\n\
                 [Gone](Gone.md)",
            )
            .with_file("/notes.txt", "[Not parsed](/Nowhere.md)")
    }

    #[tokio::test]
    async fn test_counts_integrity() {
        let report = check_wiki(&corpus(), 4).await.unwrap();

        let counts = report.counts;
        assert_eq!(counts.absolute_paths.total, 3);
        assert_eq!(counts.absolute_paths.found, 2);
        assert_eq!(counts.relative_paths.total, 3);
        assert_eq!(counts.relative_paths.found, 2);
        assert_eq!(counts.named_links.total, 4);
        assert_eq!(counts.named_links.found, 3);

        for category in [counts.absolute_paths, counts.relative_paths, counts.named_links] {
            assert_eq!(category.total, category.found + category.not_found);
        }

        // The URL link produces no verdict
        assert_eq!(report.verdicts.len(), 10);
        assert_eq!(report.broken_count(), 3);
        assert_eq!(report.documents_listed, 4);
        assert_eq!(report.documents_checked, 2);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_named_links_do_not_cross_documents() {
        let source = MemorySource::default()
            .with_file("/A.md", "## Setup Guide")
            .with_file("/B.md", "[x](#setup-guide)");

        let report = check_wiki(&source, 2).await.unwrap();

        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verdicts[0].page.path, "/B.md");
        assert!(!report.verdicts[0].found);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let source = corpus().failing("/Home.md");

        let report = check_wiki(&source, 4).await.unwrap();

        assert!(report
            .verdicts
            .iter()
            .all(|verdict| verdict.page.path == "/Setup/Install.md"));
        assert_eq!(report.verdicts.len(), 5);
        assert_eq!(report.documents_checked, 1);

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.stage, Stage::Extraction);
        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.errors[0].path, "/Home.md");
        assert!(failure.errors[0].to_string().contains("401"));
        assert_eq!(failure.to_string(), "1 document(s) failed during extraction");
    }

    #[tokio::test]
    async fn test_every_failure_is_collected() {
        let source = corpus().failing("/Home.md").failing("/Setup/Install.md");

        let report = check_wiki(&source, 1).await.unwrap();

        assert!(report.verdicts.is_empty());
        assert_eq!(report.failures[0].errors.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let result = check_wiki(&BrokenListing, 4).await;
        let error = result.unwrap_err();
        assert!(format!("{:#}", error).contains("connection refused"));
    }

    #[tokio::test]
    async fn test_resolution_error_stays_with_its_document() {
        use crate::markdown::{Link, LinkType};

        let listing = Arc::new(DocumentListing::new(vec![
            DocumentRecord::file("/Home.md"),
            DocumentRecord::file("/Odd.md"),
            DocumentRecord::file("/Other.md"),
        ]));
        let odd = DocumentMetadata::with_links(
            DocumentRecord::file("/Odd.md"),
            vec![
                Link::new("Home", "/Home.md", 1),
                Link::with_type("Nothing", None, 2, LinkType::Empty).unwrap(),
                Link::new("Missing", "/Missing.md", 3),
            ],
        );
        let other = DocumentMetadata::with_links(
            DocumentRecord::file("/Other.md"),
            vec![Link::new("Home", "Home.md", 1)],
        );

        let ((verdicts, counts), errors) = resolve_documents(vec![odd, other], listing)
            .await
            .into_parts(Stage::Resolution);

        let errors = errors.unwrap();
        assert_eq!(errors.stage, Stage::Resolution);
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].path, "/Odd.md");
        assert!(errors.errors[0].to_string().contains("cannot be resolved"));

        // Links on either side of the bad one are still checked
        let mut odd_lines: Vec<_> = verdicts
            .iter()
            .filter(|verdict| verdict.page.path == "/Odd.md")
            .map(|verdict| (verdict.link.line_number(), verdict.found))
            .collect();
        odd_lines.sort();
        assert_eq!(odd_lines, vec![(1, true), (3, false)]);
        assert_eq!(counts.absolute_paths.total, 2);
        assert_eq!(counts.absolute_paths.found, 1);

        // The other document is untouched
        let other: Vec<_> = verdicts
            .iter()
            .filter(|verdict| verdict.page.path == "/Other.md")
            .collect();
        assert_eq!(other.len(), 1);
        assert!(other[0].found);
        assert_eq!(counts.relative_paths.total, 1);
        assert_eq!(counts.relative_paths.found, 1);
        assert_eq!(verdicts.len(), 3);
    }

    #[test]
    fn test_stage_outcome_parts() {
        let outcome: StageOutcome<Vec<u8>> = StageOutcome::partition(vec![
            Ok(1),
            Err(DocumentError::new("/x.md", anyhow!("boom"))),
            Ok(2),
        ]);
        let (value, errors) = outcome.into_parts(Stage::Resolution);
        assert_eq!(value, vec![1, 2]);

        let errors = errors.unwrap();
        assert_eq!(errors.stage, Stage::Resolution);
        assert_eq!(errors.errors[0].to_string(), "/x.md: boom");

        let clean: StageOutcome<Vec<u8>> = StageOutcome::partition(vec![Ok(3)]);
        assert!(clean.into_parts(Stage::Extraction).1.is_none());
    }
}
