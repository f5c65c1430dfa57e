// src/checker/resolve.rs
// =============================================================================
// Decides whether a link points at something that exists.
//
// What "exists" means depends on the link type:
// - AbsolutePath "/Home.md":   some listed path is exactly "/Home.md"
// - RelativePath "Page.md":    some listed path ends with "Page.md"
// - NamedLink    "#setup":     the linking page has a heading whose anchor id
//                              is "setup", or an HTML element with id="setup"
// - Url:                       not checked at all, no verdict
// - Empty:                     cannot come out of the parser; an error
//
// Relative paths are matched by plain suffix, without looking at path
// segments. "b.md" therefore also matches "/ab.md". See DESIGN.md.
// =============================================================================

use std::sync::{Arc, Mutex, PoisonError};

use super::counts::{CountsSnapshot, RunCounts};
use super::verdict::Verdict;
use crate::markdown::{DocumentMetadata, DocumentRecord, Link, LinkType};

/// Every entry of the repository, shared read-only by all resolution tasks.
#[derive(Debug, Clone, Default)]
pub struct DocumentListing {
    records: Vec<DocumentRecord>,
}

impl DocumentListing {
    pub fn new(records: Vec<DocumentRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The entries the extractor should parse.
    pub fn markdown_files(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter().filter(|record| record.is_markdown())
    }

    fn contains_path(&self, path: &str) -> bool {
        self.records.iter().any(|record| record.path == path)
    }

    fn contains_suffix(&self, suffix: &str) -> bool {
        self.records.iter().any(|record| record.path.ends_with(suffix))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The link's type has no resolution rule.
    #[error("{link} has a link type that cannot be resolved ({link_type})")]
    UnresolvableLinkType { link: Link, link_type: LinkType },
}

// Resolves one link
//
// Parameters:
//   link: the link to check
//   metadata: the document the link sits in (for named links)
//   listing: every entry of the repository (for path links)
//
// Returns:
//   Ok(Some(found)) for path and named links
//   Ok(None) for URLs, which are not checked
//   Err for empty links
pub fn resolve(
    link: &Link,
    metadata: &DocumentMetadata,
    listing: &DocumentListing,
) -> Result<Option<bool>, ResolveError> {
    let link_type = link.link_type();
    let reference = link.reference().unwrap_or_default();

    let found = match link_type {
        LinkType::AbsolutePath => listing.contains_path(reference),
        LinkType::RelativePath => listing.contains_suffix(reference),
        LinkType::NamedLink => {
            let anchor = reference.strip_prefix('#').unwrap_or(reference);
            has_anchor(metadata, anchor)
        }
        LinkType::Url => return Ok(None),
        LinkType::Empty => {
            return Err(ResolveError::UnresolvableLinkType {
                link: link.clone(),
                link_type,
            })
        }
    };

    Ok(Some(found))
}

// Only the linking document's own headings and ids count
fn has_anchor(metadata: &DocumentMetadata, anchor: &str) -> bool {
    metadata
        .headings()
        .iter()
        .any(|heading| heading.anchor_id() == anchor)
        || metadata.anchor_ids().iter().any(|id| id.id() == anchor)
}

/// Resolves documents and collects verdicts and counts across tasks.
///
/// Cloning is cheap; all clones share the same listing, counters and
/// verdict list.
#[derive(Debug, Clone)]
pub struct Resolver {
    listing: Arc<DocumentListing>,
    counts: Arc<RunCounts>,
    verdicts: Arc<Mutex<Vec<Verdict>>>,
}

impl Resolver {
    pub fn new(listing: Arc<DocumentListing>) -> Self {
        Self {
            listing,
            counts: Arc::new(RunCounts::new()),
            verdicts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // Resolves every link of a document, in line order
    //
    // A link that cannot be resolved is returned as an error and the
    // remaining links are still checked.
    pub fn check_document(&self, metadata: &DocumentMetadata) -> Vec<ResolveError> {
        let mut errors = Vec::new();

        for link in metadata.links() {
            match resolve(link, metadata, &self.listing) {
                Ok(Some(found)) => self.record(metadata.record(), link, found),
                Ok(None) => {}
                Err(error) => errors.push(error),
            }
        }

        errors
    }

    fn record(&self, page: &DocumentRecord, link: &Link, found: bool) {
        self.counts.record(link.link_type(), found);

        let verdict = Verdict::new(page.clone(), link.clone(), found);
        self.verdicts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(verdict);
    }

    /// Takes the verdicts collected so far and a snapshot of the counters.
    pub fn finish(&self) -> (Vec<Verdict>, CountsSnapshot) {
        let verdicts = std::mem::take(
            &mut *self
                .verdicts
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        (verdicts, self.counts.snapshot())
    }
}
