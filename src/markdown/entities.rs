// src/markdown/entities.rs
// =============================================================================
// The data we pull out of a Markdown document.
//
// - DocumentRecord: one entry of the repository listing (file or directory)
// - Heading: a "# Title" line
// - AnchorId: an HTML element declaring id="..."
// - Link: a "[text](reference)" pair
// - DocumentMetadata: everything above for one document
//
// Entities are read-only once built. Fields are private and exposed through
// accessors so a Link's type can never drift away from its reference.
// =============================================================================

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use super::anchor::derive_anchor_id;
use super::error::EntityError;
use super::link_type::{classify, LinkType};

/// One entry of the repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentRecord {
    /// Path as the repository reports it, e.g. "/Setup/Install.md"
    pub path: String,
    /// Directories take part in path resolution but are never parsed
    pub is_directory: bool,
}

impl DocumentRecord {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    /// True for files whose name ends in ".md", ignoring case.
    pub fn is_markdown(&self) -> bool {
        !self.is_directory && self.path.to_ascii_lowercase().ends_with(".md")
    }
}

impl fmt::Display for DocumentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A Markdown heading such as `## Setup Guide`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    level: usize,
    text: String,
}

impl Heading {
    /// Builds a heading. Level 0 does not exist in Markdown and is rejected.
    pub fn new(level: usize, text: impl Into<String>) -> Result<Self, EntityError> {
        if level < 1 {
            return Err(EntityError::InvalidHeadingLevel { level });
        }

        Ok(Self {
            level,
            text: text.into(),
        })
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The id a `#...` link must use to reach this heading.
    pub fn anchor_id(&self) -> String {
        derive_anchor_id(&self.text)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}, '{}'", self.level, self.text)
    }
}

/// An HTML element that declares an id, e.g. `<a id="install"></a>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorId {
    id: String,
    source_statement: String,
}

impl AnchorId {
    pub fn new(id: impl Into<String>, source_statement: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_statement: source_statement.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The trimmed line the id was found on, kept for diagnostics.
    pub fn source_statement(&self) -> &str {
        &self.source_statement
    }
}

/// An inline link `[text](reference)` and the line it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    text: String,
    reference: Option<String>,
    line_number: usize,
}

impl Link {
    /// Builds a link whose type is whatever the reference classifies as.
    #[cfg(test)]
    pub fn new(text: impl Into<String>, reference: impl Into<String>, line_number: usize) -> Self {
        Self {
            text: text.into(),
            reference: Some(reference.into()),
            line_number,
        }
    }

    /// Builds a link that must be of `link_type`.
    ///
    /// Fails when the reference does not have that type's shape. An `Empty`
    /// link accepts only a missing or empty reference and stores it as missing.
    pub fn with_type(
        text: impl Into<String>,
        reference: Option<String>,
        line_number: usize,
        link_type: LinkType,
    ) -> Result<Self, EntityError> {
        let actual = classify(reference.as_deref().unwrap_or(""));
        if actual != link_type {
            return Err(EntityError::ReferenceShape {
                expected: link_type,
                reference,
            });
        }

        let reference = match link_type {
            LinkType::Empty => None,
            _ => reference,
        };

        Ok(Self {
            text: text.into(),
            reference,
            line_number,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// 1-based line number inside the owning document.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Recomputed from the reference on every call.
    pub fn link_type(&self) -> LinkType {
        classify(self.reference.as_deref().unwrap_or(""))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' on line {}",
            self.text,
            self.reference.as_deref().unwrap_or(""),
            self.line_number
        )
    }
}

// Hand-written so the JSON output carries the derived link type as well
impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Link", 4)?;
        state.serialize_field("text", self.text())?;
        state.serialize_field("reference", &self.reference)?;
        state.serialize_field("line_number", &self.line_number)?;
        state.serialize_field("link_type", &self.link_type())?;
        state.end()
    }
}

/// Everything extracted from one document.
///
/// Only the parser builds these, so the sequences are always in line order.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    record: DocumentRecord,
    content: String,
    headings: Vec<Heading>,
    anchor_ids: Vec<AnchorId>,
    links: Vec<Link>,
}

impl DocumentMetadata {
    pub(super) fn new(
        record: DocumentRecord,
        content: String,
        headings: Vec<Heading>,
        anchor_ids: Vec<AnchorId>,
        links: Vec<Link>,
    ) -> Self {
        Self {
            record,
            content,
            headings,
            anchor_ids,
            links,
        }
    }

    /// Metadata holding only links, for exercising the resolver directly.
    #[cfg(test)]
    pub fn with_links(record: DocumentRecord, links: Vec<Link>) -> Self {
        Self::new(record, String::new(), Vec::new(), Vec::new(), links)
    }

    pub fn record(&self) -> &DocumentRecord {
        &self.record
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn anchor_ids(&self) -> &[AnchorId] {
        &self.anchor_ids
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_rejects_level_zero() {
        let result = Heading::new(0, "Title");
        assert_eq!(result, Err(EntityError::InvalidHeadingLevel { level: 0 }));
    }

    #[test]
    fn test_heading_anchor_id() {
        let heading = Heading::new(2, "Setup Guide").unwrap();
        assert_eq!(heading.level(), 2);
        assert_eq!(heading.anchor_id(), "setup-guide");
        assert_eq!(heading.to_string(), "H2, 'Setup Guide'");
    }

    #[test]
    fn test_link_type_follows_reference() {
        assert_eq!(Link::new("Home", "/Home.md", 1).link_type(), LinkType::AbsolutePath);
        assert_eq!(Link::new("Up", "#top", 1).link_type(), LinkType::NamedLink);
        assert_eq!(Link::new("Site", "https://x.com", 1).link_type(), LinkType::Url);
    }

    #[test]
    fn test_with_type_accepts_matching_shape() {
        let link = Link::with_type("Home", Some("/Home.md".into()), 4, LinkType::AbsolutePath).unwrap();
        assert_eq!(link.reference(), Some("/Home.md"));
        assert_eq!(link.line_number(), 4);
    }

    #[test]
    fn test_with_type_rejects_wrong_shape() {
        let result = Link::with_type("Home", Some("Home.md".into()), 1, LinkType::AbsolutePath);
        assert!(matches!(
            result,
            Err(EntityError::ReferenceShape { expected: LinkType::AbsolutePath, .. })
        ));

        let result = Link::with_type("x", Some("#a".into()), 1, LinkType::Empty);
        assert!(result.is_err());

        let result = Link::with_type("x", None, 1, LinkType::RelativePath);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_link_stores_no_reference() {
        let link = Link::with_type("x", Some(String::new()), 1, LinkType::Empty).unwrap();
        assert_eq!(link.reference(), None);
        assert_eq!(link.link_type(), LinkType::Empty);

        let link = Link::with_type("x", None, 1, LinkType::Empty).unwrap();
        assert_eq!(link.link_type(), LinkType::Empty);
    }

    #[test]
    fn test_link_display() {
        let link = Link::new("Install", "Setup/Install.md", 12);
        assert_eq!(link.to_string(), "Install: 'Setup/Install.md' on line 12");
    }

    #[test]
    fn test_link_json_includes_type() {
        let link = Link::new("Up", "#top", 3);
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["link_type"], "named_link");
        assert_eq!(json["line_number"], 3);
    }

    #[test]
    fn test_record_is_markdown() {
        assert!(DocumentRecord::file("/Home.md").is_markdown());
        assert!(DocumentRecord::file("/NOTES.MD").is_markdown());
        assert!(!DocumentRecord::file("/image.png").is_markdown());
        assert!(!DocumentRecord::directory("/folder.md").is_markdown());
    }
}
