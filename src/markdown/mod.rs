// src/markdown/mod.rs
// =============================================================================
// This module turns raw Markdown text into structured metadata.
//
// Submodules:
// - entities: Heading, AnchorId, Link, DocumentRecord, DocumentMetadata
// - anchor: Derives the anchor id a heading is reachable under
// - link_type: Classifies the reference part of a link
// - parser: The line classifier that fills a DocumentMetadata
// - error: Construction errors for the entities above
//
// Nothing in here does I/O. Fetching the text is the job of `source`,
// checking the links is the job of `checker`.
// =============================================================================

mod anchor;
mod entities;
mod error;
mod link_type;
mod parser;

pub use entities::{DocumentMetadata, DocumentRecord, Link};
pub use link_type::LinkType;
pub use parser::extract;
