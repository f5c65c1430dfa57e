// src/markdown/parser.rs
// =============================================================================
// The line classifier.
//
// Each line of a document is trimmed and handed to a small, ordered table of
// matchers. The first matcher that recognizes the line wins and the line is
// done; nothing else is looked for on it. The order is:
//
//   1. heading      "## Setup Guide"
//   2. HTML id      <a id="install"></a>
//   3. inline link  [Install](Setup/Install.md)
//
// Known limitation: only the leftmost link of a line is extracted. A line
// like "[a](x) and [b](y)" yields the link to "x" only.
//
// This is a plain line scanner built on two regular expressions rather than
// a CommonMark event parser: every entity needs its line number, and a line
// yields at most one entity.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

use super::entities::{AnchorId, DocumentMetadata, DocumentRecord, Heading, Link};
use super::error::EntityError;
use super::link_type::classify;

// What one line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineEntity {
    Heading(Heading),
    AnchorId(AnchorId),
    Link(Link),
}

// A matcher gets the trimmed line and its 1-based number.
// Ok(None) means "not mine, ask the next matcher".
type LineMatcher = fn(&str, usize) -> Result<Option<LineEntity>, EntityError>;

const LINE_MATCHERS: [LineMatcher; 3] = [match_heading, match_anchor_id, match_link];

// Parses the content of one Markdown document
//
// Parameters:
//   content: raw document text, newline separated
//   record: the listing entry the text was fetched for
//
// Returns: DocumentMetadata with headings, ids and links in line order
pub fn extract(content: &str, record: DocumentRecord) -> Result<DocumentMetadata, EntityError> {
    let mut headings = Vec::new();
    let mut anchor_ids = Vec::new();
    let mut links = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        let line_number = index + 1;

        // trim() also drops the '\r' of CRLF line endings
        match classify_line(line.trim(), line_number)? {
            Some(LineEntity::Heading(heading)) => headings.push(heading),
            Some(LineEntity::AnchorId(anchor_id)) => anchor_ids.push(anchor_id),
            Some(LineEntity::Link(link)) => links.push(link),
            None => {}
        }
    }

    Ok(DocumentMetadata::new(
        record,
        content.to_string(),
        headings,
        anchor_ids,
        links,
    ))
}

// Runs the matchers in order and stops at the first hit
fn classify_line(line: &str, line_number: usize) -> Result<Option<LineEntity>, EntityError> {
    for matcher in LINE_MATCHERS {
        if let Some(entity) = matcher(line, line_number)? {
            return Ok(Some(entity));
        }
    }
    Ok(None)
}

// "### Title" -> level 3, text "Title"
//
// The level is the length of the leading '#' run, counted without ever
// looking past the end of the line, so "###" alone is a level 3 heading
// with empty text.
fn match_heading(line: &str, _line_number: usize) -> Result<Option<LineEntity>, EntityError> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 {
        return Ok(None);
    }

    // '#' is one byte, so the run length is also a byte offset
    let text = line[level..].trim();
    let heading = Heading::new(level, text)?;
    Ok(Some(LineEntity::Heading(heading)))
}

fn match_anchor_id(line: &str, _line_number: usize) -> Result<Option<LineEntity>, EntityError> {
    let entity = html_id_pattern()
        .captures(line)
        .and_then(|captures| captures.name("id"))
        .map(|id| LineEntity::AnchorId(AnchorId::new(id.as_str(), line)));
    Ok(entity)
}

fn match_link(line: &str, line_number: usize) -> Result<Option<LineEntity>, EntityError> {
    let Some(captures) = link_pattern().captures(line) else {
        return Ok(None);
    };
    let (Some(text), Some(reference)) = (captures.name("text"), captures.name("reference")) else {
        return Ok(None);
    };

    let reference = reference.as_str();
    let link = Link::with_type(
        text.as_str(),
        Some(reference.to_string()),
        line_number,
        classify(reference),
    )?;
    Ok(Some(LineEntity::Link(link)))
}

// ` id="value"` as an HTML attribute; the whitespace in front keeps
// attributes like data-id="..." out
fn html_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"\sid="(?P<id>[^"]+)""#).expect("valid regex"))
}

// Non-greedy on both groups: the shortest text and the shortest reference
fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[(?P<text>.+?)\]\((?P<reference>.+?)\)").expect("valid regex")
    })
}
