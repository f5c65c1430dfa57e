// src/markdown/link_type.rs
// =============================================================================
// Classifies the reference part of a Markdown link: `[text](reference)`.
//
// The checks run in a fixed order and the first one that matches wins. The
// order matters: "https://host/page" also starts with a scheme that could be
// mistaken for a relative path, and a URL check has to come first.
//
// We use the `url` crate to decide what an absolute http(s) URL is, the same
// crate we would use if we ever went on to check those URLs over the network.
// =============================================================================

use serde::Serialize;
use std::fmt;
use url::Url;

// The shape of a link reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// No reference at all
    Empty,
    /// Normal HTTP or HTTPS URL
    Url,
    /// Absolute path to a page in the wiki, e.g. "/Home.md"
    AbsolutePath,
    /// Relative path to a page in the wiki, e.g. "Setup/Install.md"
    RelativePath,
    /// Link to a heading or HTML id on the same page, e.g. "#setup"
    NamedLink,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkType::Empty => "empty",
            LinkType::Url => "url",
            LinkType::AbsolutePath => "absolute path",
            LinkType::RelativePath => "relative path",
            LinkType::NamedLink => "named",
        };
        f.write_str(name)
    }
}

// Classifies a link reference
//
// Order (first match wins):
//   1. empty             -> Empty
//   2. http/https URL    -> Url
//   3. starts with '/'   -> AbsolutePath
//   4. starts with '#'   -> NamedLink
//   5. anything else     -> RelativePath
//
// There is no "unknown" outcome: whatever is left over is a relative path.
pub fn classify(reference: &str) -> LinkType {
    if reference.is_empty() {
        LinkType::Empty
    } else if is_url(reference) {
        LinkType::Url
    } else if reference.starts_with('/') {
        LinkType::AbsolutePath
    } else if reference.starts_with('#') {
        LinkType::NamedLink
    } else {
        LinkType::RelativePath
    }
}

// An absolute URI whose scheme is http or https
//
// Url::parse only succeeds for absolute URIs, so "/a/b" and "page.md" are
// rejected here without extra checks.
fn is_url(reference: &str) -> bool {
    Url::parse(reference)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(""), LinkType::Empty);
        assert_eq!(classify("https://x.com"), LinkType::Url);
        assert_eq!(classify("/a/b"), LinkType::AbsolutePath);
        assert_eq!(classify("#sec"), LinkType::NamedLink);
        assert_eq!(classify("a/b.md"), LinkType::RelativePath);
    }

    #[test]
    fn test_classify_http_url() {
        assert_eq!(classify("http://example.com/page"), LinkType::Url);
    }

    #[test]
    fn test_other_schemes_are_relative_paths() {
        // Only http and https count as URLs; everything else falls through
        assert_eq!(classify("mailto:someone@example.com"), LinkType::RelativePath);
        assert_eq!(classify("ftp://example.com/file"), LinkType::RelativePath);
    }

    #[test]
    fn test_relative_with_fragment() {
        assert_eq!(classify("Other-Page.md#intro"), LinkType::RelativePath);
    }

    #[test]
    fn test_display() {
        assert_eq!(LinkType::AbsolutePath.to_string(), "absolute path");
        assert_eq!(LinkType::NamedLink.to_string(), "named");
    }
}
