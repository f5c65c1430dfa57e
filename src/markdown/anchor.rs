// src/markdown/anchor.rs
// =============================================================================
// Derives the anchor id a heading can be linked to with `#id`.
//
// The rule is deliberately simple: lowercase everything and turn spaces into
// hyphens. Punctuation is kept as-is, so "What's new?" becomes "what's-new?".
// Two headings with the same text share one anchor id.
// =============================================================================

// Converts heading text into its anchor id
//
// Example:
//   "My Section Name" -> "my-section-name"
pub fn derive_anchor_id(text: &str) -> String {
    // TODO: escape punctuation the way the wiki renderer does once we know
    // which renderer the target wiki uses
    text.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_simple() {
        assert_eq!(derive_anchor_id("My Section Name"), "my-section-name");
    }

    #[test]
    fn test_derive_keeps_punctuation() {
        assert_eq!(derive_anchor_id("What's New?"), "what's-new?");
    }

    #[test]
    fn test_derive_every_space_becomes_hyphen() {
        assert_eq!(derive_anchor_id("A  B"), "a--b");
    }

    #[test]
    fn test_derive_empty() {
        assert_eq!(derive_anchor_id(""), "");
    }
}
