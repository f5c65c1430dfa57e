// src/markdown/error.rs
// Errors raised while constructing markdown entities.

use super::link_type::LinkType;

/// A heading or link could not be built from the given values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// Headings start at level 1 (`#`).
    #[error("heading level must be 1 or greater, got {level}")]
    InvalidHeadingLevel {
        /// The rejected level.
        level: usize,
    },

    /// The reference does not have the shape of the requested link type.
    #[error("reference {reference:?} is not a valid {expected} link")]
    ReferenceShape {
        /// The link type the caller asked for.
        expected: LinkType,
        /// The rejected reference, `None` when it was absent.
        reference: Option<String>,
    },
}
