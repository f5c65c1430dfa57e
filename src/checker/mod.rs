// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - resolve: Decides found / not found for one link
// - counts: Thread-safe per-category counters
// - verdict: The outcome of one link and per-page grouping
// - run: The two-stage concurrent run (extract, then resolve)
//
// This file (mod.rs) is the module root; it re-exports the public API so the
// rest of the application can write `checker::check_wiki()`.
// =============================================================================

mod counts;
mod resolve;
mod run;
mod verdict;

pub use counts::CountsSnapshot;
pub use run::{check_wiki, CheckReport, Stage};
pub use verdict::{group_by_page, PageVerdicts};

#[cfg(test)]
pub use counts::CategoryCounts;
#[cfg(test)]
pub use run::{DocumentError, StageErrors};
#[cfg(test)]
pub use verdict::Verdict;
