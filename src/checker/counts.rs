// src/checker/counts.rs
// =============================================================================
// Run-wide link counters.
//
// Resolution runs one task per document and every task bumps these counters,
// so each number is an AtomicUsize. Relaxed ordering is enough: nobody reads
// the counters until every task has been joined, and joining synchronizes.
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::markdown::LinkType;

#[derive(Debug, Default)]
struct CategoryCounter {
    total: AtomicUsize,
    found: AtomicUsize,
    not_found: AtomicUsize,
}

impl CategoryCounter {
    fn record(&self, found: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if found {
            self.found.fetch_add(1, Ordering::Relaxed);
        } else {
            self.not_found.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> CategoryCounts {
        CategoryCounts {
            total: self.total.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}

/// Shared counters for one validation run.
#[derive(Debug, Default)]
pub struct RunCounts {
    absolute_paths: CategoryCounter,
    relative_paths: CategoryCounter,
    named_links: CategoryCounter,
}

impl RunCounts {
    pub fn new() -> Self {
        Self::default()
    }

    // Counts one resolved link
    //
    // URLs and empty links are never resolved and count nothing.
    pub fn record(&self, link_type: LinkType, found: bool) {
        let counter = match link_type {
            LinkType::AbsolutePath => &self.absolute_paths,
            LinkType::RelativePath => &self.relative_paths,
            LinkType::NamedLink => &self.named_links,
            LinkType::Url | LinkType::Empty => return,
        };
        counter.record(found);
    }

    pub fn snapshot(&self) -> CountsSnapshot {
        CountsSnapshot {
            absolute_paths: self.absolute_paths.snapshot(),
            relative_paths: self.relative_paths.snapshot(),
            named_links: self.named_links.snapshot(),
        }
    }
}

/// total / found / not found for one link category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
}

/// A plain copy of the counters, taken once a run is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountsSnapshot {
    pub absolute_paths: CategoryCounts,
    pub relative_paths: CategoryCounts,
    pub named_links: CategoryCounts,
}

impl fmt::Display for CountsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Absolute Paths", &self.absolute_paths),
            ("Relative Paths", &self.relative_paths),
            ("Heading Links", &self.named_links),
        ];

        for (index, (name, counts)) in sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{:<26}{}", format!("{}:", name), counts.total)?;
            writeln!(f, "{:<26}{}", format!("{} Found:", name), counts.found)?;
            writeln!(f, "{:<26}{}", format!("{} Not Found:", name), counts.not_found)?;
        }
        Ok(())
    }
}
