// src/checker/verdict.rs
// The outcome of checking one link, and the per-page grouping used for reports.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::markdown::{DocumentRecord, Link};

/// Whether one link on one page points at something that exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub page: DocumentRecord,
    pub link: Link,
    pub found: bool,
}

impl Verdict {
    pub fn new(page: DocumentRecord, link: Link, found: bool) -> Self {
        Self { page, link, found }
    }
}

// "Install: 'Setup/Install.md' on line 12 was not found"
impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(f, "{} was found", self.link)
        } else {
            write!(f, "{} was not found", self.link)
        }
    }
}

/// All verdicts of one page, in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVerdicts {
    pub page: String,
    pub verdicts: Vec<Verdict>,
}

impl PageVerdicts {
    /// True when every link on the page was found.
    pub fn all_found(&self) -> bool {
        self.verdicts.iter().all(|verdict| verdict.found)
    }
}

// Groups verdicts by page path
//
// Pages come out sorted by path and the verdicts of a page by line number,
// whatever order the resolution tasks finished in.
pub fn group_by_page(verdicts: Vec<Verdict>) -> Vec<PageVerdicts> {
    let mut pages: BTreeMap<String, Vec<Verdict>> = BTreeMap::new();
    for verdict in verdicts {
        pages.entry(verdict.page.path.clone()).or_default().push(verdict);
    }

    pages
        .into_iter()
        .map(|(page, mut verdicts)| {
            verdicts.sort_by_key(|verdict| verdict.link.line_number());
            PageVerdicts { page, verdicts }
        })
        .collect()
}
