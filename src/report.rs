// src/report.rs
// =============================================================================
// Turns a CheckReport into output.
//
// Text output (stdout), one block per page:
//
//   Page /Home.md
//     Install: 'Setup/Install.md' on line 12 was not found
//
//   Page /Setup/Install.md
//     All links were correct.
//
// followed by the counters. Document failures are written separately to
// stderr, so a failed page never hides the results of the others.
//
// JSON output is a single object with pages, counts and errors.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::checker::{group_by_page, CheckReport, CountsSnapshot, PageVerdicts, Stage};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    documents_listed: usize,
    documents_checked: usize,
    pages: Vec<PageVerdicts>,
    counts: &'a CountsSnapshot,
    errors: Vec<JsonError>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    stage: Stage,
    path: String,
    message: String,
}

// Prints results to stdout and failures to stderr
pub fn print_report(report: &CheckReport, json: bool, show_successes: bool) -> Result<()> {
    if json {
        println!("{}", render_json(report)?);
    } else {
        print!("{}", render_text(report, show_successes));

        let failures = render_failures(report);
        if !failures.is_empty() {
            eprint!("{}", failures);
        }

        print!("{}", render_summary(report));
    }
    Ok(())
}

// One block per page, verdicts in line order
pub fn render_text(report: &CheckReport, show_successes: bool) -> String {
    let mut output = String::new();

    for page in group_by_page(report.verdicts.clone()) {
        let _ = writeln!(output, "Page {}", page.page);

        for verdict in &page.verdicts {
            if show_successes || !verdict.found {
                let _ = writeln!(output, "  {}", verdict);
            }
        }

        if !show_successes && page.all_found() {
            let _ = writeln!(output, "  All links were correct.");
        }
        let _ = writeln!(output);
    }

    output
}

pub fn render_failures(report: &CheckReport) -> String {
    let mut output = String::new();
    for stage in &report.failures {
        let _ = writeln!(output, "⚠️  {}", stage);
        for error in &stage.errors {
            let _ = writeln!(output, "   {}", error);
        }
    }
    output
}

pub fn render_summary(report: &CheckReport) -> String {
    let broken = report.broken_count();
    let mut output = String::new();

    let _ = writeln!(output, "{}", report.counts);
    let _ = writeln!(output, "📊 Summary:");
    let _ = writeln!(output, "   📄 Pages checked: {}", report.documents_checked);
    let _ = writeln!(output, "   ✅ Found: {}", report.verdicts.len() - broken);
    let _ = writeln!(output, "   ❌ Not found: {}", broken);
    if report.has_failures() {
        let failed: usize = report.failures.iter().map(|stage| stage.errors.len()).sum();
        let _ = writeln!(output, "   ⚠️  Errors: {}", failed);
    }
    output
}

pub fn render_json(report: &CheckReport) -> Result<String> {
    let errors = report
        .failures
        .iter()
        .flat_map(|stage| {
            stage.errors.iter().map(move |error| JsonError {
                stage: stage.stage,
                path: error.path.clone(),
                message: error.to_string(),
            })
        })
        .collect();

    let json = JsonReport {
        documents_listed: report.documents_listed,
        documents_checked: report.documents_checked,
        pages: group_by_page(report.verdicts.clone()),
        counts: &report.counts,
        errors,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}
