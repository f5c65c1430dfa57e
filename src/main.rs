// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load settings and set up logging
// 3. Connect to the document source (GitHub or a local directory)
// 4. Run the check, print the report
// 5. Exit with proper code (0 = all links found, 1 = broken links, 2 = error)
// =============================================================================

mod checker; // src/checker/ - link resolution and the concurrent run
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - settings file + flags
mod markdown; // src/markdown/ - headings, ids and links from Markdown text
mod report; // src/report.rs - text and JSON output
mod source; // src/source/ - where documents come from

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use checker::CheckReport;
use cli::{CheckOptions, Cli, Commands};
use config::Settings;
use source::{DocumentSource, GithubSource, LocalSource};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every link was found
//   Ok(1) = broken links found
//   Ok(2) = some documents could not be fetched, parsed or checked
//   Err = the run could not start (bad settings, listing failed, ...)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Github {
            repo_url,
            branch,
            token,
            options,
        } => handle_github_scan(&repo_url, branch, token, &options).await,
        Commands::Local { dir, options } => handle_local_scan(&dir, &options).await,
    }
}

async fn handle_github_scan(
    repo_url: &str,
    branch: Option<String>,
    token: Option<String>,
    options: &CheckOptions,
) -> Result<i32> {
    let settings = Settings::load(options, branch)?;
    init_logging(settings.verbose);

    let source = GithubSource::connect(repo_url, settings.branch.clone(), token).await?;
    if !settings.json {
        println!("🔍 Checking GitHub wiki: {} ({})", repo_url, source.branch());
    }

    check_and_report(&source, &settings).await
}

async fn handle_local_scan(dir: &Path, options: &CheckOptions) -> Result<i32> {
    let settings = Settings::load(options, None)?;
    init_logging(settings.verbose);

    let source = LocalSource::new(dir)?;
    if !settings.json {
        println!("🔍 Checking local wiki: {}", dir.display());
    }

    check_and_report(&source, &settings).await
}

async fn check_and_report<S: DocumentSource>(source: &S, settings: &Settings) -> Result<i32> {
    let report = checker::check_wiki(source, settings.concurrency).await?;

    if !settings.json {
        println!(
            "📄 Checked {} of {} entries\n",
            report.documents_checked, report.documents_listed
        );
    }

    report::print_report(&report, settings.json, settings.show_successes)?;

    Ok(exit_code(&report))
}

// Failures outrank broken links
fn exit_code(report: &CheckReport) -> i32 {
    if report.has_failures() {
        2
    } else if report.broken_count() > 0 {
        1
    } else {
        0
    }
}

// Logs go to stderr so stdout only carries the report
//
// RUST_LOG overrides the level picked from --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
