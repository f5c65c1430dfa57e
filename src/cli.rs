// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands, one per document source:
//   wiki-link-guardian github https://github.com/user/wiki-docs
//   wiki-link-guardian local ./my-wiki --show-successes
//
// Both share the same reporting flags (CheckOptions), flattened into each
// subcommand so they can be given after the positional argument.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wiki-link-guardian",
    version,
    about = "Verify the internal links of a Markdown wiki",
    long_about = "wiki-link-guardian lists every page of a Markdown wiki, extracts headings, \
                  HTML ids and links, and reports every page link, path link and heading link \
                  that points at something that does not exist. External URLs are not checked."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a wiki stored in a GitHub repository
    ///
    /// Example: wiki-link-guardian github https://github.com/user/docs --branch main
    Github {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        /// Branch to check (default: the repository's default branch)
        #[arg(long)]
        branch: Option<String>,

        /// GitHub token for private repositories or higher rate limits
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[command(flatten)]
        options: CheckOptions,
    },

    /// Check a wiki checked out on disk
    ///
    /// Example: wiki-link-guardian local ./docs.wiki
    Local {
        /// Root directory of the wiki
        dir: PathBuf,

        #[command(flatten)]
        options: CheckOptions,
    },
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// List links that were found as well, not only broken ones
    #[arg(long)]
    pub show_successes: bool,

    /// Log progress (listing, parsing, checking) to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// How many documents are fetched at the same time (default: 50)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Settings file in JSON (default: wiki-link-guardian.json, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_command() {
        let cli = Cli::try_parse_from([
            "wiki-link-guardian",
            "github",
            "https://github.com/user/docs",
            "--branch",
            "develop",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Github {
                repo_url,
                branch,
                options,
                ..
            } => {
                assert_eq!(repo_url, "https://github.com/user/docs");
                assert_eq!(branch.as_deref(), Some("develop"));
                assert!(options.json);
                assert!(!options.show_successes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_local_command() {
        let cli = Cli::try_parse_from([
            "wiki-link-guardian",
            "local",
            "./wiki",
            "--show-successes",
            "-v",
            "--concurrency",
            "8",
        ])
        .unwrap();

        match cli.command {
            Commands::Local { dir, options } => {
                assert_eq!(dir, PathBuf::from("./wiki"));
                assert!(options.show_successes);
                assert!(options.verbose);
                assert_eq!(options.concurrency, Some(8));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["wiki-link-guardian"]).is_err());
    }
}
