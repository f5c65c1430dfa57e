// src/config.rs
// =============================================================================
// Settings for one run.
//
// Values come from two places:
// 1. An optional JSON settings file (wiki-link-guardian.json in the working
//    directory, or the file given with --config)
// 2. Command-line flags, which win over the file
//
// Example settings file:
//   {
//     "branch": "wikiMaster",
//     "show_successes": false,
//     "verbose": true,
//     "concurrency": 16
//   }
// =============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::cli::CheckOptions;

pub const DEFAULT_CONFIG_FILE: &str = "wiki-link-guardian.json";
pub const DEFAULT_CONCURRENCY: usize = 50;

/// The settings file as written on disk. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub branch: Option<String>,
    pub show_successes: Option<bool>,
    pub verbose: Option<bool>,
    pub concurrency: Option<usize>,
}

impl FileSettings {
    // Loads the settings file
    //
    // An explicit path must exist. Without one, the default file is used
    // when it is there and silently skipped when it is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::read(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }
}

/// Effective settings after merging the file and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub branch: Option<String>,
    pub json: bool,
    pub show_successes: bool,
    pub verbose: bool,
    pub concurrency: usize,
}

impl Settings {
    pub fn merge(file: FileSettings, options: &CheckOptions, branch: Option<String>) -> Self {
        Self {
            branch: branch.or(file.branch),
            json: options.json,
            show_successes: options.show_successes || file.show_successes.unwrap_or(false),
            verbose: options.verbose || file.verbose.unwrap_or(false),
            concurrency: options
                .concurrency
                .or(file.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY)
                .max(1),
        }
    }

    /// Loads the settings file named by `options` and merges it.
    pub fn load(options: &CheckOptions, branch: Option<String>) -> Result<Self> {
        let file = FileSettings::load(options.config.as_deref())?;
        Ok(Self::merge(file, options, branch))
    }
}
