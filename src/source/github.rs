// src/source/github.rs
// =============================================================================
// Reads a wiki (or any Markdown docs) straight from a GitHub repository.
//
// Strategy:
// - Parse the GitHub URL to get owner and repo name
// - Ask the REST API for the default branch unless one was given
// - List the whole repository with one recursive git tree request
// - Download file contents from raw.githubusercontent.com
//
// A token (GITHUB_TOKEN or --token) is optional. Without it the API allows
// 60 requests per hour, which is plenty here: listing costs two requests and
// raw downloads are not counted against the API limit.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::DocumentSource;
use crate::markdown::DocumentRecord;

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";

// GitHub rejects API requests without a User-Agent
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    // "tree" for directories, "blob" for files, "commit" for submodules
    #[serde(rename = "type")]
    kind: String,
}

/// A GitHub repository pinned to one branch.
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: Client,
    owner: String,
    repo: String,
    branch: String,
    token: Option<String>,
}

impl GithubSource {
    /// Parses the repository URL and settles on a branch.
    ///
    /// When `branch` is `None` the repository's default branch is looked up.
    pub async fn connect(
        repo_url: &str,
        branch: Option<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let (owner, repo) = parse_github_url(repo_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let mut source = Self {
            client,
            owner,
            repo,
            branch: branch.unwrap_or_default(),
            token,
        };

        if source.branch.is_empty() {
            source.branch = source.default_branch().await?;
        }

        tracing::info!(
            owner = %source.owner,
            repo = %source.repo,
            branch = %source.branch,
            "Using GitHub repository"
        );

        Ok(source)
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    async fn default_branch(&self) -> Result<String> {
        let url = format!("{}/repos/{}/{}", API_BASE, self.owner, self.repo);
        let repo: RepoResponse = self
            .authorized(self.client.get(&url).header(ACCEPT, "application/vnd.github+json"))
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to look up {}/{}", self.owner, self.repo))?
            .json()
            .await?;
        Ok(repo.default_branch)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // Every path segment is percent-encoded, so '#', '?' and '%' in file
    // names stay part of the path
    fn raw_url(&self, record: &DocumentRecord) -> Result<Url> {
        let mut url = Url::parse(RAW_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Cannot build file URLs on {}", RAW_BASE))?
            .clear()
            .push(&self.owner)
            .push(&self.repo)
            .extend(self.branch.split('/'))
            .extend(record.path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

impl DocumentSource for GithubSource {
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            API_BASE, self.owner, self.repo, self.branch
        );

        let response: TreeResponse = self
            .authorized(self.client.get(&url).header(ACCEPT, "application/vnd.github+json"))
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to list branch '{}'", self.branch))?
            .json()
            .await?;

        if response.truncated {
            tracing::warn!(
                entries = response.tree.len(),
                "GitHub truncated the repository listing; some links may be reported as not found"
            );
        }

        Ok(response.tree.into_iter().map(to_record).collect())
    }

    async fn fetch_content(&self, record: &DocumentRecord) -> Result<String> {
        let url = self.raw_url(record)?;
        fetch_file(self.authorized(self.client.get(url.clone())), url.as_str()).await
    }
}

// Wiki links are written from the repository root, so every path gets a
// leading '/' ("docs/a.md" -> "/docs/a.md")
fn to_record(entry: TreeEntry) -> DocumentRecord {
    let path = format!("/{}", entry.path);
    if entry.kind == "tree" {
        DocumentRecord::directory(path)
    } else {
        DocumentRecord::file(path)
    }
}

// Parses a GitHub URL to extract owner and repository name
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - github.com/owner/repo/tree/main/docs (extra segments are ignored)
fn parse_github_url(url: &str) -> Result<(String, String)> {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");

    let path = trimmed
        .strip_prefix("github.com/")
        .ok_or_else(|| anyhow!("Not a GitHub URL: {}", url))?;

    let mut parts = path.split('/').filter(|part| !part.is_empty());
    let (Some(owner), Some(repo)) = (parts.next(), parts.next()) else {
        return Err(anyhow!("Invalid GitHub URL format: {}", url));
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    Ok((owner.to_string(), repo.to_string()))
}

async fn fetch_file(request: RequestBuilder, url: &str) -> Result<String> {
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        ));
    }

    let content = response.text().await?;
    Ok(content)
}
