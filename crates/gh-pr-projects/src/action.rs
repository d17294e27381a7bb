//! GitHub Actions glue: inputs, event payload and outputs
//!
//! The workflow runner passes inputs as `INPUT_<NAME>` variables, the
//! triggering event as a JSON file named by `GITHUB_EVENT_PATH`, and collects
//! outputs from the file named by `GITHUB_OUTPUT`.

use anyhow::{Context, Result};
use gh_projects_client::BoardSummary;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Public API URL as set in `GITHUB_API_URL` on github.com runners
pub const PUBLIC_API_URL: &str = "https://api.github.com";

/// Name of the output carrying the assigned project titles
pub const PROJECTS_OUTPUT: &str = "projects";

/// Subset of the `pull_request` webhook payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub pull_request: Option<PullRequestPayload>,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub node_id: String,
    pub number: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
}

impl EventPayload {
    /// Read and parse the event file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse event payload")
    }
}

/// Everything one run needs from the workflow environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Raw `projects` input, whitespace-separated titles
    pub projects_input: String,

    /// Pull request node id
    pub pull_request_id: String,

    /// Pull request number, for log messages
    pub pull_request_number: Option<u64>,

    pub owner: String,
    pub repository: String,

    /// API base URL when not the public API
    pub api_url: Option<String>,

    /// File collecting step outputs
    pub output_path: Option<PathBuf>,

    /// Explicit config file from the `config` input
    pub config_path: Option<PathBuf>,
}

impl ActionContext {
    /// Build the context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the context from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_path = lookup("GITHUB_EVENT_PATH")
            .filter(|path| !path.is_empty())
            .context("GITHUB_EVENT_PATH is not set; run inside a GitHub Actions workflow")?;
        let payload = EventPayload::load(Path::new(&event_path))?;

        Self::from_payload(payload, lookup)
    }

    /// Combine an already parsed payload with the remaining variables
    pub fn from_payload<F>(payload: EventPayload, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pull_request = payload
            .pull_request
            .context("This action requires a pull_request event")?;

        let api_url = lookup("GITHUB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty() && url != PUBLIC_API_URL);

        Ok(Self {
            projects_input: lookup("INPUT_PROJECTS").unwrap_or_default(),
            pull_request_id: pull_request.node_id,
            pull_request_number: pull_request.number,
            owner: payload.repository.owner.login,
            repository: payload.repository.name,
            api_url,
            output_path: lookup("GITHUB_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            config_path: lookup("INPUT_CONFIG")
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Titles of the assigned boards joined by single spaces
pub fn format_titles(boards: &[BoardSummary]) -> String {
    boards
        .iter()
        .map(|board| board.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append `name=value` to the output file, or print it when there is none
pub fn set_output(output_path: Option<&Path>, name: &str, value: &str) -> Result<()> {
    let line = format!("{}={}", name, value);

    match output_path {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output file {}", path.display()))?;
            writeln!(file, "{}", line)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
        }
        None => println!("{}", line),
    }

    Ok(())
}

/// Report a failure as a workflow error annotation
pub fn error_annotation(message: &str) -> String {
    // Annotations are single-line; encode as the runner expects
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}
