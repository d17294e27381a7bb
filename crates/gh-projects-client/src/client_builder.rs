//! Authentication and client construction
//!
//! Resolves a GitHub token for the target host and builds the octocrab
//! instance backing `OctocrabProjectsClient`, wrapped in the retry decorator.

use crate::{OctocrabProjectsClient, RetryPolicy, RetryingProjectsClient, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 2. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
/// 3. `gh auth token --hostname {host}` command
///
/// Workflow runs always provide `GITHUB_TOKEN`, so the `gh` CLI is only
/// reached on developer machines.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|token| !token.is_empty());

        Self { default_token }
    }

    /// Create a resolver with a fixed default token
    pub fn with_default_token(token: impl Into<String>) -> Self {
        Self {
            default_token: Some(token.into()),
        }
    }

    /// Get the default token (github.com) if available
    pub fn default_token(&self) -> Option<&str> {
        self.default_token.as_deref()
    }

    /// Get a token for the given host
    ///
    /// # Arguments
    ///
    /// * `host` - The GitHub host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        let env_key = host_env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Ok(token);
        }

        if host == DEFAULT_HOST {
            if let Some(ref token) = self.default_token {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Ok(token.clone());
            }
        }

        debug!("Trying gh auth token for host {}", host);
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
            .context("Failed to run 'gh auth token'")?;

        if output.status.success() {
            let token = String::from_utf8(output.stdout)
                .context("Invalid UTF-8 in gh auth token output")?
                .trim()
                .to_string();
            if !token.is_empty() {
                debug!("Using token from gh CLI for host {}", host);
                return Ok(token);
            }
        }

        Err(anyhow::anyhow!(
            "No token found for host '{}'. \
             Set {} or GITHUB_TOKEN, or run 'gh auth login --hostname {}'",
            host,
            env_key,
            host
        ))
    }
}

/// Env var holding a host-specific token, e.g. `GITHUB_TOKEN_GHE_EXAMPLE_COM`
pub fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// Extract the host from an API or server URL
///
/// `https://ghe.example.com/api/v3` → `ghe.example.com`.
/// The public API host `api.github.com` maps to `github.com`.
pub fn host_from_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = rest.split(['/', '?']).next()?.trim();

    match host {
        "" => None,
        "api.github.com" => Some(DEFAULT_HOST.to_string()),
        host => Some(host.to_string()),
    }
}

/// Base URI under which octocrab finds the GraphQL endpoint
///
/// Octocrab posts GraphQL documents to `{base}/graphql`. GitHub Enterprise
/// serves REST under `/api/v3` but GraphQL under `/api/graphql`, so both
/// `https://HOST/api/v3` and `https://HOST/api/graphql` map to
/// `https://HOST/api`.
pub fn graphql_base_uri(api_url: &str) -> String {
    let url = api_url.trim_end_matches('/');
    url.strip_suffix("/graphql")
        .or_else(|| url.strip_suffix("/v3"))
        .unwrap_or(url)
        .to_string()
}

/// Build an octocrab instance talking to `api_url` (None = api.github.com)
pub fn build_octocrab(api_url: Option<&str>, token: String) -> Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token);
    if let Some(api_url) = api_url {
        let base_uri = graphql_base_uri(api_url);
        debug!("Using GraphQL base URI {}", base_uri);
        builder = builder
            .base_uri(base_uri.as_str())
            .context("Failed to set base URI")?;
    }

    builder.build().context("Failed to build Octocrab client")
}

/// Build the production client stack for the given API base URL
///
/// # Arguments
///
/// * `api_url` - Base URI of a GitHub Enterprise API (None = api.github.com)
/// * `tokens` - Token source
/// * `policy` - Retry behavior for queries
pub async fn build_client(
    api_url: Option<&str>,
    tokens: &TokenResolver,
    policy: RetryPolicy,
) -> Result<RetryingProjectsClient<OctocrabProjectsClient>> {
    let host = api_url.and_then(host_from_url);
    let effective_host = host.as_deref().unwrap_or(DEFAULT_HOST);
    info!("Creating GitHub client for host: {}", effective_host);

    let token = tokens.get_token(host.as_deref()).await?;
    let base_url = api_url.filter(|_| effective_host != DEFAULT_HOST);
    let octocrab = build_octocrab(base_url, token)?;
    let client =
        RetryingProjectsClient::new(OctocrabProjectsClient::new(Arc::new(octocrab)), policy);

    info!("GitHub client created for host: {}", effective_host);
    Ok(client)
}
