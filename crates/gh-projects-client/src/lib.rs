//! GitHub Projects (V2) GraphQL client with retry support
//!
//! This crate provides a trait-based client for the handful of Projects V2
//! queries and mutations needed to manage which boards a pull request
//! belongs to. The design follows the decorator pattern, allowing retry
//! behavior to be composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              ProjectsClient trait                │
//! │  - fetch_repository_and_projects()               │
//! │  - fetch_assigned_projects()                     │
//! │  - fetch_item_for_pr_id()                        │
//! │  - assign_pr_to_project()                        │
//! │  - update_item_field_value()                     │
//! │  - delete_project_item()                         │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌──────────────────────┐    ┌─────────────────────────┐
//! │ OctocrabProjectsClient│◄───│ RetryingProjectsClient  │
//! │ (direct API)          │    │ (decorator)             │
//! └──────────────────────┘    └─────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_projects_client::{
//!     OctocrabProjectsClient, ProjectsClient, RetryPolicy, RetryingProjectsClient,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let client = RetryingProjectsClient::new(
//!     OctocrabProjectsClient::new(Arc::new(octocrab)),
//!     RetryPolicy::default(),
//! );
//!
//! let repository = client
//!     .fetch_repository_and_projects("owner", "repo")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_builder;
pub mod graphql;
pub mod octocrab_client;
pub mod retrying_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::{OperationKind, ProjectsClient};
pub use client_builder::{
    build_client, build_octocrab, graphql_base_uri, host_from_url, TokenResolver,
};
pub use octocrab_client::OctocrabProjectsClient;
pub use retrying_client::{RetryPolicy, RetryingProjectsClient};
pub use types::{
    Board, BoardSummary, FieldOption, MutationToken, ProjectItem, Repository, SingleSelectField,
};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
