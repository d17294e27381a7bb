//! Keeps a pull request assigned to exactly the listed GitHub Projects
//!
//! This crate provides:
//! - [`ProjectsAssigner`]: reconciles a pull request's project assignments
//! - [`DesiredTitles`]: the validated set of desired project titles
//! - [`action`]: GitHub Actions inputs, event payload and outputs
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_pr_projects::{DesiredTitles, ProjectsAssigner};
//! use gh_projects_client::{build_client, RetryPolicy, TokenResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = build_client(None, &TokenResolver::new(), RetryPolicy::default()).await?;
//! let assigner = ProjectsAssigner::new(client, "acme", "example-repository");
//!
//! let desired = DesiredTitles::parse("layer-100/bar layer-200/module-1")?;
//! let assigned = assigner.assign("PR_kwDOAbc123", &desired).await?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod error;
pub mod logger;
pub mod reconciler;
pub mod titles;

pub use error::{AssignError, ErrorKind};
pub use reconciler::{ProjectsAssigner, ReconcilePlan, StatusDefaults};
pub use titles::DesiredTitles;
