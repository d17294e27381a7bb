//! Projects client trait and operation kind definitions
//!
//! This module defines the core `ProjectsClient` trait that all client
//! implementations must satisfy, as well as the `OperationKind` enum used
//! by decorators to tell read-only queries from mutations.

use crate::types::{BoardSummary, MutationToken, ProjectItem, Repository};
use async_trait::async_trait;

/// Kind of a remote operation
///
/// Queries have no side effects and may be repeated freely. Mutations are
/// not safely repeatable: re-sending `addProjectV2ItemById` after a lost
/// response may assign the pull request twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Read-only GraphQL query
    Query,

    /// GraphQL mutation
    Mutation,
}

impl OperationKind {
    /// May a failed call of this kind be re-issued?
    pub fn is_retriable(&self) -> bool {
        matches!(self, OperationKind::Query)
    }
}

/// GitHub Projects API client trait
///
/// Defines the operations the reconciler needs from the GraphQL API.
/// Implementations can be direct (hitting the API) or decorated
/// with retry logic, recording, etc.
///
/// All list operations return fully drained results: implementations
/// follow `pageInfo.endCursor` until `hasNextPage` is false, so callers
/// never see partial pages.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
#[async_trait]
pub trait ProjectsClient: Send + Sync {
    /// Fetch a repository and every project board linked to it
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repository` - Repository name
    ///
    /// # Returns
    ///
    /// The repository with all boards, each carrying its single-select fields.
    async fn fetch_repository_and_projects(
        &self,
        owner: &str,
        repository: &str,
    ) -> anyhow::Result<Repository>;

    /// Fetch the boards a pull request is currently assigned to
    ///
    /// # Arguments
    ///
    /// * `pull_request_id` - Pull request node id (e.g., "PR_kwDO...")
    async fn fetch_assigned_projects(
        &self,
        pull_request_id: &str,
    ) -> anyhow::Result<Vec<BoardSummary>>;

    /// Find the item linking a pull request to a board
    ///
    /// Scans the board's items page by page and stops at the first item
    /// whose content is the given pull request.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the board has no item for the pull request.
    async fn fetch_item_for_pr_id(
        &self,
        project_id: &str,
        pull_request_id: &str,
    ) -> anyhow::Result<Option<ProjectItem>>;

    // === Mutations ===

    /// Add a pull request to a board (`addProjectV2ItemById`)
    ///
    /// The created item has no status value.
    ///
    /// # Returns
    ///
    /// The created item
    async fn assign_pr_to_project(
        &self,
        pull_request_id: &str,
        project_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<ProjectItem>;

    /// Set a single-select field of an item (`updateProjectV2ItemFieldValue`)
    ///
    /// # Returns
    ///
    /// The id of the updated item
    async fn update_item_field_value(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String>;

    /// Remove an item from a board (`deleteProjectV2Item`)
    ///
    /// # Returns
    ///
    /// The id of the deleted item
    async fn delete_project_item(
        &self,
        project_id: &str,
        item_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String>;
}
