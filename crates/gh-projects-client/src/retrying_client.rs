//! Retrying Projects client (decorator pattern)
//!
//! Wraps any `ProjectsClient` implementation to re-issue failed read-only
//! queries. Mutations are passed through exactly once.

use crate::client::{OperationKind, ProjectsClient};
use crate::types::{BoardSummary, MutationToken, ProjectItem, Repository};
use async_trait::async_trait;
use log::warn;
use std::future::Future;
use std::time::Duration;

/// How often and how fast failed queries are re-issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub retries: u32,

    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Number of attempts allowed for an operation of the given kind
    pub fn attempts_for(&self, kind: OperationKind) -> u32 {
        if kind.is_retriable() {
            self.retries + 1
        } else {
            1
        }
    }
}

/// Retrying Projects client using the decorator pattern
///
/// Wraps an inner `ProjectsClient` and re-issues failed queries according
/// to the configured `RetryPolicy`. The caller does not need to be aware of
/// the retries; the last error is returned once attempts are exhausted.
///
/// # Example
///
/// ```rust,ignore
/// use gh_projects_client::{OctocrabProjectsClient, RetryPolicy, RetryingProjectsClient};
/// use std::sync::Arc;
///
/// let octocrab = Arc::new(octocrab::Octocrab::builder().build().unwrap());
/// let inner = OctocrabProjectsClient::new(octocrab);
///
/// let client = RetryingProjectsClient::new(inner, RetryPolicy::default());
/// ```
#[derive(Debug, Clone)]
pub struct RetryingProjectsClient<C: ProjectsClient> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ProjectsClient> RetryingProjectsClient<C> {
    /// Create a new retrying client
    ///
    /// # Arguments
    ///
    /// * `inner` - The inner client to delegate API calls to
    /// * `policy` - Retry behavior for queries
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Get the current retry policy
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Run `call` until it succeeds or the attempts for `kind` are used up
    async fn with_retries<T, F, Fut>(
        &self,
        operation: &str,
        kind: OperationKind,
        mut call: F,
    ) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<T>> + Send,
        T: Send,
    {
        let attempts = self.policy.attempts_for(kind);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    warn!(
                        "{} failed (attempt {}/{}): {:#}",
                        operation, attempt, attempts, e
                    );
                    attempt += 1;
                    if !self.policy.delay.is_zero() {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<C: ProjectsClient> ProjectsClient for RetryingProjectsClient<C> {
    async fn fetch_repository_and_projects(
        &self,
        owner: &str,
        repository: &str,
    ) -> anyhow::Result<Repository> {
        self.with_retries("fetch_repository_and_projects", OperationKind::Query, || {
            self.inner.fetch_repository_and_projects(owner, repository)
        })
        .await
    }

    async fn fetch_assigned_projects(
        &self,
        pull_request_id: &str,
    ) -> anyhow::Result<Vec<BoardSummary>> {
        self.with_retries("fetch_assigned_projects", OperationKind::Query, || {
            self.inner.fetch_assigned_projects(pull_request_id)
        })
        .await
    }

    async fn fetch_item_for_pr_id(
        &self,
        project_id: &str,
        pull_request_id: &str,
    ) -> anyhow::Result<Option<ProjectItem>> {
        self.with_retries("fetch_item_for_pr_id", OperationKind::Query, || {
            self.inner.fetch_item_for_pr_id(project_id, pull_request_id)
        })
        .await
    }

    async fn assign_pr_to_project(
        &self,
        pull_request_id: &str,
        project_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<ProjectItem> {
        self.with_retries("assign_pr_to_project", OperationKind::Mutation, || {
            self.inner
                .assign_pr_to_project(pull_request_id, project_id, token)
        })
        .await
    }

    async fn update_item_field_value(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String> {
        self.with_retries("update_item_field_value", OperationKind::Mutation, || {
            self.inner
                .update_item_field_value(project_id, item_id, field_id, option_id, token)
        })
        .await
    }

    async fn delete_project_item(
        &self,
        project_id: &str,
        item_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String> {
        self.with_retries("delete_project_item", OperationKind::Mutation, || {
            self.inner.delete_project_item(project_id, item_id, token)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock client failing a fixed number of times before succeeding
    #[derive(Debug, Clone)]
    struct FlakyClient {
        failures: u32,
        call_count: Arc<Mutex<u32>>,
    }

    impl FlakyClient {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        fn call_count(&self) -> u32 {
            *self.call_count.lock().unwrap()
        }

        fn next_call(&self) -> anyhow::Result<()> {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            if *count <= self.failures {
                Err(anyhow::anyhow!("bad gateway ({})", *count))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProjectsClient for FlakyClient {
        async fn fetch_repository_and_projects(
            &self,
            _owner: &str,
            repository: &str,
        ) -> anyhow::Result<Repository> {
            self.next_call()?;
            Ok(Repository {
                id: "R_0000000001".to_string(),
                name: repository.to_string(),
                boards: vec![],
            })
        }

        async fn fetch_assigned_projects(
            &self,
            _pull_request_id: &str,
        ) -> anyhow::Result<Vec<BoardSummary>> {
            self.next_call()?;
            Ok(vec![])
        }

        async fn fetch_item_for_pr_id(
            &self,
            _project_id: &str,
            _pull_request_id: &str,
        ) -> anyhow::Result<Option<ProjectItem>> {
            self.next_call()?;
            Ok(None)
        }

        async fn assign_pr_to_project(
            &self,
            pull_request_id: &str,
            _project_id: &str,
            _token: &MutationToken,
        ) -> anyhow::Result<ProjectItem> {
            self.next_call()?;
            Ok(ProjectItem {
                id: "PVTI_1".to_string(),
                content_id: Some(pull_request_id.to_string()),
            })
        }

        async fn update_item_field_value(
            &self,
            _project_id: &str,
            item_id: &str,
            _field_id: &str,
            _option_id: &str,
            _token: &MutationToken,
        ) -> anyhow::Result<String> {
            self.next_call()?;
            Ok(item_id.to_string())
        }

        async fn delete_project_item(
            &self,
            _project_id: &str,
            item_id: &str,
            _token: &MutationToken,
        ) -> anyhow::Result<String> {
            self.next_call()?;
            Ok(item_id.to_string())
        }
    }

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            delay: Duration::ZERO,
        }
    }

    fn token() -> MutationToken {
        MutationToken::for_repository("acme", "example-repository")
    }

    #[test]
    fn test_attempts_for() {
        assert_eq!(policy(2).attempts_for(OperationKind::Query), 3);
        assert_eq!(policy(2).attempts_for(OperationKind::Mutation), 1);
        assert_eq!(policy(0).attempts_for(OperationKind::Query), 1);
    }

    #[tokio::test]
    async fn test_query_succeeds_after_transient_failures() {
        let mock = FlakyClient::new(2);
        let client = RetryingProjectsClient::new(mock.clone(), policy(2));

        let repository = client
            .fetch_repository_and_projects("acme", "example-repository")
            .await
            .unwrap();
        assert_eq!(repository.name, "example-repository");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_query_returns_last_error_when_exhausted() {
        let mock = FlakyClient::new(5);
        let client = RetryingProjectsClient::new(mock.clone(), policy(1));

        let err = client.fetch_assigned_projects("PR_1").await.unwrap_err();
        assert_eq!(err.to_string(), "bad gateway (2)");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_item_lookup_is_retried() {
        let mock = FlakyClient::new(1);
        let client = RetryingProjectsClient::new(mock.clone(), policy(1));

        let item = client.fetch_item_for_pr_id("PVT_1", "PR_1").await.unwrap();
        assert!(item.is_none());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mutations_are_never_retried() {
        let mock = FlakyClient::new(1);
        let client = RetryingProjectsClient::new(mock.clone(), policy(3));

        assert!(client
            .assign_pr_to_project("PR_1", "PVT_1", &token())
            .await
            .is_err());
        assert_eq!(mock.call_count(), 1);

        // The mock has used up its failure, so the next mutations go through once each
        client
            .update_item_field_value("PVT_1", "PVTI_1", "PVTSSF_1", "00000001", &token())
            .await
            .unwrap();
        client
            .delete_project_item("PVT_1", "PVTI_1", &token())
            .await
            .unwrap();
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mutation_failure_is_not_repeated() {
        let mock = FlakyClient::new(10);
        let client = RetryingProjectsClient::new(mock.clone(), policy(3));

        assert!(client
            .delete_project_item("PVT_1", "PVTI_1", &token())
            .await
            .is_err());
        assert_eq!(mock.call_count(), 1);
    }
}
