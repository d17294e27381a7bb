//! Octocrab-based GitHub Projects client
//!
//! Direct implementation of the `ProjectsClient` trait using the octocrab
//! library's GraphQL endpoint. This client makes real API calls without
//! any retry behavior.

use crate::client::ProjectsClient;
use crate::graphql::{
    AddItemData, AddItemInput, DeleteItemData, DeleteItemInput, FieldValue, GraphQLPayload,
    GraphQLResponse, MutationVariables, NodeData, NodeVariables, ProjectNode, PullRequestNode,
    RepositoryData, RepositoryNode, RepositoryVariables, UpdateItemFieldValueData,
    UpdateItemFieldValueInput, ADD_ITEM_MUTATION, ASSIGNED_PROJECTS_QUERY, DELETE_ITEM_MUTATION,
    PROJECT_ITEMS_QUERY, REPOSITORY_PROJECTS_QUERY, UPDATE_ITEM_FIELD_VALUE_MUTATION,
};
use crate::types::{Board, BoardSummary, MutationToken, ProjectItem, Repository};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Direct GitHub Projects client using octocrab
///
/// This is the base implementation that makes actual API calls.
/// It can be wrapped by `RetryingProjectsClient` to retry failed queries.
#[derive(Debug, Clone)]
pub struct OctocrabProjectsClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabProjectsClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// POST one GraphQL document and unwrap its `data`
    async fn execute<V, T>(&self, operation: &str, query: &str, variables: V) -> anyhow::Result<T>
    where
        V: Serialize + Send + Sync,
        T: DeserializeOwned + Send,
    {
        debug!("GraphQL {}", operation);

        let payload = GraphQLPayload { query, variables };
        let response: GraphQLResponse<T> = self
            .octocrab
            .graphql(&payload)
            .await
            .with_context(|| format!("GraphQL request '{}' failed", operation))?;

        response
            .into_data()
            .with_context(|| format!("GraphQL request '{}' was rejected", operation))
    }

    /// Fetch one page of a repository's boards
    async fn repository_page(
        &self,
        owner: &str,
        repository: &str,
        cursor: Option<&str>,
    ) -> anyhow::Result<RepositoryNode> {
        let variables = RepositoryVariables {
            owner,
            name: repository,
            cursor,
        };
        let data: RepositoryData = self
            .execute("RepositoryProjects", REPOSITORY_PROJECTS_QUERY, variables)
            .await?;

        data.repository
            .ok_or_else(|| anyhow!("Repository {}/{} not found", owner, repository))
    }
}

#[async_trait]
impl ProjectsClient for OctocrabProjectsClient {
    async fn fetch_repository_and_projects(
        &self,
        owner: &str,
        repository: &str,
    ) -> anyhow::Result<Repository> {
        debug!("Fetching projects for {}/{}", owner, repository);

        let first = self.repository_page(owner, repository, None).await?;
        let (id, name) = (first.id, first.name);
        let (nodes, mut next) = first.projects.into_page();
        let mut boards: Vec<Board> = nodes.into_iter().map(Board::from).collect();

        while let Some(cursor) = next {
            let page = self
                .repository_page(owner, repository, Some(&cursor))
                .await?;
            let (nodes, following) = page.projects.into_page();
            boards.extend(nodes.into_iter().map(Board::from));
            next = following;
        }

        debug!(
            "Fetched {} projects for {}/{}",
            boards.len(),
            owner,
            repository
        );
        Ok(Repository { id, name, boards })
    }

    async fn fetch_assigned_projects(
        &self,
        pull_request_id: &str,
    ) -> anyhow::Result<Vec<BoardSummary>> {
        debug!("Fetching assigned projects for {}", pull_request_id);

        let mut boards = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let variables = NodeVariables {
                id: pull_request_id,
                cursor: cursor.as_deref(),
            };
            let data: NodeData<PullRequestNode> = self
                .execute("AssignedProjects", ASSIGNED_PROJECTS_QUERY, variables)
                .await?;

            let projects = data
                .node
                .and_then(|node| node.projects)
                .ok_or_else(|| anyhow!("Node {} is not a pull request", pull_request_id))?;

            let (nodes, next) = projects.into_page();
            boards.extend(nodes);

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(
            "Pull request {} is assigned to {} projects",
            pull_request_id,
            boards.len()
        );
        Ok(boards)
    }

    async fn fetch_item_for_pr_id(
        &self,
        project_id: &str,
        pull_request_id: &str,
    ) -> anyhow::Result<Option<ProjectItem>> {
        debug!(
            "Looking up item of {} in project {}",
            pull_request_id, project_id
        );

        let mut cursor: Option<String> = None;

        loop {
            let variables = NodeVariables {
                id: project_id,
                cursor: cursor.as_deref(),
            };
            let data: NodeData<ProjectNode> = self
                .execute("ProjectItems", PROJECT_ITEMS_QUERY, variables)
                .await?;

            let items = data
                .node
                .and_then(|node| node.items)
                .ok_or_else(|| anyhow!("Node {} is not a project", project_id))?;

            let (nodes, next) = items.into_page();
            let found = nodes
                .into_iter()
                .map(ProjectItem::from)
                .find(|item| item.content_id.as_deref() == Some(pull_request_id));

            if found.is_some() {
                return Ok(found);
            }

            match next {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }

    async fn assign_pr_to_project(
        &self,
        pull_request_id: &str,
        project_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<ProjectItem> {
        let variables = MutationVariables {
            input: AddItemInput {
                client_mutation_id: token.as_str(),
                content_id: pull_request_id,
                project_id,
            },
        };
        let data: AddItemData = self
            .execute("AddProjectItem", ADD_ITEM_MUTATION, variables)
            .await?;

        Ok(ProjectItem {
            id: data.payload.item.id,
            content_id: Some(pull_request_id.to_string()),
        })
    }

    async fn update_item_field_value(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String> {
        let variables = MutationVariables {
            input: UpdateItemFieldValueInput {
                client_mutation_id: token.as_str(),
                project_id,
                field_id,
                item_id,
                value: FieldValue {
                    single_select_option_id: option_id,
                },
            },
        };
        let data: UpdateItemFieldValueData = self
            .execute(
                "UpdateProjectItemFieldValue",
                UPDATE_ITEM_FIELD_VALUE_MUTATION,
                variables,
            )
            .await?;

        Ok(data.payload.project_v2_item.id)
    }

    async fn delete_project_item(
        &self,
        project_id: &str,
        item_id: &str,
        token: &MutationToken,
    ) -> anyhow::Result<String> {
        let variables = MutationVariables {
            input: DeleteItemInput {
                client_mutation_id: token.as_str(),
                item_id,
                project_id,
            },
        };
        let data: DeleteItemData = self
            .execute("DeleteProjectItem", DELETE_ITEM_MUTATION, variables)
            .await?;

        Ok(data.payload.deleted_item_id)
    }
}
