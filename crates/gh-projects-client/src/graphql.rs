//! GraphQL documents and wire types for the GitHub Projects (V2) API
//!
//! Documents are fixed strings; every value (ids, cursors, mutation input)
//! travels in `variables`. The wire types mirror the response shape exactly
//! and are converted to the types in [`crate::types`] before leaving this
//! crate.

use crate::types::{Board, BoardSummary, FieldOption, ProjectItem, SingleSelectField};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Page size used for every paginated connection
pub const PAGE_SIZE: u8 = 100;

/// Number of field slots fetched per board
///
/// The default `Status` field is always among the first fields of a board.
pub const FIELD_SLOTS: u8 = 5;

pub const REPOSITORY_PROJECTS_QUERY: &str = r#"
query RepositoryProjects($owner: String!, $name: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    name
    id
    projectsV2(first: 100, after: $cursor) {
      nodes {
        id
        title
        number
        fields(first: 5) {
          nodes {
            ... on ProjectV2SingleSelectField {
              id
              name
              options {
                id
                name
              }
            }
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

pub const ASSIGNED_PROJECTS_QUERY: &str = r#"
query AssignedProjects($id: ID!, $cursor: String) {
  node(id: $id) {
    ... on PullRequest {
      number
      projectsV2(first: 100, after: $cursor) {
        nodes {
          id
          title
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
"#;

pub const PROJECT_ITEMS_QUERY: &str = r#"
query ProjectItems($id: ID!, $cursor: String) {
  node(id: $id) {
    ... on ProjectV2 {
      number
      items(first: 100, after: $cursor) {
        nodes {
          id
          content {
            ... on PullRequest {
              id
            }
          }
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
}
"#;

pub const ADD_ITEM_MUTATION: &str = r#"
mutation AddProjectItem($input: AddProjectV2ItemByIdInput!) {
  addProjectV2ItemById(input: $input) {
    item {
      id
    }
  }
}
"#;

pub const UPDATE_ITEM_FIELD_VALUE_MUTATION: &str = r#"
mutation UpdateProjectItemFieldValue($input: UpdateProjectV2ItemFieldValueInput!) {
  updateProjectV2ItemFieldValue(input: $input) {
    projectV2Item {
      id
    }
  }
}
"#;

pub const DELETE_ITEM_MUTATION: &str = r#"
mutation DeleteProjectItem($input: DeleteProjectV2ItemInput!) {
  deleteProjectV2Item(input: $input) {
    deletedItemId
  }
}
"#;

// === Request envelope ===

/// Body of a GraphQL POST request
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// Variables of a paginated query addressing a node by id
#[derive(Debug, Clone, Serialize)]
pub struct NodeVariables<'a> {
    pub id: &'a str,
    pub cursor: Option<&'a str>,
}

/// Variables of the repository query
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub cursor: Option<&'a str>,
}

/// Variables of every mutation: a single `$input` object
#[derive(Debug, Clone, Serialize)]
pub struct MutationVariables<I: Serialize> {
    pub input: I,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput<'a> {
    pub client_mutation_id: &'a str,
    pub content_id: &'a str,
    pub project_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemFieldValueInput<'a> {
    pub client_mutation_id: &'a str,
    pub project_id: &'a str,
    pub field_id: &'a str,
    pub item_id: &'a str,
    pub value: FieldValue<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue<'a> {
    pub single_select_option_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemInput<'a> {
    pub client_mutation_id: &'a str,
    pub item_id: &'a str,
    pub project_id: &'a str,
}

// === Response envelope ===

/// Body of a GraphQL response
///
/// GitHub answers GraphQL errors with HTTP 200, so `errors` must be checked
/// explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl<T> GraphQLResponse<T> {
    /// Unwrap `data`, turning reported errors into a single error
    pub fn into_data(self) -> anyhow::Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self
                .errors
                .iter()
                .map(|e| match &e.kind {
                    Some(kind) => format!("{} ({})", e.message, kind),
                    None => e.message.clone(),
                })
                .collect();
            return Err(anyhow!("GraphQL error: {}", messages.join("; ")));
        }

        self.data
            .ok_or_else(|| anyhow!("GraphQL response contained neither data nor errors"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A paginated connection; inaccessible nodes are reported as `null`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Split into the page's nodes and the cursor of the next page, if any
    pub fn into_page(self) -> (Vec<T>, Option<String>) {
        let next = if self.page_info.has_next_page {
            self.page_info.end_cursor
        } else {
            None
        };
        (self.nodes.into_iter().flatten().collect(), next)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "projectsV2")]
    pub projects: Connection<BoardNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardNode {
    pub id: String,
    pub title: String,
    pub number: Option<u64>,
    pub fields: Option<FieldConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldConnection {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<FieldNode>>,
}

/// One field slot; non single-select fields arrive as `{}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub options: Option<Vec<FieldOption>>,
}

impl FieldNode {
    fn into_single_select(self) -> Option<SingleSelectField> {
        Some(SingleSelectField {
            id: self.id?,
            name: self.name?,
            options: self.options?,
        })
    }
}

impl From<BoardNode> for Board {
    fn from(node: BoardNode) -> Self {
        let fields = node
            .fields
            .map(|connection| {
                connection
                    .nodes
                    .into_iter()
                    .flatten()
                    .filter_map(FieldNode::into_single_select)
                    .collect()
            })
            .unwrap_or_default();

        Board {
            id: node.id,
            title: node.title,
            number: node.number,
            fields,
        }
    }
}

/// Response of queries rooted at `node(id:)`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeData<T> {
    pub node: Option<T>,
}

/// A node seen through the `... on PullRequest` fragment
///
/// `projects` is absent when the node is not a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestNode {
    #[serde(rename = "projectsV2")]
    pub projects: Option<Connection<BoardSummary>>,
}

/// A node seen through the `... on ProjectV2` fragment
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectNode {
    pub items: Option<Connection<ItemNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemNode {
    pub id: String,
    pub content: Option<ItemContent>,
}

/// Item content; `id` is only present for pull requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemContent {
    pub id: Option<String>,
}

impl From<ItemNode> for ProjectItem {
    fn from(node: ItemNode) -> Self {
        ProjectItem {
            id: node.id,
            content_id: node.content.and_then(|c| c.id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdNode {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    pub payload: AddItemPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddItemPayload {
    pub item: IdNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemFieldValueData {
    #[serde(rename = "updateProjectV2ItemFieldValue")]
    pub payload: UpdateItemFieldValuePayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemFieldValuePayload {
    pub project_v2_item: IdNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteItemData {
    #[serde(rename = "deleteProjectV2Item")]
    pub payload: DeleteItemPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemPayload {
    pub deleted_item_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repository_response_skips_placeholder_fields() {
        let body = json!({
            "data": {
                "repository": {
                    "name": "example-repository",
                    "id": "R_0000000001",
                    "projectsV2": {
                        "nodes": [{
                            "id": "PVT_0000000000000001",
                            "title": "layer-100/bar",
                            "number": 1099,
                            "fields": {
                                "nodes": [
                                    {},
                                    {},
                                    {
                                        "id": "PVTSSF_00000000000000000000001",
                                        "name": "Status",
                                        "options": [
                                            { "id": "00000001", "name": "Todo" },
                                            { "id": "00000002", "name": "In Progress" },
                                            { "id": "00000003", "name": "Done" }
                                        ]
                                    },
                                    {},
                                    {}
                                ]
                            }
                        }],
                        "pageInfo": { "hasNextPage": false, "endCursor": "Nw" }
                    }
                }
            }
        });

        let response: GraphQLResponse<RepositoryData> = serde_json::from_value(body).unwrap();
        let repository = response.into_data().unwrap().repository.unwrap();
        assert_eq!(repository.id, "R_0000000001");

        let (nodes, next) = repository.projects.into_page();
        assert!(next.is_none());

        let boards: Vec<Board> = nodes.into_iter().map(Board::from).collect();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].number, Some(1099));
        assert_eq!(boards[0].fields.len(), 1);

        let status = boards[0].field_by_name("Status").unwrap();
        assert_eq!(status.option_by_name("Todo").unwrap().id, "00000001");
        assert_eq!(status.options.len(), 3);
    }

    #[test]
    fn test_board_without_fields_connection() {
        let node: BoardNode = serde_json::from_value(json!({
            "id": "PVT_000000000000002",
            "title": "layer-100/module-2"
        }))
        .unwrap();

        let board = Board::from(node);
        assert!(board.fields.is_empty());
        assert!(board.number.is_none());
    }

    #[test]
    fn test_into_page_returns_cursor_only_when_more_pages() {
        let more: Connection<BoardSummary> = serde_json::from_value(json!({
            "nodes": [{ "id": "PVT_1", "title": "a" }, null],
            "pageInfo": { "hasNextPage": true, "endCursor": "MQ" }
        }))
        .unwrap();
        let (nodes, next) = more.into_page();
        assert_eq!(nodes.len(), 1);
        assert_eq!(next.as_deref(), Some("MQ"));

        let last: Connection<BoardSummary> = serde_json::from_value(json!({
            "nodes": [],
            "pageInfo": { "hasNextPage": false, "endCursor": "Mg" }
        }))
        .unwrap();
        let (nodes, next) = last.into_page();
        assert!(nodes.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn test_item_content_other_than_pull_request() {
        let connection: Connection<ItemNode> = serde_json::from_value(json!({
            "nodes": [
                { "id": "PVTI_1", "content": {} },
                { "id": "PVTI_2", "content": null },
                { "id": "PVTI_3", "content": { "id": "PR_0000000000000001" } }
            ],
            "pageInfo": { "hasNextPage": false, "endCursor": null }
        }))
        .unwrap();

        let (nodes, _) = connection.into_page();
        let items: Vec<ProjectItem> = nodes.into_iter().map(ProjectItem::from).collect();
        assert_eq!(items[0].content_id, None);
        assert_eq!(items[1].content_id, None);
        assert_eq!(items[2].content_id.as_deref(), Some("PR_0000000000000001"));
    }

    #[test]
    fn test_non_pull_request_node_has_no_projects() {
        let data: NodeData<PullRequestNode> =
            serde_json::from_value(json!({ "node": {} })).unwrap();
        assert!(data.node.unwrap().projects.is_none());
    }

    #[test]
    fn test_errors_take_precedence_over_data() {
        let response: GraphQLResponse<DeleteItemData> = serde_json::from_value(json!({
            "data": null,
            "errors": [
                { "type": "NOT_FOUND", "message": "Could not resolve to a node" },
                { "message": "second" }
            ]
        }))
        .unwrap();

        let err = response.into_data().unwrap_err().to_string();
        assert_eq!(
            err,
            "GraphQL error: Could not resolve to a node (NOT_FOUND); second"
        );
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let response: GraphQLResponse<DeleteItemData> =
            serde_json::from_value(json!({})).unwrap();
        assert!(response.into_data().is_err());
    }

    #[test]
    fn test_mutation_payloads() {
        let add: GraphQLResponse<AddItemData> = serde_json::from_value(json!({
            "data": { "addProjectV2ItemById": { "item": { "id": "PVTI_0000000000000001" } } }
        }))
        .unwrap();
        assert_eq!(add.into_data().unwrap().payload.item.id, "PVTI_0000000000000001");

        let delete: GraphQLResponse<DeleteItemData> = serde_json::from_value(json!({
            "data": { "deleteProjectV2Item": { "deletedItemId": "PVTI_00000000000000000000000" } }
        }))
        .unwrap();
        assert_eq!(
            delete.into_data().unwrap().payload.deleted_item_id,
            "PVTI_00000000000000000000000"
        );
    }

    #[test]
    fn test_update_input_serialization() {
        let payload = GraphQLPayload {
            query: UPDATE_ITEM_FIELD_VALUE_MUTATION,
            variables: MutationVariables {
                input: UpdateItemFieldValueInput {
                    client_mutation_id: "foo",
                    project_id: "PVT_1",
                    field_id: "PVTSSF_1",
                    item_id: "PVTI_1",
                    value: FieldValue {
                        single_select_option_id: "00000001",
                    },
                },
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["variables"],
            json!({
                "input": {
                    "clientMutationId": "foo",
                    "projectId": "PVT_1",
                    "fieldId": "PVTSSF_1",
                    "itemId": "PVTI_1",
                    "value": { "singleSelectOptionId": "00000001" }
                }
            })
        );
    }

    #[test]
    fn test_first_page_sends_null_cursor() {
        let variables = serde_json::to_value(NodeVariables {
            id: "PR_1",
            cursor: None,
        })
        .unwrap();
        assert_eq!(variables, json!({ "id": "PR_1", "cursor": null }));
    }

    #[test]
    fn test_documents_use_the_shared_page_size() {
        let first = format!("first: {}", PAGE_SIZE);
        assert!(REPOSITORY_PROJECTS_QUERY.contains(&first));
        assert!(ASSIGNED_PROJECTS_QUERY.contains(&first));
        assert!(PROJECT_ITEMS_QUERY.contains(&first));
        assert!(REPOSITORY_PROJECTS_QUERY.contains(&format!("fields(first: {})", FIELD_SLOTS)));
    }
}
