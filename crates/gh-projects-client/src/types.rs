//! GitHub Projects data transfer objects
//!
//! These types represent the project data returned from the GraphQL API,
//! already stripped of the wire envelope (connections, page info, empty
//! field slots). They are intentionally separate from the reconciliation
//! logic to keep this crate pure and reusable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A repository together with the project boards linked to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository node id (e.g., "R_kgDO...")
    pub id: String,

    /// Repository name without owner
    pub name: String,

    /// All project boards linked to the repository (fully paginated)
    pub boards: Vec<Board>,
}

/// A project board (GraphQL `ProjectV2`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Project node id (e.g., "PVT_kwDO...")
    pub id: String,

    /// Human-facing title, used as the matching key
    pub title: String,

    /// Project number within its owner
    pub number: Option<u64>,

    /// Single-select fields found in the fetched field window
    pub fields: Vec<SingleSelectField>,
}

impl Board {
    /// Find a single-select field by its exact name
    ///
    /// Returns `None` when the board has no such field within the fetched
    /// field window.
    pub fn field_by_name(&self, name: &str) -> Option<&SingleSelectField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The id/title view of this board
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

/// A single-select project field (GraphQL `ProjectV2SingleSelectField`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSelectField {
    /// Field node id (e.g., "PVTSSF_...")
    pub id: String,

    /// Field name (e.g., "Status")
    pub name: String,

    /// Selectable options in board order
    pub options: Vec<FieldOption>,
}

impl SingleSelectField {
    /// Find an option by its exact name
    pub fn option_by_name(&self, name: &str) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.name == name)
    }
}

/// One choice of a single-select field (e.g., "Todo", "In Progress", "Done")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Option id, as used by `singleSelectOptionId`
    pub id: String,

    /// Display name
    pub name: String,
}

/// Id and title of a board a pull request is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Project node id
    pub id: String,

    /// Project title
    pub title: String,
}

/// The association record between a pull request and a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItem {
    /// Item node id (e.g., "PVTI_...")
    pub id: String,

    /// Node id of the item content when the content is a pull request
    pub content_id: Option<String>,
}

/// Client mutation id attached to every mutation of one run
///
/// Derived deterministically from the repository so that repeated runs for
/// the same repository are traceable on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationToken(String);

impl MutationToken {
    /// Build the token for a repository
    pub fn for_repository(owner: &str, repository: &str) -> Self {
        Self(format!("assign-to-repository-projects-{owner}-{repository}"))
    }

    /// The token as sent in `clientMutationId`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MutationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_field() -> SingleSelectField {
        SingleSelectField {
            id: "PVTSSF_00000000000000000000001".to_string(),
            name: "Status".to_string(),
            options: vec![
                FieldOption {
                    id: "00000001".to_string(),
                    name: "Todo".to_string(),
                },
                FieldOption {
                    id: "00000002".to_string(),
                    name: "In Progress".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_field_by_name() {
        let board = Board {
            id: "PVT_0000000000000001".to_string(),
            title: "layer-100/bar".to_string(),
            number: Some(1099),
            fields: vec![status_field()],
        };

        assert_eq!(
            board.field_by_name("Status").map(|f| f.id.as_str()),
            Some("PVTSSF_00000000000000000000001")
        );
        assert!(board.field_by_name("status").is_none());
        assert!(board.field_by_name("Priority").is_none());
    }

    #[test]
    fn test_option_by_name() {
        let field = status_field();
        assert_eq!(field.option_by_name("Todo").unwrap().id, "00000001");
        assert!(field.option_by_name("Done").is_none());
    }

    #[test]
    fn test_summary_keeps_id_and_title() {
        let board = Board {
            id: "PVT_1".to_string(),
            title: "layer-200/module-1".to_string(),
            number: None,
            fields: vec![],
        };
        assert_eq!(
            board.summary(),
            BoardSummary {
                id: "PVT_1".to_string(),
                title: "layer-200/module-1".to_string(),
            }
        );
    }

    #[test]
    fn test_mutation_token_is_deterministic() {
        let token = MutationToken::for_repository("acme", "example-repository");
        assert_eq!(
            token.as_str(),
            "assign-to-repository-projects-acme-example-repository"
        );
        assert_eq!(token, MutationToken::for_repository("acme", "example-repository"));
    }
}
