//! Errors raised while reconciling project assignments

use thiserror::Error;

/// Errors that can occur during [`crate::ProjectsAssigner::assign`]
#[derive(Error, Debug)]
pub enum AssignError {
    #[error("Duplicate project title in input: {0}")]
    DuplicateTitle(String),

    #[error("Missing pull request id")]
    MissingPullRequestId,

    #[error("Project '{project}' has no single-select field named '{field}'")]
    StatusFieldMissing { project: String, field: String },

    #[error("Field '{field}' of project '{project}' has no option named '{option}'")]
    StatusOptionMissing {
        project: String,
        field: String,
        option: String,
    },

    #[error("Project '{project}' has no item for pull request {pull_request_id}")]
    ItemNotFound {
        project: String,
        pull_request_id: String,
    },

    /// Any failure reported by the projects client, passed through unchanged
    #[error(transparent)]
    Gateway(#[from] anyhow::Error),
}

/// Coarse classification of an [`AssignError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input was rejected before any remote call
    Input,
    /// A project field, option or item expected to exist was not found
    NotFound,
    /// The remote API failed
    Remote,
}

impl AssignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignError::DuplicateTitle(_) | AssignError::MissingPullRequestId => ErrorKind::Input,
            AssignError::StatusFieldMissing { .. }
            | AssignError::StatusOptionMissing { .. }
            | AssignError::ItemNotFound { .. } => ErrorKind::NotFound,
            AssignError::Gateway(_) => ErrorKind::Remote,
        }
    }
}
