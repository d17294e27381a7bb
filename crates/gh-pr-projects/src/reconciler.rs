//! Converges a pull request's project assignments to a desired title set
//!
//! One [`ProjectsAssigner::assign`] call:
//!
//! 1. fetches the repository's boards and the pull request's assigned boards,
//! 2. adds the pull request to every desired board it is not on yet and sets
//!    the new item's status to the default option,
//! 3. removes it from every assigned board whose title is not desired,
//! 4. re-fetches and returns the assigned boards.
//!
//! Nothing is kept between calls; every call starts from a fresh fetch.

use crate::error::AssignError;
use crate::titles::DesiredTitles;
use gh_projects_client::{
    Board, BoardSummary, FieldOption, MutationToken, ProjectsClient, Repository,
    SingleSelectField,
};
use log::{debug, info, warn};

/// Field and option set on every newly created item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDefaults {
    /// Single-select field name, "Status" on every new project
    pub field: String,

    /// Option name, "Todo" on every new project
    pub option: String,
}

impl Default for StatusDefaults {
    fn default() -> Self {
        Self {
            field: "Status".to_string(),
            option: "Todo".to_string(),
        }
    }
}

/// Additions and removals needed to reach the desired titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<'a> {
    /// Repository boards with a desired title the pull request is not on
    pub to_add: Vec<&'a Board>,

    /// Assigned boards whose title is not desired
    pub to_remove: Vec<&'a BoardSummary>,
}

impl<'a> ReconcilePlan<'a> {
    /// Diff available and assigned boards against the desired titles
    ///
    /// Boards are matched by title. Desired titles without a board are
    /// ignored.
    pub fn compute(
        available: &'a [Board],
        assigned: &'a [BoardSummary],
        desired: &DesiredTitles,
    ) -> Self {
        let is_assigned = |title: &str| assigned.iter().any(|a| a.title == title);

        let to_add = available
            .iter()
            .filter(|board| desired.contains(&board.title))
            .filter(|board| !is_assigned(&board.title))
            .collect();

        let to_remove = assigned
            .iter()
            .filter(|board| !desired.contains(&board.title))
            .collect();

        Self { to_add, to_remove }
    }

    /// True when the pull request already matches the desired titles
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Everything fetched for one `assign` call
struct AssignContext<'a> {
    pull_request_id: &'a str,
    repository: Repository,
    assigned: Vec<BoardSummary>,
}

/// Reconciles project assignments of pull requests in one repository
#[derive(Debug, Clone)]
pub struct ProjectsAssigner<C: ProjectsClient> {
    client: C,
    owner: String,
    repository: String,
    status: StatusDefaults,
    token: MutationToken,
}

impl<C: ProjectsClient> ProjectsAssigner<C> {
    /// Create an assigner for `owner/repository`
    pub fn new(client: C, owner: impl Into<String>, repository: impl Into<String>) -> Self {
        let owner = owner.into();
        let repository = repository.into();
        let token = MutationToken::for_repository(&owner, &repository);

        Self {
            client,
            owner,
            repository,
            status: StatusDefaults::default(),
            token,
        }
    }

    /// Use a different field/option for new items
    pub fn with_status(mut self, status: StatusDefaults) -> Self {
        self.status = status;
        self
    }

    /// Client mutation id sent with every mutation
    pub fn mutation_token(&self) -> &MutationToken {
        &self.token
    }

    /// Assign the pull request to exactly the boards titled in `desired`
    ///
    /// # Returns
    ///
    /// The boards the pull request is assigned to afterwards, as reported
    /// by a fresh fetch.
    ///
    /// # Errors
    ///
    /// Any error aborts the call immediately. Mutations issued before the
    /// failure are not rolled back, so the pull request may be left partially
    /// reconciled; running `assign` again completes the work.
    pub async fn assign(
        &self,
        pull_request_id: &str,
        desired: &DesiredTitles,
    ) -> Result<Vec<BoardSummary>, AssignError> {
        if pull_request_id.trim().is_empty() {
            return Err(AssignError::MissingPullRequestId);
        }

        let context = self.load_context(pull_request_id).await?;
        let plan = ReconcilePlan::compute(&context.repository.boards, &context.assigned, desired);

        for title in desired.iter() {
            if !context.repository.boards.iter().any(|b| b.title == title) {
                warn!(
                    "{}/{} has no project titled '{}', ignoring it",
                    self.owner, self.repository, title
                );
            }
        }

        if plan.is_empty() {
            info!(
                "Pull request {} already matches {} desired projects",
                pull_request_id,
                desired.len()
            );
        } else {
            info!(
                "Pull request {}: adding {} projects, removing {}",
                pull_request_id,
                plan.to_add.len(),
                plan.to_remove.len()
            );
        }

        // Strictly sequential: the API rejects more than ~5 concurrent requests per token.
        for board in &plan.to_add {
            self.add_to_board(&context, board).await?;
        }
        for board in &plan.to_remove {
            self.remove_from_board(&context, board).await?;
        }

        let assigned = self.client.fetch_assigned_projects(pull_request_id).await?;
        debug!(
            "Pull request {} is now assigned to {} projects",
            pull_request_id,
            assigned.len()
        );
        Ok(assigned)
    }

    async fn load_context<'a>(
        &self,
        pull_request_id: &'a str,
    ) -> Result<AssignContext<'a>, AssignError> {
        let repository = self
            .client
            .fetch_repository_and_projects(&self.owner, &self.repository)
            .await?;
        let assigned = self.client.fetch_assigned_projects(pull_request_id).await?;

        debug!(
            "{}/{} has {} projects, pull request {} is on {}",
            self.owner,
            self.repository,
            repository.boards.len(),
            pull_request_id,
            assigned.len()
        );

        Ok(AssignContext {
            pull_request_id,
            repository,
            assigned,
        })
    }

    /// Find the status field and default option of a board
    pub fn resolve_status<'b>(
        &self,
        board: &'b Board,
    ) -> Result<(&'b SingleSelectField, &'b FieldOption), AssignError> {
        let field = board.field_by_name(&self.status.field).ok_or_else(|| {
            AssignError::StatusFieldMissing {
                project: board.title.clone(),
                field: self.status.field.clone(),
            }
        })?;

        let option = field.option_by_name(&self.status.option).ok_or_else(|| {
            AssignError::StatusOptionMissing {
                project: board.title.clone(),
                field: field.name.clone(),
                option: self.status.option.clone(),
            }
        })?;

        Ok((field, option))
    }

    /// Create the item, then set its status; new items start without one
    async fn add_to_board(
        &self,
        context: &AssignContext<'_>,
        board: &Board,
    ) -> Result<(), AssignError> {
        let (field, option) = self.resolve_status(board)?;

        info!("Adding pull request to project '{}'", board.title);
        let item = self
            .client
            .assign_pr_to_project(context.pull_request_id, &board.id, &self.token)
            .await?;

        info!(
            "Setting {} of '{}' to '{}'",
            field.name, board.title, option.name
        );
        self.client
            .update_item_field_value(&board.id, &item.id, &field.id, &option.id, &self.token)
            .await?;

        Ok(())
    }

    async fn remove_from_board(
        &self,
        context: &AssignContext<'_>,
        board: &BoardSummary,
    ) -> Result<(), AssignError> {
        let item = self
            .client
            .fetch_item_for_pr_id(&board.id, context.pull_request_id)
            .await?
            .ok_or_else(|| AssignError::ItemNotFound {
                project: board.title.clone(),
                pull_request_id: context.pull_request_id.to_string(),
            })?;

        info!("Removing pull request from project '{}'", board.title);
        self.client
            .delete_project_item(&board.id, &item.id, &self.token)
            .await?;

        Ok(())
    }
}
