//! Create-or-update reconciliation of a single task.

use cap_std::fs_utf8::Dir;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::dependents::Dependents;
use super::error::{SyncError, SyncResult, SyncWarning};
use super::locator::Locator;
use super::outcome::ReconcileOutcome;
use crate::board::client::{BoardClient, RpcMethod};
use crate::board::client::methods::{CreateTask, MoveTaskPosition, UpdateTask};
use crate::board::domain::{
    DesiredTask, ProjectSnapshot, RemoteTaskSnapshot, TaskSpecification, UserId, resolve_column,
    resolve_swimlane,
};
use crate::board::ports::RpcTransport;
use crate::config::KanboardConfig;

/// Users named by the specification, resolved to remote identifiers.
#[derive(Debug, Clone, Copy)]
struct ResolvedUsers {
    creator_id: Option<UserId>,
    owner_id: Option<UserId>,
}

/// Structural state of the task after creation or update.
struct Structural {
    outcome: ReconcileOutcome,
    /// Owner as read from the service before this run's update; it keys
    /// the subtask.
    owner_id: Option<UserId>,
}

/// Brings a remote task in line with a [`TaskSpecification`].
///
/// Every run checks for the task before creating it, issues at most one
/// owner/tags update and one move for an existing task, then synchronises
/// attachments, links, the comment and the subtask. Remote failures abort
/// the run; changes already applied are not rolled back.
pub struct TaskReconciler<T>
where
    T: RpcTransport,
{
    locator: Locator<T>,
    attachment_limit: Option<u64>,
}

impl<T> TaskReconciler<T>
where
    T: RpcTransport,
{
    /// Creates a reconciler sending calls through `transport`.
    #[must_use]
    pub fn new(transport: Arc<T>, config: &KanboardConfig) -> Self {
        Self {
            locator: Locator::new(BoardClient::new(transport, config.debug_mode())),
            attachment_limit: config.attachment_limit(),
        }
    }

    /// Reconciles the task described by `spec`. Attachment paths are
    /// resolved inside `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] before any remote call when the
    /// specification is invalid, [`SyncError::ProjectNotFound`] for an
    /// unknown project, [`SyncError::CreateFailed`] or
    /// [`SyncError::FetchAfterCreateFailed`] when creation fails, and
    /// [`SyncError::Client`] for any remote or transport failure.
    pub async fn reconcile(
        &self,
        spec: &TaskSpecification,
        workspace: &Dir,
    ) -> SyncResult<ReconcileOutcome> {
        let desired = spec.validate()?;
        info!(
            project = %desired.project_identifier,
            reference = %desired.reference,
            "reconciling task"
        );

        let project = self
            .locator
            .resolve_project(&desired.project_identifier)
            .await?;
        let existing = self
            .locator
            .resolve_task(project.id(), &desired.reference)
            .await?;
        let mut skipped = Vec::new();
        let users = self.resolve_users(&desired, &mut skipped).await?;

        let Structural {
            mut outcome,
            owner_id,
        } = match existing {
            Some(task) => {
                self.update_existing(&project, &desired, users, &task, skipped)
                    .await?
            }
            None => self.create(&project, &desired, users, skipped).await?,
        };

        let dependents = Dependents {
            client: self.locator.client(),
            project_id: project.id(),
            task_id: outcome.task_id(),
            creator_id: users.creator_id,
            owner_id,
        };
        dependents
            .sync_attachments(
                &desired.attachments,
                workspace,
                self.attachment_limit,
                &mut outcome,
            )
            .await?;
        dependents
            .sync_links(&desired.external_links, &mut outcome)
            .await?;
        if let Some(comment) = &desired.comment {
            dependents.append_comment(comment, &mut outcome).await?;
        }
        if let Some(title) = &desired.subtask_title {
            dependents.ensure_subtask(title, &mut outcome).await?;
        }
        Ok(outcome)
    }

    async fn resolve_users(
        &self,
        desired: &DesiredTask,
        skipped: &mut Vec<SyncWarning>,
    ) -> SyncResult<ResolvedUsers> {
        let creator_id = match &desired.creator {
            Some(name) => self.lookup_user(name, skipped).await?,
            None => None,
        };
        let owner_id = match &desired.owner {
            Some(name) if creator_id.is_some() && desired.creator.as_ref() == Some(name) => {
                creator_id
            }
            Some(name) => self.lookup_user(name, skipped).await?,
            None => None,
        };
        Ok(ResolvedUsers {
            creator_id,
            owner_id,
        })
    }

    async fn lookup_user(
        &self,
        username: &str,
        skipped: &mut Vec<SyncWarning>,
    ) -> SyncResult<Option<UserId>> {
        let user_id = self.locator.resolve_user(username).await?;
        if user_id.is_none() {
            warn!(username, "unknown user");
            skipped.push(SyncWarning::UnknownUser(username.to_owned()));
        }
        Ok(user_id)
    }

    async fn create(
        &self,
        project: &ProjectSnapshot,
        desired: &DesiredTask,
        users: ResolvedUsers,
        skipped: Vec<SyncWarning>,
    ) -> SyncResult<Structural> {
        let column = resolve_column(desired.column, project, None);
        let swimlane = resolve_swimlane(desired.swimlane, None);
        let tags = (!desired.tags.is_empty())
            .then(|| desired.tags.apply(&BTreeSet::new()).tags.into_iter().collect());

        let request = CreateTask {
            project_id: project.id(),
            reference: desired.reference.clone(),
            title: desired
                .title
                .clone()
                .unwrap_or_else(|| desired.reference.clone()),
            creator_id: users.creator_id,
            owner_id: users.owner_id.or(users.creator_id),
            description: desired.description.clone(),
            column_id: column.map(|placement| placement.column_id),
            swimlane_id: swimlane.map(|placement| placement.swimlane_id),
            color_id: desired.color.clone(),
            tags,
        };
        let task_id = self
            .locator
            .client()
            .send(&request)
            .await?
            .created()
            .ok_or_else(|| SyncError::CreateFailed {
                reference: desired.reference.clone(),
            })?;
        info!(reference = %desired.reference, %task_id, "created task");

        let task = self
            .locator
            .fetch_task(task_id)
            .await?
            .ok_or(SyncError::FetchAfterCreateFailed { task_id })?;
        Ok(Structural {
            outcome: ReconcileOutcome::new(task.id(), true, task.url(), skipped),
            owner_id: task.owner_id(),
        })
    }

    async fn update_existing(
        &self,
        project: &ProjectSnapshot,
        desired: &DesiredTask,
        users: ResolvedUsers,
        task: &RemoteTaskSnapshot,
        skipped: Vec<SyncWarning>,
    ) -> SyncResult<Structural> {
        let mut outcome = ReconcileOutcome::new(task.id(), false, task.url(), skipped);
        let owner_id = task.owner_id();
        let client = self.locator.client();

        let new_owner = users.owner_id.filter(|owner| task.owner_id() != Some(*owner));
        let tag_diff = (!desired.tags.is_empty()).then(|| desired.tags.apply(task.tags()));
        let tags_changed = tag_diff.as_ref().is_some_and(|diff| diff.changed);

        if new_owner.is_some() || tags_changed {
            let request = UpdateTask {
                id: task.id(),
                owner_id: new_owner.or(owner_id),
                tags: tag_diff.map(|diff| diff.tags.into_iter().collect()),
            };
            if client.send(&request).await?.is_acknowledged() {
                info!(
                    task_id = %task.id(),
                    owner_updated = new_owner.is_some(),
                    tags_updated = tags_changed,
                    "updated task"
                );
                outcome.owner_updated = new_owner.is_some();
                outcome.tags_updated = tags_changed;
            } else {
                outcome.warn(SyncWarning::NotAcknowledged(UpdateTask::NAME));
            }
        }

        let column = resolve_column(desired.column, project, Some(task.column_id()));
        let swimlane = resolve_swimlane(desired.swimlane, task.swimlane_id());
        let column_changed = column.is_some_and(|placement| placement.changed);
        let swimlane_changed = swimlane.is_some_and(|placement| placement.changed);

        if column_changed || swimlane_changed {
            let request = MoveTaskPosition {
                project_id: project.id(),
                task_id: task.id(),
                column_id: column.map_or(task.column_id(), |placement| placement.column_id),
                position: column.map_or_else(
                    || project.position_of(Some(task.column_id())),
                    |placement| placement.position,
                ),
                swimlane_id: swimlane
                    .map(|placement| placement.swimlane_id)
                    .or(task.swimlane_id()),
            };
            if client.send(&request).await?.is_acknowledged() {
                info!(
                    task_id = %task.id(),
                    column_id = %request.column_id,
                    position = request.position,
                    "moved task"
                );
                outcome.moved = true;
            } else {
                outcome.warn(SyncWarning::NotAcknowledged(MoveTaskPosition::NAME));
            }
        }

        Ok(Structural { outcome, owner_id })
    }
}
