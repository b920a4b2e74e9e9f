//! Result of a reconciliation run.

use super::error::SyncWarning;
use crate::board::domain::{CommentId, TaskId};

/// Name of the exported variable carrying the task URL.
pub const TASK_URL_VARIABLE: &str = "KANBOARD_TASKURL";

/// What a reconciliation run changed, plus everything it skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub(crate) task_id: TaskId,
    pub(crate) created: bool,
    pub(crate) owner_updated: bool,
    pub(crate) tags_updated: bool,
    pub(crate) moved: bool,
    pub(crate) uploaded: Vec<String>,
    pub(crate) linked: Vec<String>,
    pub(crate) comment_id: Option<CommentId>,
    pub(crate) subtask_created: bool,
    pub(crate) task_url: Option<String>,
    pub(crate) warnings: Vec<SyncWarning>,
}

impl ReconcileOutcome {
    pub(crate) fn new(
        task_id: TaskId,
        created: bool,
        task_url: Option<&str>,
        warnings: Vec<SyncWarning>,
    ) -> Self {
        Self {
            task_id,
            created,
            owner_updated: false,
            tags_updated: false,
            moved: false,
            uploaded: Vec::new(),
            linked: Vec::new(),
            comment_id: None,
            subtask_created: false,
            task_url: task_url.map(str::to_owned),
            warnings,
        }
    }

    /// Returns the reconciled task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns `true` when the task was created by this run.
    #[must_use]
    pub const fn created(&self) -> bool {
        self.created
    }

    /// Returns `true` when the owner was changed.
    #[must_use]
    pub const fn owner_updated(&self) -> bool {
        self.owner_updated
    }

    /// Returns `true` when the tag set was changed.
    #[must_use]
    pub const fn tags_updated(&self) -> bool {
        self.tags_updated
    }

    /// Returns `true` when the task was moved.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    /// Names of the files uploaded by this run.
    #[must_use]
    pub fn uploaded(&self) -> &[String] {
        &self.uploaded
    }

    /// URLs of the external links created by this run.
    #[must_use]
    pub fn linked(&self) -> &[String] {
        &self.linked
    }

    /// Identifier of the appended comment.
    #[must_use]
    pub const fn comment_id(&self) -> Option<CommentId> {
        self.comment_id
    }

    /// Returns `true` when a subtask was created.
    #[must_use]
    pub const fn subtask_created(&self) -> bool {
        self.subtask_created
    }

    /// Task URL reported by the remote service.
    #[must_use]
    pub fn task_url(&self) -> Option<&str> {
        self.task_url.as_deref()
    }

    /// Skipped steps, in the order they occurred.
    #[must_use]
    pub fn warnings(&self) -> &[SyncWarning] {
        &self.warnings
    }

    /// Variables exported to the calling build.
    #[must_use]
    pub fn environment(&self) -> Vec<(String, String)> {
        self.task_url
            .iter()
            .map(|url| (TASK_URL_VARIABLE.to_owned(), url.clone()))
            .collect()
    }

    pub(crate) fn warn(&mut self, warning: SyncWarning) {
        tracing::warn!(task_id = %self.task_id, %warning, "skipped");
        self.warnings.push(warning);
    }
}
