//! Service-level errors and skippable-condition reports.

use camino::Utf8PathBuf;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::board::client::BoardClientError;
use crate::board::domain::{BoardDomainError, TaskId};

/// Fatal failures that abort a reconciliation, poll or fetch.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The desired specification was rejected before any remote call.
    #[error("invalid task specification: {0}")]
    Validation(#[from] BoardDomainError),

    /// The project identifier did not resolve.
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    /// The remote service declined to create the task.
    #[error("remote service declined to create task '{reference}'")]
    CreateFailed {
        /// Reference of the task that could not be created.
        reference: String,
    },

    /// The task was created but could not be read back.
    #[error("task {task_id} was created but could not be fetched")]
    FetchAfterCreateFailed {
        /// Identifier returned by the create call.
        task_id: TaskId,
    },

    /// A remote call failed or could not be delivered.
    #[error(transparent)]
    Client(#[from] BoardClientError),

    /// A required local write failed.
    #[error("workspace write to '{path}' failed: {source}")]
    Workspace {
        /// Workspace-relative path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },
}

impl SyncError {
    /// Wraps a fatal workspace I/O failure.
    #[must_use]
    pub fn workspace(path: impl Into<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::Workspace {
            path: path.into(),
            source: Arc::new(err),
        }
    }
}

/// Result type for synchronisation services.
pub type SyncResult<T> = Result<T, SyncError>;

/// A skipped step reported alongside an otherwise successful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// A desired attachment does not exist in the workspace.
    AttachmentMissing(Utf8PathBuf),
    /// A desired attachment exceeds the configured ceiling.
    AttachmentTooLarge {
        /// Workspace-relative path.
        path: Utf8PathBuf,
        /// File size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },
    /// A desired attachment could not be read.
    AttachmentUnreadable {
        /// Workspace-relative path.
        path: Utf8PathBuf,
        /// I/O failure description.
        reason: String,
    },
    /// A downloaded attachment could not be decoded or written.
    DownloadFailed {
        /// Remote file name.
        name: String,
        /// Failure description.
        reason: String,
    },
    /// A named user does not exist remotely.
    UnknownUser(String),
    /// The remote service answered `false` to a mutation.
    NotAcknowledged(&'static str),
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttachmentMissing(path) => write!(f, "attachment '{path}' does not exist"),
            Self::AttachmentTooLarge { path, size, limit } => write!(
                f,
                "attachment '{path}' is {size} bytes, above the {limit} byte limit"
            ),
            Self::AttachmentUnreadable { path, reason } => {
                write!(f, "attachment '{path}' could not be read: {reason}")
            }
            Self::DownloadFailed { name, reason } => {
                write!(f, "file '{name}' could not be downloaded: {reason}")
            }
            Self::UnknownUser(name) => write!(f, "user '{name}' does not exist"),
            Self::NotAcknowledged(method) => write!(f, "{method} was not acknowledged"),
        }
    }
}
