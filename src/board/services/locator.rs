//! Resolution of human-facing identifiers to remote records.

use tracing::debug;

use super::error::{SyncError, SyncResult};
use crate::board::client::BoardClient;
use crate::board::client::methods::{
    GetColumns, GetProjectByIdentifier, GetTask, GetTaskByReference, GetTaskTags, GetUser,
    GetUserByName,
};
use crate::board::domain::{ProjectId, ProjectSnapshot, RemoteTaskSnapshot, TaskId, UserId};
use crate::board::ports::RpcTransport;

/// Resolves project identifiers, task references and usernames.
///
/// Snapshots are fetched fresh on every call; nothing is cached.
pub struct Locator<T>
where
    T: RpcTransport,
{
    client: BoardClient<T>,
}

impl<T> Clone for Locator<T>
where
    T: RpcTransport,
{
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<T> Locator<T>
where
    T: RpcTransport,
{
    /// Creates a locator sending calls through `client`.
    #[must_use]
    pub const fn new(client: BoardClient<T>) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &BoardClient<T> {
        &self.client
    }

    /// Resolves a project and its ordered column list.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ProjectNotFound`] when the identifier is
    /// unknown, or [`SyncError::Client`] when a remote call fails.
    pub async fn resolve_project(&self, identifier: &str) -> SyncResult<ProjectSnapshot> {
        let project = self.find_project(identifier).await?;
        let columns = self
            .client
            .send(&GetColumns {
                project_id: project.id(),
            })
            .await?
            .into_vec();
        debug!(
            project = identifier,
            project_id = %project.id(),
            columns = columns.len(),
            "resolved project"
        );
        Ok(project.with_columns(columns))
    }

    /// Resolves a project without its columns.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ProjectNotFound`] when the identifier is
    /// unknown, or [`SyncError::Client`] when the remote call fails.
    pub async fn find_project(&self, identifier: &str) -> SyncResult<ProjectSnapshot> {
        self.client
            .send(&GetProjectByIdentifier {
                identifier: identifier.to_owned(),
            })
            .await?
            .ok_or_else(|| SyncError::ProjectNotFound(identifier.to_owned()))
    }

    /// Resolves a task by reference, including its tags.
    ///
    /// Returns `None` when no task carries the reference yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] when a remote call fails.
    pub async fn resolve_task(
        &self,
        project_id: ProjectId,
        reference: &str,
    ) -> SyncResult<Option<RemoteTaskSnapshot>> {
        let task = self
            .client
            .send(&GetTaskByReference {
                project_id,
                reference: reference.to_owned(),
            })
            .await?;
        match task {
            Some(snapshot) => self.with_tags(snapshot).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetches a task by identifier, including its tags.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] when a remote call fails.
    pub async fn fetch_task(&self, task_id: TaskId) -> SyncResult<Option<RemoteTaskSnapshot>> {
        let task = self.client.send(&GetTask { task_id }).await?;
        match task {
            Some(snapshot) => self.with_tags(snapshot).await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolves a username to a user identifier.
    ///
    /// Returns `None` for unknown users.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] when the remote call fails.
    pub async fn resolve_user(&self, username: &str) -> SyncResult<Option<UserId>> {
        let user = self
            .client
            .send(&GetUserByName {
                username: username.to_owned(),
            })
            .await?;
        Ok(user.map(|found| found.id))
    }

    /// Resolves a user identifier to a username.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Client`] when the remote call fails.
    pub async fn user_name(&self, user_id: UserId) -> SyncResult<Option<String>> {
        let user = self.client.send(&GetUser { user_id }).await?;
        Ok(user.map(|found| found.username))
    }

    async fn with_tags(&self, snapshot: RemoteTaskSnapshot) -> SyncResult<RemoteTaskSnapshot> {
        let tags = self
            .client
            .send(&GetTaskTags {
                task_id: snapshot.id(),
            })
            .await?
            .into_set();
        Ok(snapshot.with_tags(tags))
    }
}
