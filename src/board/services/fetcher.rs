//! Download of a task's snapshot and attachments into the workspace.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{SyncError, SyncResult, SyncWarning};
use super::locator::Locator;
use crate::board::client::methods::{DownloadTaskFile, GetAllTaskFiles, GetTaskRecordByReference};
use crate::board::client::{BoardClient, BoardClientError, RpcMethod};
use crate::board::domain::{BoardDomainError, FileId, RemoteTaskSnapshot, TaskId};
use crate::board::ports::RpcTransport;
use crate::config::KanboardConfig;

/// Workspace directory holding everything fetched from the board.
pub const FETCH_BASE_DIR: &str = "kanboard";
/// Subdirectory of a task directory holding downloaded attachments.
pub const ATTACHMENTS_DIR: &str = "attachments";
/// File name of the task snapshot document.
///
/// The document is the task object exactly as the service returned it, with
/// the downloaded paths added under [`ATTACHMENTS_FIELD`].
pub const TASK_JSON_FILE_NAME: &str = "data.json";
/// Task document field listing the downloaded attachment paths.
pub const ATTACHMENTS_FIELD: &str = "attachments";

/// Exported variable names.
pub mod variables {
    /// Remote task identifier.
    pub const ID: &str = "KANBOARD_ID";
    /// Task title.
    pub const TITLE: &str = "KANBOARD_TITLE";
    /// Creator username.
    pub const CREATOR: &str = "KANBOARD_CREATOR";
    /// Owner username.
    pub const OWNER: &str = "KANBOARD_OWNER";
    /// Comma-separated downloaded file paths.
    pub const FILES: &str = "KANBOARD_FILES";
    /// Path of the task snapshot document.
    pub const TASK_JSON: &str = "KANBOARD_TASKJSON";
}

/// Which task to fetch and which of its attachments to download.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchRequest {
    project_identifier: String,
    reference: String,
    attachments: Vec<String>,
}

impl FetchRequest {
    /// Fetches task `reference` from project `project_identifier`.
    #[must_use]
    pub fn new(project_identifier: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            project_identifier: project_identifier.into(),
            reference: reference.into(),
            attachments: Vec::new(),
        }
    }

    /// Sets the remote file names to download.
    #[must_use]
    pub fn with_attachments(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.attachments = names
            .into_iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }
}

/// A fetched task and the files written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedTask {
    task: RemoteTaskSnapshot,
    record: Map<String, Value>,
    creator_name: Option<String>,
    owner_name: Option<String>,
    files: Vec<Utf8PathBuf>,
    task_json_path: Utf8PathBuf,
    warnings: Vec<SyncWarning>,
}

impl FetchedTask {
    /// Returns the task snapshot.
    #[must_use]
    pub const fn task(&self) -> &RemoteTaskSnapshot {
        &self.task
    }

    /// Returns the task object as the service returned it.
    #[must_use]
    pub const fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Returns the creator's username, if resolved.
    #[must_use]
    pub fn creator_name(&self) -> Option<&str> {
        self.creator_name.as_deref()
    }

    /// Returns the owner's username, if resolved.
    #[must_use]
    pub fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_deref()
    }

    /// Workspace-relative paths of the downloaded attachments.
    #[must_use]
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Workspace-relative path of the task snapshot document.
    #[must_use]
    pub fn task_json_path(&self) -> &Utf8Path {
        &self.task_json_path
    }

    /// Skipped downloads.
    #[must_use]
    pub fn warnings(&self) -> &[SyncWarning] {
        &self.warnings
    }

    /// Variables exported to the calling build.
    #[must_use]
    pub fn environment(&self) -> Vec<(String, String)> {
        let mut vars = vec![(variables::ID.to_owned(), self.task.id().to_string())];
        if let Some(creator) = &self.creator_name {
            vars.push((variables::CREATOR.to_owned(), creator.clone()));
        }
        if let Some(owner) = &self.owner_name {
            vars.push((variables::OWNER.to_owned(), owner.clone()));
        }
        if !self.task.title().trim().is_empty() {
            vars.push((variables::TITLE.to_owned(), self.task.title().to_owned()));
        }
        if !self.files.is_empty() {
            let joined = self
                .files
                .iter()
                .map(|path| path.as_str())
                .collect::<Vec<_>>()
                .join(",");
            vars.push((variables::FILES.to_owned(), joined));
        }
        vars.push((
            variables::TASK_JSON.to_owned(),
            self.task_json_path.to_string(),
        ));
        vars
    }
}

/// Fetches a task by reference into a workspace.
pub struct TaskFetcher<T>
where
    T: RpcTransport,
{
    locator: Locator<T>,
}

impl<T> TaskFetcher<T>
where
    T: RpcTransport,
{
    /// Creates a fetcher sending calls through `transport`.
    #[must_use]
    pub fn new(transport: Arc<T>, config: &KanboardConfig) -> Self {
        Self {
            locator: Locator::new(BoardClient::new(transport, config.debug_mode())),
        }
    }

    /// Fetches the requested task, downloads the requested attachments and
    /// writes the task document under `kanboard/<task id>/`.
    ///
    /// Returns `None` when no task carries the reference.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] for a blank project or reference,
    /// [`SyncError::ProjectNotFound`] for an unknown project,
    /// [`SyncError::Client`] when a remote call fails, and
    /// [`SyncError::Workspace`] when the task document cannot be written.
    pub async fn fetch(
        &self,
        request: &FetchRequest,
        workspace: &Dir,
    ) -> SyncResult<Option<FetchedTask>> {
        let project_identifier = required(&request.project_identifier, "project identifier")?;
        let reference = required(&request.reference, "task reference")?;

        let project = self.locator.find_project(project_identifier).await?;
        let Some(record) = self
            .locator
            .client()
            .send(&GetTaskRecordByReference {
                project_id: project.id(),
                reference: reference.to_owned(),
            })
            .await?
        else {
            warn!(project = project_identifier, reference, "task not found");
            return Ok(None);
        };
        let task: RemoteTaskSnapshot = serde_json::from_value(Value::Object(record.clone()))
            .map_err(|err| BoardClientError::codec(GetTaskRecordByReference::NAME, err))?;

        let creator_name = match task.creator_id() {
            Some(creator_id) => self.locator.user_name(creator_id).await?,
            None => None,
        };
        let owner_name = match task.owner_id() {
            Some(owner_id) if task.creator_id() == Some(owner_id) => creator_name.clone(),
            Some(owner_id) => self.locator.user_name(owner_id).await?,
            None => None,
        };

        let mut warnings = Vec::new();
        let files = self
            .download_attachments(task.id(), &request.attachments, workspace, &mut warnings)
            .await?;

        let task_dir = task_dir(task.id());
        let task_json_path = task_dir.join(TASK_JSON_FILE_NAME);
        let mut document = record.clone();
        document.insert(
            ATTACHMENTS_FIELD.to_owned(),
            files.iter().map(|path| Value::from(path.as_str())).collect(),
        );
        let encoded = serde_json::to_vec_pretty(&document)
            .map_err(|err| SyncError::workspace(&task_json_path, std::io::Error::other(err)))?;
        write_file(workspace, &task_json_path, &encoded)
            .map_err(|err| SyncError::workspace(&task_json_path, err))?;
        info!(task_id = %task.id(), path = %task_json_path, files = files.len(), "fetched task");

        Ok(Some(FetchedTask {
            task,
            record,
            creator_name,
            owner_name,
            files,
            task_json_path,
            warnings,
        }))
    }

    async fn download_attachments(
        &self,
        task_id: TaskId,
        names: &[String],
        workspace: &Dir,
        warnings: &mut Vec<SyncWarning>,
    ) -> SyncResult<Vec<Utf8PathBuf>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let client = self.locator.client();
        let remote: HashMap<String, FileId> = client
            .send(&GetAllTaskFiles { task_id })
            .await?
            .into_vec()
            .into_iter()
            .map(|file| (file.name, file.id))
            .collect();

        let mut written = Vec::new();
        for name in names {
            let Some(&file_id) = remote.get(name) else {
                continue;
            };
            let encoded = client.send(&DownloadTaskFile { file_id }).await?;
            let Some(encoded) = encoded.filter(|content| !content.trim().is_empty()) else {
                continue;
            };
            let path = task_dir(task_id)
                .join(ATTACHMENTS_DIR)
                .join(file_id.to_string())
                .join(name);
            let stored = STANDARD
                .decode(encoded.trim())
                .map_err(|err| err.to_string())
                .and_then(|content| {
                    write_file(workspace, &path, &content).map_err(|err| err.to_string())
                });
            match stored {
                Ok(()) => {
                    info!(%task_id, %file_id, path = %path, "downloaded attachment");
                    written.push(path);
                }
                Err(reason) => {
                    let warning = SyncWarning::DownloadFailed {
                        name: name.clone(),
                        reason,
                    };
                    warn!(%task_id, %warning, "skipped");
                    warnings.push(warning);
                }
            }
        }
        Ok(written)
    }
}

fn task_dir(task_id: TaskId) -> Utf8PathBuf {
    Utf8Path::new(FETCH_BASE_DIR).join(task_id.to_string())
}

fn write_file(workspace: &Dir, path: &Utf8Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        workspace.create_dir_all(parent)?;
    }
    workspace.write(path, content)
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, BoardDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::MissingField(field));
    }
    Ok(trimmed)
}
