//! Synchronisation of task sub-resources: attachments, external links,
//! comments and subtasks.
//!
//! Each sub-sync issues its listing call only when something is desired.
//! Local I/O problems are skipped with a warning; remote failures abort.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use tracing::{debug, info};

use super::error::{SyncResult, SyncWarning};
use super::outcome::ReconcileOutcome;
use crate::board::client::{BoardClient, RpcMethod};
use crate::board::client::methods::{
    CreateComment, CreateExternalTaskLink, CreateSubtask, CreateTaskFile, GetAllExternalTaskLinks,
    GetAllSubtasks, GetAllTaskFiles, LINK_DEPENDENCY_RELATED, RemoveTaskFile,
};
use crate::board::domain::{ExternalLinkSpec, FileId, ProjectId, TaskId, UserId};
use crate::board::ports::RpcTransport;

/// Identity of the task whose sub-resources are synchronised.
pub(super) struct Dependents<'a, T>
where
    T: RpcTransport,
{
    pub(super) client: &'a BoardClient<T>,
    pub(super) project_id: ProjectId,
    pub(super) task_id: TaskId,
    pub(super) creator_id: Option<UserId>,
    pub(super) owner_id: Option<UserId>,
}

/// A workspace file that passed the local checks.
struct LocalFile {
    name: String,
    content: Vec<u8>,
}

impl<T> Dependents<'_, T>
where
    T: RpcTransport,
{
    /// Replaces each desired attachment: a remote file with the same name is
    /// removed, then the local content is uploaded.
    pub(super) async fn sync_attachments(
        &self,
        paths: &[Utf8PathBuf],
        workspace: &Dir,
        limit: Option<u64>,
        outcome: &mut ReconcileOutcome,
    ) -> SyncResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut existing: HashMap<String, FileId> = self
            .client
            .send(&GetAllTaskFiles {
                task_id: self.task_id,
            })
            .await?
            .into_vec()
            .into_iter()
            .map(|file| (file.name, file.id))
            .collect();

        for path in paths {
            let file = match read_local(workspace, path, limit) {
                Ok(file) => file,
                Err(warning) => {
                    outcome.warn(warning);
                    continue;
                }
            };

            if let Some(file_id) = existing.remove(&file.name) {
                let removed = self.client.send(&RemoveTaskFile { file_id }).await?;
                if removed.is_acknowledged() {
                    info!(task_id = %self.task_id, file = %file.name, "removed previous attachment");
                } else {
                    outcome.warn(SyncWarning::NotAcknowledged(RemoveTaskFile::NAME));
                }
            }

            let created = self
                .client
                .send(&CreateTaskFile {
                    project_id: self.project_id,
                    task_id: self.task_id,
                    filename: file.name.clone(),
                    blob: STANDARD.encode(&file.content),
                    creator_id: self.creator_id,
                })
                .await?;
            if created.is_acknowledged() {
                info!(task_id = %self.task_id, file = %file.name, "uploaded attachment");
                outcome.uploaded.push(file.name);
            } else {
                outcome.warn(SyncWarning::NotAcknowledged(CreateTaskFile::NAME));
            }
        }
        Ok(())
    }

    /// Creates each desired link whose URL is not already present.
    pub(super) async fn sync_links(
        &self,
        links: &[ExternalLinkSpec],
        outcome: &mut ReconcileOutcome,
    ) -> SyncResult<()> {
        if links.is_empty() {
            return Ok(());
        }
        let mut known: HashSet<String> = self
            .client
            .send(&GetAllExternalTaskLinks {
                task_id: self.task_id,
            })
            .await?
            .into_vec()
            .into_iter()
            .map(|link| link.url)
            .collect();

        for link in links {
            if known.contains(link.url()) {
                debug!(task_id = %self.task_id, url = link.url(), "link already present");
                continue;
            }
            let created = self
                .client
                .send(&CreateExternalTaskLink {
                    task_id: self.task_id,
                    url: link.url().to_owned(),
                    dependency: LINK_DEPENDENCY_RELATED.to_owned(),
                    link_type: link.link_type(),
                    title: link.title().map(str::to_owned),
                    creator_id: self.creator_id,
                })
                .await?;
            if created.is_acknowledged() {
                info!(task_id = %self.task_id, url = link.url(), "created external link");
                known.insert(link.url().to_owned());
                outcome.linked.push(link.url().to_owned());
            } else {
                outcome.warn(SyncWarning::NotAcknowledged(CreateExternalTaskLink::NAME));
            }
        }
        Ok(())
    }

    /// Appends `content` as a new comment. Repeated runs add repeated
    /// comments.
    pub(super) async fn append_comment(
        &self,
        content: &str,
        outcome: &mut ReconcileOutcome,
    ) -> SyncResult<()> {
        let created = self
            .client
            .send(&CreateComment {
                task_id: self.task_id,
                content: content.to_owned(),
                user_id: self.creator_id,
            })
            .await?;
        let Some(comment_id) = created.created() else {
            outcome.warn(SyncWarning::NotAcknowledged(CreateComment::NAME));
            return Ok(());
        };
        info!(task_id = %self.task_id, %comment_id, "added comment");
        outcome.comment_id = Some(comment_id);
        Ok(())
    }

    /// Creates a subtask unless one with the same title and assignee exists.
    pub(super) async fn ensure_subtask(
        &self,
        title: &str,
        outcome: &mut ReconcileOutcome,
    ) -> SyncResult<()> {
        let exists = self
            .client
            .send(&GetAllSubtasks {
                task_id: self.task_id,
            })
            .await?
            .into_vec()
            .iter()
            .any(|subtask| subtask.matches(title, self.owner_id));
        if exists {
            debug!(task_id = %self.task_id, title, "subtask already present");
            return Ok(());
        }

        let created = self
            .client
            .send(&CreateSubtask {
                task_id: self.task_id,
                title: title.to_owned(),
                user_id: self.owner_id,
            })
            .await?;
        let Some(subtask_id) = created.created() else {
            outcome.warn(SyncWarning::NotAcknowledged(CreateSubtask::NAME));
            return Ok(());
        };
        info!(task_id = %self.task_id, %subtask_id, title, "created subtask");
        outcome.subtask_created = true;
        Ok(())
    }
}

fn read_local(
    workspace: &Dir,
    path: &Utf8Path,
    limit: Option<u64>,
) -> Result<LocalFile, SyncWarning> {
    let unreadable = |reason: String| SyncWarning::AttachmentUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let metadata = workspace.metadata(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            SyncWarning::AttachmentMissing(path.to_path_buf())
        } else {
            unreadable(err.to_string())
        }
    })?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_owned()));
    }
    let size = metadata.len();
    if let Some(ceiling) = limit.filter(|ceiling| size > *ceiling) {
        return Err(SyncWarning::AttachmentTooLarge {
            path: path.to_path_buf(),
            size,
            limit: ceiling,
        });
    }
    let name = path
        .file_name()
        .ok_or_else(|| unreadable("path has no file name".to_owned()))?
        .to_owned();
    let content = workspace
        .read(path)
        .map_err(|err| unreadable(err.to_string()))?;
    Ok(LocalFile { name, content })
}
