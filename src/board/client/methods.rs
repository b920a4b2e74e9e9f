//! One request type per remote method.
//!
//! Each request serialises to the method's named parameter object and
//! declares the type its result decodes into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::results::{Acknowledged, CreateOutcome, RemoteList, TaskTags};
use crate::board::domain::{
    Column, ColumnId, CommentId, ExternalLink, FileId, LinkType, ProjectId, ProjectSnapshot,
    RemoteTaskSnapshot, RemoteUser, Subtask, SubtaskId, SwimlaneId, TaskFile, TaskId, UserId,
};

/// A remote method with a typed parameter object and result.
pub trait RpcMethod: Serialize {
    /// Remote method name.
    const NAME: &'static str;
    /// Decoded result type.
    type Output: DeserializeOwned;
}

macro_rules! rpc_method {
    ($request:ident, $name:literal, $output:ty) => {
        impl RpcMethod for $request {
            const NAME: &'static str = $name;
            type Output = $output;
        }
    };
}

/// Looks up a project by its human-facing identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProjectByIdentifier {
    /// Project identifier.
    pub identifier: String,
}
rpc_method!(GetProjectByIdentifier, "getProjectByIdentifier", Option<ProjectSnapshot>);

/// Lists the columns of a project in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetColumns {
    /// Project to inspect.
    pub project_id: ProjectId,
}
rpc_method!(GetColumns, "getColumns", RemoteList<Column>);

/// Looks up a task by reference within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskByReference {
    /// Project holding the task.
    pub project_id: ProjectId,
    /// Task reference.
    pub reference: String,
}
rpc_method!(GetTaskByReference, "getTaskByReference", Option<RemoteTaskSnapshot>);

/// Looks up a task by reference, keeping every field of the service's task
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskRecordByReference {
    /// Project holding the task.
    pub project_id: ProjectId,
    /// Task reference.
    pub reference: String,
}
rpc_method!(GetTaskRecordByReference, "getTaskByReference", Option<Map<String, Value>>);

/// Fetches a task by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTask {
    /// Task to fetch.
    pub task_id: TaskId,
}
rpc_method!(GetTask, "getTask", Option<RemoteTaskSnapshot>);

/// Lists the tags of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskTags {
    /// Task to inspect.
    pub task_id: TaskId,
}
rpc_method!(GetTaskTags, "getTaskTags", TaskTags);

/// Looks up a user by login name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserByName {
    /// Login name.
    pub username: String,
}
rpc_method!(GetUserByName, "getUserByName", Option<RemoteUser>);

/// Looks up a user by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUser {
    /// User to fetch.
    pub user_id: UserId,
}
rpc_method!(GetUser, "getUser", Option<RemoteUser>);

/// Creates a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    /// Project receiving the task.
    pub project_id: ProjectId,
    /// Task reference.
    pub reference: String,
    /// Task title.
    pub title: String,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<UserId>,
    /// Owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
    /// Initial swimlane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimlane_id: Option<SwimlaneId>,
    /// Color identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    /// Initial tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
rpc_method!(CreateTask, "createTask", CreateOutcome<TaskId>);

/// Updates the owner and tags of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Task to update.
    pub id: TaskId,
    /// New owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Full replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
rpc_method!(UpdateTask, "updateTask", Acknowledged);

/// Moves a task to a column and swimlane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTaskPosition {
    /// Project holding the task.
    pub project_id: ProjectId,
    /// Task to move.
    pub task_id: TaskId,
    /// Target column.
    pub column_id: ColumnId,
    /// Target position.
    pub position: u32,
    /// Target swimlane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimlane_id: Option<SwimlaneId>,
}
rpc_method!(MoveTaskPosition, "moveTaskPosition", Acknowledged);

/// Lists the files attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllTaskFiles {
    /// Task to inspect.
    pub task_id: TaskId,
}
rpc_method!(GetAllTaskFiles, "getAllTaskFiles", RemoteList<TaskFile>);

/// Uploads a file to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskFile {
    /// Project holding the task.
    pub project_id: ProjectId,
    /// Task receiving the file.
    pub task_id: TaskId,
    /// File name.
    pub filename: String,
    /// Base64-encoded file content.
    pub blob: String,
    /// Uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<UserId>,
}
rpc_method!(CreateTaskFile, "createTaskFile", Acknowledged);

/// Removes a file from a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTaskFile {
    /// File to remove.
    pub file_id: FileId,
}
rpc_method!(RemoveTaskFile, "removeTaskFile", Acknowledged);

/// Downloads the base64-encoded content of a task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTaskFile {
    /// File to download.
    pub file_id: FileId,
}
rpc_method!(DownloadTaskFile, "downloadTaskFile", Option<String>);

/// Lists the external links of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllExternalTaskLinks {
    /// Task to inspect.
    pub task_id: TaskId,
}
rpc_method!(GetAllExternalTaskLinks, "getAllExternalTaskLinks", RemoteList<ExternalLink>);

/// Dependency kind sent with every external link.
pub const LINK_DEPENDENCY_RELATED: &str = "related";

/// Creates an external link on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExternalTaskLink {
    /// Task receiving the link.
    pub task_id: TaskId,
    /// Link target.
    pub url: String,
    /// Dependency kind.
    pub dependency: String,
    /// Link type.
    #[serde(rename = "type")]
    pub link_type: LinkType,
    /// Link title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<UserId>,
}
rpc_method!(CreateExternalTaskLink, "createExternalTaskLink", Acknowledged);

/// Appends a comment to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComment {
    /// Task receiving the comment.
    pub task_id: TaskId,
    /// Comment text.
    pub content: String,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}
rpc_method!(CreateComment, "createComment", CreateOutcome<CommentId>);

/// Lists the subtasks of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllSubtasks {
    /// Task to inspect.
    pub task_id: TaskId,
}
rpc_method!(GetAllSubtasks, "getAllSubtasks", RemoteList<Subtask>);

/// Creates a subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubtask {
    /// Parent task.
    pub task_id: TaskId,
    /// Subtask title.
    pub title: String,
    /// Assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}
rpc_method!(CreateSubtask, "createSubtask", CreateOutcome<SubtaskId>);

/// Searches a project's tasks with a query expression.
///
/// Candidates are returned undecoded so a single malformed task can be
/// skipped without failing the whole search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTasks {
    /// Project to search.
    pub project_id: ProjectId,
    /// Query expression.
    pub query: String,
}
rpc_method!(SearchTasks, "searchTasks", RemoteList<Value>);
