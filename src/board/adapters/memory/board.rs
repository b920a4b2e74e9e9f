//! In-memory simulation of the remote board service.
//!
//! The board answers the same methods as the real service, encodes
//! identifiers as numeric strings the way the service does, and records
//! every call so tests can assert on the exact sequence of remote
//! interactions. Search queries are recorded but not interpreted: a search
//! returns every task of the project plus any injected raw candidates.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::board::adapters::jsonrpc::JsonRpcResponse;
use crate::board::client::methods::{
    CreateComment, CreateExternalTaskLink, CreateSubtask, CreateTask, CreateTaskFile,
    DownloadTaskFile, GetAllExternalTaskLinks, GetAllSubtasks, GetAllTaskFiles, GetColumns,
    GetProjectByIdentifier, GetTask, GetTaskByReference, GetTaskTags, GetUser, GetUserByName,
    LINK_DEPENDENCY_RELATED, MoveTaskPosition, RemoveTaskFile, RpcMethod, SearchTasks,
    UpdateTask,
};
use crate::board::domain::{
    Column, ColumnId, ExternalLink, FileId, LinkId, LinkType, ProjectId, RemoteTaskSnapshot,
    Subtask, SubtaskId, SwimlaneId, TaskFile, TaskId, UserId,
};
use crate::board::ports::{RpcTransport, RpcTransportError, RpcTransportResult};

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const DEFAULT_SWIMLANE: i64 = 1;

/// A call received by the in-memory board.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Method name.
    pub method: String,
    /// Parameter object as sent.
    pub params: Value,
}

/// Thread-safe in-memory board.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoard {
    state: Arc<RwLock<BoardState>>,
}

#[derive(Debug, Default)]
struct BoardState {
    next_id: i64,
    clock: i32,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    users: BTreeMap<UserId, String>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    files: BTreeMap<FileId, FileRecord>,
    links: BTreeMap<LinkId, LinkRecord>,
    comments: Vec<CommentRecord>,
    subtasks: BTreeMap<SubtaskId, SubtaskRecord>,
    search_candidates: BTreeMap<ProjectId, Vec<Value>>,
    failures: HashMap<String, RpcTransportError>,
    declined: HashSet<String>,
    absent: HashSet<String>,
    calls: Vec<RecordedCall>,
}

#[derive(Debug, Clone)]
struct ProjectRecord {
    identifier: String,
    name: String,
    columns: Vec<Column>,
}

#[derive(Debug, Clone)]
struct TaskRecord {
    project_id: ProjectId,
    reference: String,
    title: String,
    description: Option<String>,
    color_id: Option<String>,
    column_id: ColumnId,
    swimlane_id: SwimlaneId,
    owner_id: Option<UserId>,
    creator_id: Option<UserId>,
    tags: BTreeSet<String>,
    date_moved: i32,
}

#[derive(Debug, Clone)]
struct FileRecord {
    task_id: TaskId,
    name: String,
    content: Vec<u8>,
}

#[derive(Debug, Clone)]
struct LinkRecord {
    task_id: TaskId,
    url: String,
    link_type: LinkType,
    title: String,
    creator_id: Option<UserId>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    task_id: TaskId,
    content: String,
    user_id: Option<UserId>,
}

#[derive(Debug, Clone)]
struct SubtaskRecord {
    task_id: TaskId,
    title: String,
    user_id: Option<UserId>,
}

impl BoardState {
    const fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn is_declined(&self, method: &str) -> bool {
        self.declined.contains(method)
    }

    fn task_url(task_id: TaskId, project_id: ProjectId) -> String {
        format!("http://board.local/?controller=TaskViewController&action=show&task_id={task_id}&project_id={project_id}")
    }

    fn task_json(task_id: TaskId, task: &TaskRecord) -> Value {
        json!({
            "id": task_id.to_string(),
            "project_id": task.project_id.to_string(),
            "reference": task.reference,
            "title": task.title,
            "description": task.description.clone().unwrap_or_default(),
            "color_id": task.color_id.clone().unwrap_or_default(),
            "column_id": task.column_id.to_string(),
            "swimlane_id": task.swimlane_id.to_string(),
            "owner_id": user_field(task.owner_id),
            "creator_id": user_field(task.creator_id),
            "date_moved": task.date_moved.to_string(),
            "url": Self::task_url(task_id, task.project_id),
        })
    }

    fn dispatch(&mut self, method: &str, params: Value) -> RpcTransportResult<Value> {
        match method {
            GetProjectByIdentifier::NAME => self.get_project(params),
            GetColumns::NAME => self.get_columns(params),
            GetTaskByReference::NAME => self.get_task_by_reference(params),
            GetTask::NAME => self.get_task(params),
            GetTaskTags::NAME => self.get_task_tags(params),
            GetUserByName::NAME => self.get_user_by_name(params),
            GetUser::NAME => self.get_user(params),
            CreateTask::NAME => self.create_task(params),
            UpdateTask::NAME => self.update_task(params),
            MoveTaskPosition::NAME => self.move_task(params),
            GetAllTaskFiles::NAME => self.list_files(params),
            CreateTaskFile::NAME => self.create_file(params),
            RemoveTaskFile::NAME => self.remove_file(params),
            DownloadTaskFile::NAME => self.download_file(params),
            GetAllExternalTaskLinks::NAME => self.list_links(params),
            CreateExternalTaskLink::NAME => self.create_link(params),
            CreateComment::NAME => self.create_comment(params),
            GetAllSubtasks::NAME => self.list_subtasks(params),
            CreateSubtask::NAME => self.create_subtask(params),
            SearchTasks::NAME => self.search(params),
            other => Err(RpcTransportError::remote(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn get_project(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetProjectByIdentifier = decode(params)?;
        Ok(self
            .projects
            .iter()
            .find(|(_, project)| project.identifier == request.identifier)
            .map_or(Value::Null, |(id, project)| {
                json!({
                    "id": id.to_string(),
                    "identifier": project.identifier,
                    "name": project.name,
                })
            }))
    }

    fn get_columns(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetColumns = decode(params)?;
        let project_id = request.project_id;
        Ok(self.projects.get(&project_id).map_or(Value::Null, |project| {
            project
                .columns
                .iter()
                .map(|column| {
                    json!({
                        "id": column.id.to_string(),
                        "position": column.position.to_string(),
                        "title": column.title,
                        "project_id": project_id.to_string(),
                    })
                })
                .collect()
        }))
    }

    fn get_task_by_reference(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetTaskByReference = decode(params)?;
        Ok(self
            .tasks
            .iter()
            .find(|(_, task)| {
                task.project_id == request.project_id && task.reference == request.reference
            })
            .map_or(Value::Null, |(id, task)| Self::task_json(*id, task)))
    }

    fn get_task(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetTask = decode(params)?;
        Ok(self
            .tasks
            .get(&request.task_id)
            .map_or(Value::Null, |task| Self::task_json(request.task_id, task)))
    }

    fn get_task_tags(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetTaskTags = decode(params)?;
        let tags = self
            .tasks
            .get(&request.task_id)
            .map(|task| &task.tags)
            .filter(|tags| !tags.is_empty());
        Ok(tags.map_or_else(
            || json!([]),
            |tags| {
                (1_usize..)
                    .zip(tags)
                    .map(|(index, tag)| (index.to_string(), Value::String(tag.clone())))
                    .collect::<serde_json::Map<_, _>>()
                    .into()
            },
        ))
    }

    fn get_user_by_name(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetUserByName = decode(params)?;
        Ok(self
            .users
            .iter()
            .find(|(_, name)| **name == request.username)
            .map_or(Value::Null, |(id, name)| user_json(*id, name)))
    }

    fn get_user(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetUser = decode(params)?;
        Ok(self
            .users
            .get(&request.user_id)
            .map_or(Value::Null, |name| user_json(request.user_id, name)))
    }

    fn create_task(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: CreateTask = decode(params)?;
        if self.is_declined(CreateTask::NAME) {
            return Ok(Value::Bool(false));
        }
        let first_column = self
            .projects
            .get(&request.project_id)
            .and_then(|project| project.columns.first())
            .map(|column| column.id);
        let Some(first_column) = first_column else {
            return Ok(Value::Bool(false));
        };
        let record = TaskRecord {
            project_id: request.project_id,
            reference: request.reference,
            title: request.title,
            description: request.description,
            color_id: request.color_id,
            column_id: request.column_id.unwrap_or(first_column),
            swimlane_id: request
                .swimlane_id
                .unwrap_or(SwimlaneId::new(DEFAULT_SWIMLANE)),
            owner_id: request.owner_id,
            creator_id: request.creator_id,
            tags: request.tags.unwrap_or_default().into_iter().collect(),
            date_moved: self.clock,
        };
        let task_id = TaskId::new(self.allocate());
        self.tasks.insert(task_id, record);
        Ok(json!(task_id.value()))
    }

    fn update_task(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: UpdateTask = decode(params)?;
        if self.is_declined(UpdateTask::NAME) {
            return Ok(Value::Bool(false));
        }
        let Some(task) = self.tasks.get_mut(&request.id) else {
            return Ok(Value::Bool(false));
        };
        if let Some(owner_id) = request.owner_id {
            task.owner_id = Some(owner_id);
        }
        if let Some(tags) = request.tags {
            task.tags = tags.into_iter().collect();
        }
        Ok(Value::Bool(true))
    }

    fn move_task(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: MoveTaskPosition = decode(params)?;
        if self.is_declined(MoveTaskPosition::NAME) {
            return Ok(Value::Bool(false));
        }
        let column_known = self.projects.get(&request.project_id).is_some_and(|project| {
            project
                .columns
                .iter()
                .any(|column| column.id == request.column_id)
        });
        let clock = self.clock;
        let Some(task) = self
            .tasks
            .get_mut(&request.task_id)
            .filter(|task| column_known && task.project_id == request.project_id)
        else {
            return Ok(Value::Bool(false));
        };
        task.column_id = request.column_id;
        if let Some(swimlane_id) = request.swimlane_id {
            task.swimlane_id = swimlane_id;
        }
        task.date_moved = clock;
        Ok(Value::Bool(true))
    }

    fn list_files(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetAllTaskFiles = decode(params)?;
        let task_id = request.task_id;
        Ok(self
            .files
            .iter()
            .filter(|(_, file)| file.task_id == task_id)
            .map(|(id, file)| {
                json!({
                    "id": id.to_string(),
                    "name": file.name,
                    "task_id": task_id.to_string(),
                    "size": file.content.len().to_string(),
                })
            })
            .collect())
    }

    fn create_file(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: CreateTaskFile = decode(params)?;
        if self.is_declined(CreateTaskFile::NAME) || !self.tasks.contains_key(&request.task_id) {
            return Ok(Value::Bool(false));
        }
        let Ok(content) = STANDARD.decode(request.blob.as_bytes()) else {
            return Ok(Value::Bool(false));
        };
        let file_id = FileId::new(self.allocate());
        self.files.insert(
            file_id,
            FileRecord {
                task_id: request.task_id,
                name: request.filename,
                content,
            },
        );
        Ok(json!(file_id.value()))
    }

    fn remove_file(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: RemoveTaskFile = decode(params)?;
        if self.is_declined(RemoveTaskFile::NAME) {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(self.files.remove(&request.file_id).is_some()))
    }

    fn download_file(&self, params: Value) -> RpcTransportResult<Value> {
        let request: DownloadTaskFile = decode(params)?;
        let encoded = self
            .files
            .get(&request.file_id)
            .map_or_else(String::new, |file| STANDARD.encode(&file.content));
        Ok(Value::String(encoded))
    }

    fn list_links(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetAllExternalTaskLinks = decode(params)?;
        let task_id = request.task_id;
        Ok(self
            .links
            .iter()
            .filter(|(_, link)| link.task_id == task_id)
            .map(|(id, link)| {
                json!({
                    "id": id.to_string(),
                    "url": link.url,
                    "link_type": link.link_type.as_str(),
                    "title": link.title,
                    "dependency": LINK_DEPENDENCY_RELATED,
                    "task_id": task_id.to_string(),
                    "creator_id": user_field(link.creator_id),
                })
            })
            .collect())
    }

    fn create_link(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: CreateExternalTaskLink = decode(params)?;
        if self.is_declined(CreateExternalTaskLink::NAME)
            || !self.tasks.contains_key(&request.task_id)
        {
            return Ok(Value::Bool(false));
        }
        let link_id = LinkId::new(self.allocate());
        self.links.insert(
            link_id,
            LinkRecord {
                task_id: request.task_id,
                title: request.title.unwrap_or_else(|| request.url.clone()),
                url: request.url,
                link_type: request.link_type,
                creator_id: request.creator_id,
            },
        );
        Ok(json!(link_id.value()))
    }

    fn create_comment(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: CreateComment = decode(params)?;
        if self.is_declined(CreateComment::NAME) || !self.tasks.contains_key(&request.task_id) {
            return Ok(Value::Bool(false));
        }
        let comment_id = self.allocate();
        self.comments.push(CommentRecord {
            task_id: request.task_id,
            content: request.content,
            user_id: request.user_id,
        });
        Ok(json!(comment_id))
    }

    fn list_subtasks(&self, params: Value) -> RpcTransportResult<Value> {
        let request: GetAllSubtasks = decode(params)?;
        let task_id = request.task_id;
        Ok(self
            .subtasks
            .iter()
            .filter(|(_, subtask)| subtask.task_id == task_id)
            .map(|(id, subtask)| {
                json!({
                    "id": id.to_string(),
                    "title": subtask.title,
                    "task_id": task_id.to_string(),
                    "user_id": user_field(subtask.user_id),
                })
            })
            .collect())
    }

    fn create_subtask(&mut self, params: Value) -> RpcTransportResult<Value> {
        let request: CreateSubtask = decode(params)?;
        if self.is_declined(CreateSubtask::NAME) || !self.tasks.contains_key(&request.task_id) {
            return Ok(Value::Bool(false));
        }
        let subtask_id = SubtaskId::new(self.allocate());
        self.subtasks.insert(
            subtask_id,
            SubtaskRecord {
                task_id: request.task_id,
                title: request.title,
                user_id: request.user_id,
            },
        );
        Ok(json!(subtask_id.value()))
    }

    fn search(&self, params: Value) -> RpcTransportResult<Value> {
        let request: SearchTasks = decode(params)?;
        let project_id = request.project_id;
        let tasks = self
            .tasks
            .iter()
            .filter(|(_, task)| task.project_id == project_id)
            .map(|(id, task)| Self::task_json(*id, task));
        let injected = self
            .search_candidates
            .get(&project_id)
            .into_iter()
            .flatten()
            .cloned();
        Ok(tasks.chain(injected).collect())
    }
}

fn user_field(user_id: Option<UserId>) -> String {
    user_id.map_or_else(|| "0".to_owned(), |id| id.to_string())
}

fn user_json(id: UserId, username: &str) -> Value {
    json!({"id": id.to_string(), "username": username, "name": username})
}

fn decode<P: DeserializeOwned>(params: Value) -> RpcTransportResult<P> {
    serde_json::from_value(params)
        .map_err(|err| RpcTransportError::remote(INVALID_PARAMS, format!("Invalid params: {err}")))
}

impl InMemoryBoard {
    /// Creates an empty board with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Sets the timestamp stamped on created and moved tasks.
    pub fn set_clock(&self, timestamp: i32) {
        self.write().clock = timestamp;
    }

    /// Adds a project whose columns are titled `columns`, in board order.
    #[must_use]
    pub fn add_project(&self, identifier: &str, columns: &[&str]) -> ProjectId {
        let mut state = self.write();
        let project_id = ProjectId::new(state.allocate());
        let mut ranked = Vec::with_capacity(columns.len());
        for (rank, title) in (1_u32..).zip(columns) {
            ranked.push(Column::new(ColumnId::new(state.allocate()), rank, *title));
        }
        state.projects.insert(
            project_id,
            ProjectRecord {
                identifier: identifier.to_owned(),
                name: identifier.to_owned(),
                columns: ranked,
            },
        );
        project_id
    }

    /// Returns the column at 1-based `position` of `project_id`.
    #[must_use]
    pub fn column_at(&self, project_id: ProjectId, position: u32) -> Option<ColumnId> {
        self.read(|state| {
            state.projects.get(&project_id).and_then(|project| {
                project
                    .columns
                    .iter()
                    .find(|column| column.position == position)
                    .map(|column| column.id)
            })
        })
    }

    /// Adds a user account.
    #[must_use]
    pub fn add_user(&self, username: &str) -> UserId {
        let mut state = self.write();
        let user_id = UserId::new(state.allocate());
        state.users.insert(user_id, username.to_owned());
        user_id
    }

    /// Adds a task to the column at 1-based `position` (the first column
    /// when out of range), stamped with the current clock.
    #[must_use]
    pub fn add_task(&self, project_id: ProjectId, reference: &str, position: u32) -> TaskId {
        let column_id = self
            .column_at(project_id, position)
            .or_else(|| self.column_at(project_id, 1))
            .unwrap_or(ColumnId::new(0));
        let mut state = self.write();
        let task_id = TaskId::new(state.allocate());
        let date_moved = state.clock;
        state.tasks.insert(
            task_id,
            TaskRecord {
                project_id,
                reference: reference.to_owned(),
                title: reference.to_owned(),
                description: None,
                color_id: None,
                column_id,
                swimlane_id: SwimlaneId::new(DEFAULT_SWIMLANE),
                owner_id: None,
                creator_id: None,
                tags: BTreeSet::new(),
                date_moved,
            },
        );
        task_id
    }

    /// Replaces the tags of a seeded task.
    pub fn set_task_tags(&self, task_id: TaskId, tags: &[&str]) {
        if let Some(task) = self.write().tasks.get_mut(&task_id) {
            task.tags = tags.iter().map(|tag| (*tag).to_owned()).collect();
        }
    }

    /// Sets the owner of a seeded task.
    pub fn set_task_owner(&self, task_id: TaskId, owner_id: Option<UserId>) {
        if let Some(task) = self.write().tasks.get_mut(&task_id) {
            task.owner_id = owner_id;
        }
    }

    /// Sets the creator of a seeded task.
    pub fn set_task_creator(&self, task_id: TaskId, creator_id: Option<UserId>) {
        if let Some(task) = self.write().tasks.get_mut(&task_id) {
            task.creator_id = creator_id;
        }
    }

    /// Sets the change timestamp of a seeded task.
    pub fn set_task_timestamp(&self, task_id: TaskId, timestamp: i32) {
        if let Some(task) = self.write().tasks.get_mut(&task_id) {
            task.date_moved = timestamp;
        }
    }

    /// Attaches a file to a task.
    #[must_use]
    pub fn add_file(&self, task_id: TaskId, name: &str, content: &[u8]) -> FileId {
        let mut state = self.write();
        let file_id = FileId::new(state.allocate());
        state.files.insert(
            file_id,
            FileRecord {
                task_id,
                name: name.to_owned(),
                content: content.to_vec(),
            },
        );
        file_id
    }

    /// Adds an external link to a task.
    #[must_use]
    pub fn add_link(&self, task_id: TaskId, url: &str, link_type: LinkType, title: &str) -> LinkId {
        let mut state = self.write();
        let link_id = LinkId::new(state.allocate());
        state.links.insert(
            link_id,
            LinkRecord {
                task_id,
                url: url.to_owned(),
                link_type,
                title: title.to_owned(),
                creator_id: None,
            },
        );
        link_id
    }

    /// Adds a subtask to a task.
    #[must_use]
    pub fn add_subtask(&self, task_id: TaskId, title: &str, user_id: Option<UserId>) -> SubtaskId {
        let mut state = self.write();
        let subtask_id = SubtaskId::new(state.allocate());
        state.subtasks.insert(
            subtask_id,
            SubtaskRecord {
                task_id,
                title: title.to_owned(),
                user_id,
            },
        );
        subtask_id
    }

    /// Appends a raw search candidate to the results for `project_id`.
    pub fn add_search_candidate(&self, project_id: ProjectId, candidate: Value) {
        self.write()
            .search_candidates
            .entry(project_id)
            .or_default()
            .push(candidate);
    }

    /// Makes every subsequent call to `method` fail with `error`.
    pub fn fail_method(&self, method: &str, error: RpcTransportError) {
        self.write().failures.insert(method.to_owned(), error);
    }

    /// Makes every subsequent mutation through `method` answer `false`.
    pub fn decline_method(&self, method: &str) {
        self.write().declined.insert(method.to_owned());
    }

    /// Makes every subsequent call to `method` answer `null`, as the
    /// service does for records it cannot find.
    pub fn answer_null(&self, method: &str) {
        self.write().absent.insert(method.to_owned());
    }

    /// Returns every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.read(|state| state.calls.clone())
    }

    /// Returns the method names received so far, in order.
    #[must_use]
    pub fn call_names(&self) -> Vec<String> {
        self.read(|state| state.calls.iter().map(|call| call.method.clone()).collect())
    }

    /// Returns the parameter objects sent to `method`, in order.
    #[must_use]
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.read(|state| {
            state
                .calls
                .iter()
                .filter(|call| call.method == method)
                .map(|call| call.params.clone())
                .collect()
        })
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.write().calls.clear();
    }

    /// Returns the current state of a task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<RemoteTaskSnapshot> {
        self.read(|state| {
            state.tasks.get(&task_id).map(|task| {
                let mut snapshot =
                    RemoteTaskSnapshot::new(task_id, task.reference.clone(), task.column_id)
                        .with_title(task.title.clone())
                        .with_swimlane(task.swimlane_id)
                        .with_tags(task.tags.iter().cloned())
                        .with_change_timestamp(task.date_moved)
                        .with_url(BoardState::task_url(task_id, task.project_id));
                if let Some(owner_id) = task.owner_id {
                    snapshot = snapshot.with_owner(owner_id);
                }
                if let Some(creator_id) = task.creator_id {
                    snapshot = snapshot.with_creator(creator_id);
                }
                snapshot
            })
        })
    }

    /// Finds a task by project and reference.
    #[must_use]
    pub fn task_by_reference(&self, project_id: ProjectId, reference: &str) -> Option<TaskId> {
        self.read(|state| {
            state
                .tasks
                .iter()
                .find(|(_, task)| task.project_id == project_id && task.reference == reference)
                .map(|(id, _)| *id)
        })
    }

    /// Returns the number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.read(|state| state.tasks.len())
    }

    /// Returns the files attached to a task.
    #[must_use]
    pub fn files(&self, task_id: TaskId) -> Vec<TaskFile> {
        self.read(|state| {
            state
                .files
                .iter()
                .filter(|(_, file)| file.task_id == task_id)
                .map(|(id, file)| TaskFile {
                    id: *id,
                    name: file.name.clone(),
                })
                .collect()
        })
    }

    /// Returns the content of the file named `name` on a task.
    #[must_use]
    pub fn file_content(&self, task_id: TaskId, name: &str) -> Option<Vec<u8>> {
        self.read(|state| {
            state
                .files
                .values()
                .find(|file| file.task_id == task_id && file.name == name)
                .map(|file| file.content.clone())
        })
    }

    /// Returns the external links of a task.
    #[must_use]
    pub fn links(&self, task_id: TaskId) -> Vec<ExternalLink> {
        self.read(|state| {
            state
                .links
                .iter()
                .filter(|(_, link)| link.task_id == task_id)
                .map(|(id, link)| ExternalLink {
                    id: *id,
                    url: link.url.clone(),
                    link_type: link.link_type.as_str().to_owned(),
                    title: link.title.clone(),
                })
                .collect()
        })
    }

    /// Returns the comment texts of a task, oldest first.
    #[must_use]
    pub fn comments(&self, task_id: TaskId) -> Vec<String> {
        self.read(|state| {
            state
                .comments
                .iter()
                .filter(|comment| comment.task_id == task_id)
                .map(|comment| comment.content.clone())
                .collect()
        })
    }

    /// Returns the author of every comment on a task, oldest first.
    #[must_use]
    pub fn comment_authors(&self, task_id: TaskId) -> Vec<Option<UserId>> {
        self.read(|state| {
            state
                .comments
                .iter()
                .filter(|comment| comment.task_id == task_id)
                .map(|comment| comment.user_id)
                .collect()
        })
    }

    /// Returns the subtasks of a task.
    #[must_use]
    pub fn subtasks(&self, task_id: TaskId) -> Vec<Subtask> {
        self.read(|state| {
            state
                .subtasks
                .iter()
                .filter(|(_, subtask)| subtask.task_id == task_id)
                .map(|(id, subtask)| Subtask {
                    id: *id,
                    title: subtask.title.clone(),
                    user_id: subtask.user_id,
                })
                .collect()
        })
    }
}

#[async_trait]
impl RpcTransport for InMemoryBoard {
    async fn call(&self, method: &str, params: Value) -> RpcTransportResult<Value> {
        let mut state = self
            .state
            .write()
            .map_err(|err| RpcTransportError::transport(std::io::Error::other(err.to_string())))?;

        state.calls.push(RecordedCall {
            method: method.to_owned(),
            params: params.clone(),
        });
        let request_id = u64::try_from(state.calls.len()).unwrap_or(u64::MAX);

        if let Some(error) = state.failures.get(method) {
            return Err(error.clone());
        }
        if state.absent.contains(method) {
            return JsonRpcResponse::success(request_id, Value::Null).into_result();
        }

        let response = match state.dispatch(method, params) {
            Ok(result) => JsonRpcResponse::success(request_id, result),
            Err(RpcTransportError::Remote { code, message }) => {
                JsonRpcResponse::failure(request_id, code, message)
            }
            Err(other) => return Err(other),
        };
        response.into_result()
    }
}
