//! Shared world state for board synchronisation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use kanboard_sync::board::adapters::memory::{InMemoryBoard, InMemoryWatermarkStore};
use kanboard_sync::board::domain::{ProjectId, TaskId, TaskSpecification, TriggerEvent};
use kanboard_sync::board::services::{ReconcileOutcome, SyncError, TaskReconciler};
use kanboard_sync::config::KanboardConfig;
use rstest::fixture;
use tempfile::TempDir;

/// Scenario world for board synchronisation behaviour tests.
pub struct SyncWorld {
    pub board: Arc<InMemoryBoard>,
    pub store: Arc<InMemoryWatermarkStore>,
    pub project: Option<(String, ProjectId)>,
    pub tasks: HashMap<String, TaskId>,
    pub workspace: Dir,
    pub last_outcome: Option<Result<ReconcileOutcome, SyncError>>,
    pub last_events: Option<Vec<TriggerEvent>>,
    _root: TempDir,
}

impl SyncWorld {
    /// Creates a world with an empty board and workspace.
    ///
    /// # Panics
    ///
    /// Panics when the temporary workspace cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let root = TempDir::new().expect("temporary directory");
        let path = Utf8Path::from_path(root.path()).expect("utf-8 temporary path");
        let workspace = Dir::open_ambient_dir(path, ambient_authority()).expect("open workspace");
        Self {
            board: Arc::new(InMemoryBoard::new()),
            store: Arc::new(InMemoryWatermarkStore::new()),
            project: None,
            tasks: HashMap::new(),
            workspace,
            last_outcome: None,
            last_events: None,
            _root: root,
        }
    }

    /// Returns the identifier and remote id of the seeded project.
    pub fn project(&self) -> Result<(String, ProjectId), eyre::Report> {
        self.project
            .clone()
            .ok_or_else(|| eyre::eyre!("no project seeded in scenario world"))
    }

    /// Returns the remote id of a task seeded or reconciled by reference.
    pub fn task_id(&self, reference: &str) -> Result<TaskId, eyre::Report> {
        let (_, project_id) = self.project()?;
        self.tasks
            .get(reference)
            .copied()
            .or_else(|| self.board.task_by_reference(project_id, reference))
            .ok_or_else(|| eyre::eyre!("unknown task '{reference}'"))
    }

    /// Reconciles `spec` and records the outcome.
    pub fn reconcile(&mut self, spec: &TaskSpecification) {
        let reconciler = TaskReconciler::new(Arc::clone(&self.board), &KanboardConfig::default());
        let result = run_async(reconciler.reconcile(spec, &self.workspace));
        if let Ok(outcome) = &result {
            self.tasks
                .insert(spec.reference().to_owned(), outcome.task_id());
        }
        self.last_outcome = Some(result);
    }

    /// Returns the last successful reconciliation outcome.
    pub fn outcome(&self) -> Result<&ReconcileOutcome, eyre::Report> {
        self.last_outcome
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no reconciliation has run"))?
            .as_ref()
            .map_err(|err| eyre::eyre!("reconciliation failed: {err}"))
    }
}

impl Default for SyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncWorld {
    SyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
