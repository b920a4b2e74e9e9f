//! Shared fixtures for in-memory board integration tests.

use std::sync::Arc;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use kanboard_sync::board::adapters::memory::InMemoryBoard;
use kanboard_sync::board::domain::{ProjectId, TaskId, UserId};
use kanboard_sync::board::services::TaskReconciler;
use kanboard_sync::config::KanboardConfig;
use rstest::fixture;
use tempfile::TempDir;

/// Column titles of the seeded project, in board order.
pub const COLUMNS: [&str; 5] = ["Backlog", "Ready", "Doing", "Review", "Done"];

/// A seeded board with one project and one known user.
pub struct SeededBoard {
    pub board: Arc<InMemoryBoard>,
    pub project_id: ProjectId,
    pub builder: UserId,
}

impl SeededBoard {
    /// Builds a reconciler over this board.
    pub fn reconciler(&self, config: &KanboardConfig) -> TaskReconciler<InMemoryBoard> {
        TaskReconciler::new(Arc::clone(&self.board), config)
    }

    /// Seeds a task in the first column.
    pub fn task(&self, reference: &str) -> TaskId {
        self.board.add_task(self.project_id, reference, 1)
    }
}

/// Provides a board holding project `OPS` and user `builder`.
#[fixture]
pub fn seeded() -> SeededBoard {
    let board = Arc::new(InMemoryBoard::new());
    board.set_clock(1_000);
    let project_id = board.add_project("OPS", &COLUMNS);
    let builder = board.add_user("builder");
    SeededBoard {
        board,
        project_id,
        builder,
    }
}

/// A temporary directory and a capability handle onto it.
pub struct Workspace {
    _root: TempDir,
    pub dir: Dir,
}

impl Workspace {
    /// Writes `content` to the workspace-relative `path`.
    pub fn write(&self, path: &str, content: &[u8]) {
        if let Some(parent) = Utf8Path::new(path)
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
        {
            self.dir.create_dir_all(parent).expect("create parent directory");
        }
        self.dir.write(path, content).expect("write workspace file");
    }
}

/// Provides an empty temporary workspace.
#[fixture]
pub fn workspace() -> Workspace {
    open_workspace()
}

/// Creates an empty temporary workspace.
pub fn open_workspace() -> Workspace {
    let root = TempDir::new().expect("temporary directory");
    let path = Utf8Path::from_path(root.path()).expect("utf-8 temporary path");
    let dir = Dir::open_ambient_dir(path, ambient_authority()).expect("open workspace");
    Workspace { _root: root, dir }
}
