//! Project and column snapshots.

use serde::{Deserialize, Serialize};

use super::{lenient, ColumnId, ProjectId};

/// A column of a project board.
///
/// Positions are 1-based and contiguous within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Remote column identifier.
    pub id: ColumnId,
    /// 1-based rank of the column on the board.
    #[serde(deserialize_with = "lenient::position")]
    pub position: u32,
    /// Column title.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub title: String,
}

impl Column {
    /// Creates a column.
    #[must_use]
    pub fn new(id: ColumnId, position: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            position,
            title: title.into(),
        }
    }
}

/// Point-in-time view of a remote project and its ordered columns.
///
/// Snapshots are fetched at the start of each reconciliation or poll cycle
/// and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    id: ProjectId,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    identifier: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    name: String,
    #[serde(default, skip_deserializing)]
    columns: Vec<Column>,
}

impl ProjectSnapshot {
    /// Creates a project snapshot without columns.
    #[must_use]
    pub fn new(id: ProjectId, identifier: impl Into<String>) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            name: String::new(),
            columns: Vec::new(),
        }
    }

    /// Attaches the ordered column list.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// Returns the remote project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the human-facing project identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the project display name, empty when the remote omitted it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in board order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns on the board.
    #[must_use]
    pub fn column_count(&self) -> u32 {
        u32::try_from(self.columns.len()).unwrap_or(u32::MAX)
    }

    /// Returns the position of the given column, or `0` when the column is
    /// unknown or absent.
    #[must_use]
    pub fn position_of(&self, column_id: Option<ColumnId>) -> u32 {
        column_id
            .and_then(|id| self.columns.iter().find(|column| column.id == id))
            .map_or(0, |column| column.position)
    }

    /// Returns the first column whose position equals `position`.
    #[must_use]
    pub fn column_at(&self, position: u32) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.position == position)
    }
}
