//! Column and swimlane placement.
//!
//! A placement is written as blank or `0` (leave unchanged), `+N`/`-N`
//! (relative to the current position) or `N` (absolute target).
//!
//! Columns are resolved through the project's ordered column list: the
//! target rank is clamped to `[1, column_count]` and mapped to the column
//! sitting at that rank. Swimlanes have no lookup table: the written number,
//! sign included, is the swimlane identifier itself.

use std::fmt;
use std::str::FromStr;

use super::{BoardDomainError, ColumnId, ProjectSnapshot, SwimlaneId};

/// Parsed placement expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionSpec {
    /// Leave the current placement alone.
    #[default]
    Unchanged,
    /// Move by a signed delta from the current placement.
    Relative(i64),
    /// Move to an absolute target.
    Absolute(i64),
}

impl PositionSpec {
    /// Parses a placement expression.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidPlacement`] when the value is not
    /// blank and not a signed or unsigned integer.
    pub fn parse(value: &str) -> Result<Self, BoardDomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::Unchanged);
        }
        let invalid = || BoardDomainError::InvalidPlacement(value.to_owned());
        let signed = trimmed.starts_with('+') || trimmed.starts_with('-');
        let number = trimmed.parse::<i64>().map_err(|_| invalid())?;

        Ok(match (number, signed) {
            (0, _) => Self::Unchanged,
            (delta, true) => Self::Relative(delta),
            (target, false) => Self::Absolute(target),
        })
    }

    /// Returns `true` for the no-op placement.
    #[must_use]
    pub const fn is_unchanged(self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Applies the placement to `current`, returning the raw target.
    const fn target_from(self, current: i64) -> Option<i64> {
        match self {
            Self::Unchanged => None,
            Self::Relative(delta) => Some(current.saturating_add(delta)),
            Self::Absolute(target) => Some(target),
        }
    }
}

impl FromStr for PositionSpec {
    type Err = BoardDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for PositionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "0"),
            Self::Relative(delta) => write!(f, "{delta:+}"),
            Self::Absolute(target) => write!(f, "{target}"),
        }
    }
}

/// Result of resolving a column placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPlacement {
    /// Column the task should sit in.
    pub column_id: ColumnId,
    /// Clamped 1-based rank of that column.
    pub position: u32,
    /// Whether the column differs from the current one.
    pub changed: bool,
}

/// Resolves a column placement against a project's column list.
///
/// `current` is the column currently holding the task, or `None` for a task
/// that does not exist yet (current rank `0`). Returns `None` for the no-op
/// placement and for projects without columns.
#[must_use]
pub fn resolve_column(
    spec: PositionSpec,
    project: &ProjectSnapshot,
    current: Option<ColumnId>,
) -> Option<ColumnPlacement> {
    let column_count = i64::from(project.column_count());
    if column_count == 0 {
        return None;
    }
    let current_position = project.position_of(current);
    let raw = spec.target_from(i64::from(current_position))?;
    let clamped = u32::try_from(raw.clamp(1, column_count)).ok()?;

    match project.column_at(clamped) {
        Some(column) => Some(ColumnPlacement {
            column_id: column.id,
            position: clamped,
            changed: current != Some(column.id),
        }),
        None => current.map(|column_id| ColumnPlacement {
            column_id,
            position: current_position,
            changed: false,
        }),
    }
}

/// Result of resolving a swimlane placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwimlanePlacement {
    /// Swimlane the task should sit in.
    pub swimlane_id: SwimlaneId,
    /// Whether the swimlane differs from the current one.
    pub changed: bool,
}

/// Resolves a swimlane placement.
///
/// The written number is used directly as the swimlane identifier. A signed
/// placement is not applied to the current swimlane: `+2` and `2` both name
/// swimlane `2`.
#[must_use]
pub fn resolve_swimlane(
    spec: PositionSpec,
    current: Option<SwimlaneId>,
) -> Option<SwimlanePlacement> {
    let target = match spec {
        PositionSpec::Unchanged => return None,
        PositionSpec::Relative(value) | PositionSpec::Absolute(value) => value,
    };
    let swimlane_id = SwimlaneId::new(target);
    Some(SwimlanePlacement {
        swimlane_id,
        changed: current != Some(swimlane_id),
    })
}
