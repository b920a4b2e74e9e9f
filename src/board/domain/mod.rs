//! Domain model for board synchronisation.
//!
//! Pure types and rules: remote snapshots, the placement and tag edit
//! mini-languages, desired task specifications, and the poll watermark.
//! Nothing in here talks to the remote service.

mod error;
mod ids;
mod lenient;
mod link;
mod position;
mod project;
mod resources;
mod specification;
mod tags;
mod task;
mod trigger;

pub use error::BoardDomainError;
pub use ids::{
    ColumnId, CommentId, FileId, LinkId, ProjectId, SubtaskId, SwimlaneId, TaskId, UserId,
};
pub use link::{ExternalLinkSpec, LinkType};
pub use position::{
    ColumnPlacement, PositionSpec, SwimlanePlacement, resolve_column, resolve_swimlane,
};
pub use project::{Column, ProjectSnapshot};
pub use resources::{ExternalLink, RemoteUser, Subtask, TaskFile};
pub use specification::TaskSpecification;
pub use tags::{TagDiff, TagEdit, TagOp};
pub use task::RemoteTaskSnapshot;
pub use trigger::{
    MatchResult, PollSelection, ReferenceFilter, TASK_REFERENCE_PARAMETER, TriggerEvent,
    Watermark, select_changed,
};

pub(crate) use specification::DesiredTask;
