//! Remote task snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ids::optional_user, lenient, ColumnId, SwimlaneId, TaskId, UserId};

/// Point-in-time view of a remote task.
///
/// The task reference is expected to be unique per project; uniqueness is
/// enforced by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTaskSnapshot {
    id: TaskId,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    reference: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    title: String,
    column_id: ColumnId,
    #[serde(default)]
    swimlane_id: Option<SwimlaneId>,
    #[serde(default, deserialize_with = "optional_user")]
    owner_id: Option<UserId>,
    #[serde(default, deserialize_with = "optional_user")]
    creator_id: Option<UserId>,
    #[serde(default, skip_deserializing)]
    tags: BTreeSet<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "date_moved", default, deserialize_with = "lenient::timestamp")]
    change_timestamp: i32,
}

impl RemoteTaskSnapshot {
    /// Creates a snapshot for a task placed in `column_id`.
    #[must_use]
    pub fn new(id: TaskId, reference: impl Into<String>, column_id: ColumnId) -> Self {
        Self {
            id,
            reference: reference.into(),
            title: String::new(),
            column_id,
            swimlane_id: None,
            owner_id: None,
            creator_id: None,
            tags: BTreeSet::new(),
            url: None,
            change_timestamp: 0,
        }
    }

    /// Sets the task title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the swimlane.
    #[must_use]
    pub const fn with_swimlane(mut self, swimlane_id: SwimlaneId) -> Self {
        self.swimlane_id = Some(swimlane_id);
        self
    }

    /// Sets the owner.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the creator.
    #[must_use]
    pub const fn with_creator(mut self, creator_id: UserId) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    /// Sets the task URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the change timestamp.
    #[must_use]
    pub const fn with_change_timestamp(mut self, timestamp: i32) -> Self {
        self.change_timestamp = timestamp;
        self
    }

    /// Returns the remote task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the caller-chosen task reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the column holding the task.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the swimlane holding the task, if reported.
    #[must_use]
    pub const fn swimlane_id(&self) -> Option<SwimlaneId> {
        self.swimlane_id
    }

    /// Returns the assigned owner, if any.
    #[must_use]
    pub const fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    /// Returns the creator, if known.
    #[must_use]
    pub const fn creator_id(&self) -> Option<UserId> {
        self.creator_id
    }

    /// Returns the current tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the task URL reported by the remote service.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Returns the Unix timestamp of the last column move.
    #[must_use]
    pub const fn change_timestamp(&self) -> i32 {
        self.change_timestamp
    }
}
