//! Records for task sub-resources and users.

use serde::{Deserialize, Serialize};

use super::{ids::optional_user, lenient, FileId, LinkId, SubtaskId, UserId};

/// A file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    /// Remote file identifier.
    pub id: FileId,
    /// File name as stored remotely.
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub name: String,
}

/// An external link attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    /// Remote link identifier.
    pub id: LinkId,
    /// Link target.
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub url: String,
    /// Link type as reported remotely.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub link_type: String,
    /// Link title.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub title: String,
}

/// A subtask of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Remote subtask identifier.
    pub id: SubtaskId,
    /// Subtask title.
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub title: String,
    /// Assignee, if any.
    #[serde(default, deserialize_with = "optional_user")]
    pub user_id: Option<UserId>,
}

impl Subtask {
    /// Returns `true` when this subtask has the given title and assignee.
    #[must_use]
    pub fn matches(&self, title: &str, user_id: Option<UserId>) -> bool {
        self.title == title && self.user_id == user_id
    }
}

/// A remote user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Remote user identifier.
    pub id: UserId,
    /// Login name.
    #[serde(deserialize_with = "lenient::text_or_empty")]
    pub username: String,
}
