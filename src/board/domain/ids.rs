//! Identifier types for remote board records.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::lenient;

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw remote identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw remote identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                lenient::int(deserializer).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

remote_id!(
    /// Numeric identifier of a remote project.
    ProjectId
);
remote_id!(
    /// Numeric identifier of a remote task.
    TaskId
);
remote_id!(
    /// Numeric identifier of a project column.
    ColumnId
);
remote_id!(
    /// Numeric identifier of a swimlane.
    SwimlaneId
);
remote_id!(
    /// Numeric identifier of a remote user.
    UserId
);
remote_id!(
    /// Numeric identifier of a file attached to a task.
    FileId
);
remote_id!(
    /// Numeric identifier of an external task link.
    LinkId
);
remote_id!(
    /// Numeric identifier of a subtask.
    SubtaskId
);
remote_id!(
    /// Numeric identifier of a task comment.
    CommentId
);

/// Decodes an optional user reference where `0`, `null` and blank mean
/// "unassigned".
pub(crate) fn optional_user<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::optional_int(deserializer)?
        .filter(|value| *value != 0)
        .map(UserId))
}
