//! Typed wrappers for loosely typed remote results.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Result of a remote create call: the new identifier, or a failure
/// sentinel (`false`, `null` or `0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome<I> {
    /// The record was created with the given identifier.
    Created(I),
    /// The remote service declined to create the record.
    Failed,
}

impl<I> CreateOutcome<I> {
    /// Returns the created identifier, if any.
    #[must_use]
    pub fn created(self) -> Option<I> {
        match self {
            Self::Created(id) => Some(id),
            Self::Failed => None,
        }
    }
}

impl<'de, I> Deserialize<'de> for CreateOutcome<I>
where
    I: From<i64>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null | Value::Bool(false) => Ok(Self::Failed),
            Value::Number(number) => Ok(created_or_failed(number.as_i64())),
            Value::String(text) => Ok(created_or_failed(text.trim().parse::<i64>().ok())),
            other => Err(de::Error::custom(format!(
                "expected a created identifier or false, found {other}"
            ))),
        }
    }
}

fn created_or_failed<I: From<i64>>(id: Option<i64>) -> CreateOutcome<I> {
    match id {
        Some(value) if value > 0 => CreateOutcome::Created(I::from(value)),
        _ => CreateOutcome::Failed,
    }
}

/// Boolean acknowledgement of a remote mutation.
///
/// Some mutations answer with `true`, others with the affected record
/// identifier; both count as acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledged(bool);

impl Acknowledged {
    /// Returns `true` when the remote service accepted the mutation.
    #[must_use]
    pub const fn is_acknowledged(self) -> bool {
        self.0
    }
}

impl<'de> Deserialize<'de> for Acknowledged {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let accepted = match Value::deserialize(deserializer)? {
            Value::Bool(flag) => flag,
            Value::Number(number) => number.as_i64().is_some_and(|value| value > 0),
            Value::String(text) => {
                let trimmed = text.trim();
                trimmed == "true" || trimmed.parse::<i64>().is_ok_and(|value| value > 0)
            }
            _ => false,
        };
        Ok(Self(accepted))
    }
}

/// List result where `null` or `false` stand for an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteList<T>(Vec<T>);

impl<T> RemoteList<T> {
    /// Returns the listed items.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for RemoteList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T> Deserialize<'de> for RemoteList<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map(Self)
                .map_err(de::Error::custom),
            Value::Null | Value::Bool(false) => Ok(Self::default()),
            other => Err(de::Error::custom(format!("expected a list, found {other}"))),
        }
    }
}

/// Tag names attached to a task.
///
/// The remote service answers with an object mapping tag identifiers to
/// names, or with an empty list when the task has no tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskTags(BTreeSet<String>);

impl TaskTags {
    /// Returns the tag names.
    #[must_use]
    pub fn into_set(self) -> BTreeSet<String> {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsPayload {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
    Flag(bool),
}

impl<'de> Deserialize<'de> for TaskTags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tags = match Option::<TagsPayload>::deserialize(deserializer)? {
            Some(TagsPayload::Map(map)) => map.into_values().collect(),
            Some(TagsPayload::List(list)) => list.into_iter().collect(),
            Some(TagsPayload::Flag(_)) | None => BTreeSet::new(),
        };
        Ok(Self(tags))
    }
}
