//! Poll watermark, reference filtering and trigger events.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BoardDomainError, RemoteTaskSnapshot, TaskId};

/// Name of the trigger parameter carrying the task reference.
pub const TASK_REFERENCE_PARAMETER: &str = "KANBOARD_TASKREF";

/// High-water change timestamp of the last processed poll cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Watermark(i32);

impl Watermark {
    /// Wraps a Unix timestamp.
    #[must_use]
    pub const fn new(timestamp: i32) -> Self {
        Self(timestamp)
    }

    /// Returns the wrapped timestamp.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns `true` when `timestamp` is strictly newer than the watermark.
    #[must_use]
    pub const fn is_passed_by(self, timestamp: i32) -> bool {
        timestamp > self.0
    }

    /// Returns the watermark raised to `timestamp` if that is newer.
    #[must_use]
    pub fn raised_to(self, timestamp: i32) -> Self {
        Self(self.0.max(timestamp))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capture groups extracted from a task reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    groups: Vec<String>,
}

impl MatchResult {
    /// Creates a match result from captured groups in index order.
    #[must_use]
    pub fn new(groups: impl IntoIterator<Item = String>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// Returns the captured groups, excluding the whole match.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Full-match filter applied to task references.
///
/// Without a pattern every reference matches with zero captured groups.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFilter {
    pattern: Option<Regex>,
}

impl ReferenceFilter {
    /// Compiles a reference pattern. Blank or absent patterns match
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidReferencePattern`] when the pattern
    /// does not compile.
    pub fn new(pattern: Option<&str>) -> Result<Self, BoardDomainError> {
        let Some(source) = pattern.map(str::trim).filter(|source| !source.is_empty()) else {
            return Ok(Self::default());
        };
        let anchored = format!("^(?:{source})$");
        let compiled =
            Regex::new(&anchored).map_err(|err| BoardDomainError::InvalidReferencePattern {
                pattern: source.to_owned(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            pattern: Some(compiled),
        })
    }

    /// Returns the capture groups when `reference` matches in full, or
    /// `None` when it does not.
    #[must_use]
    pub fn matches(&self, reference: &str) -> Option<MatchResult> {
        let Some(pattern) = &self.pattern else {
            return Some(MatchResult::default());
        };
        let captures = pattern.captures(reference)?;
        let groups = captures
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |found| found.as_str().to_owned()));
        Some(MatchResult::new(groups))
    }
}

/// A newly changed task reported by a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    task_id: TaskId,
    reference: String,
    title: String,
    changed_at: i32,
    groups: MatchResult,
}

impl TriggerEvent {
    /// Creates an event for `task` with the captured reference groups.
    #[must_use]
    pub fn new(task: &RemoteTaskSnapshot, groups: MatchResult) -> Self {
        Self {
            task_id: task.id(),
            reference: task.reference().to_owned(),
            title: task.title().to_owned(),
            changed_at: task.change_timestamp(),
            groups,
        }
    }

    /// Returns the remote task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the change timestamp that made the task eligible.
    #[must_use]
    pub const fn changed_at(&self) -> i32 {
        self.changed_at
    }

    /// Returns the change timestamp as a UTC date-time.
    #[must_use]
    pub fn changed_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.changed_at), 0)
    }

    /// Returns the reference capture groups.
    #[must_use]
    pub const fn groups(&self) -> &MatchResult {
        &self.groups
    }

    /// Human-readable cause of the triggered run: the task title.
    #[must_use]
    pub fn short_description(&self) -> &str {
        &self.title
    }

    /// Named parameters handed to the triggered run.
    ///
    /// The reference is exported as `KANBOARD_TASKREF` and each captured
    /// group `i` as `KANBOARD_TASKREF_i`.
    #[must_use]
    pub fn parameters(&self) -> Vec<(String, String)> {
        let reference = (TASK_REFERENCE_PARAMETER.to_owned(), self.reference.clone());
        let groups = self
            .groups
            .groups()
            .iter()
            .enumerate()
            .map(|(index, group)| (format!("{TASK_REFERENCE_PARAMETER}_{index}"), group.clone()));
        std::iter::once(reference).chain(groups).collect()
    }
}

/// Result of filtering one batch of poll candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSelection {
    /// Matching candidates changed after the previous watermark.
    pub events: Vec<TriggerEvent>,
    /// Highest change timestamp seen across every candidate, never below the
    /// previous watermark.
    pub next_watermark: Watermark,
}

/// Selects the candidates changed after `watermark` whose reference passes
/// `filter`.
///
/// The next watermark tracks every candidate, matching or not, so tasks
/// excluded by the filter are not reconsidered on the next cycle.
#[must_use]
pub fn select_changed(
    candidates: &[RemoteTaskSnapshot],
    filter: &ReferenceFilter,
    watermark: Watermark,
) -> PollSelection {
    let events = candidates
        .iter()
        .filter(|task| watermark.is_passed_by(task.change_timestamp()))
        .filter_map(|task| {
            filter
                .matches(task.reference())
                .map(|groups| TriggerEvent::new(task, groups))
        })
        .collect();
    let next_watermark = candidates
        .iter()
        .fold(watermark, |high, task| high.raised_to(task.change_timestamp()));
    PollSelection {
        events,
        next_watermark,
    }
}
