//! Desired task state supplied by the caller.

use camino::Utf8PathBuf;

use super::{BoardDomainError, ExternalLinkSpec, PositionSpec, TagEdit};

/// Caller-supplied description of how a remote task should look.
///
/// Only the project identifier and task reference are required. Every other
/// field is optional and blank values are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskSpecification {
    project_identifier: String,
    reference: String,
    title: Option<String>,
    description: Option<String>,
    column: Option<String>,
    swimlane: Option<String>,
    color: Option<String>,
    owner: Option<String>,
    creator: Option<String>,
    tags: Option<String>,
    attachments: Vec<Utf8PathBuf>,
    external_links: Vec<String>,
    comment: Option<String>,
    subtask_title: Option<String>,
}

impl TaskSpecification {
    /// Creates a specification for the task `reference` in project
    /// `project_identifier`.
    #[must_use]
    pub fn new(project_identifier: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            project_identifier: project_identifier.into(),
            reference: reference.into(),
            ..Self::default()
        }
    }

    /// Sets the title used when the task is created.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description used when the task is created.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the column placement (`0`, `+N`, `-N` or `N`).
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Sets the swimlane placement (`0`, `+N`, `-N` or `N`).
    #[must_use]
    pub fn with_swimlane(mut self, swimlane: impl Into<String>) -> Self {
        self.swimlane = Some(swimlane.into());
        self
    }

    /// Sets the color identifier used when the task is created.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the owner username.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the creator username.
    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Sets the tag edit expression.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Sets the workspace-relative paths of files to attach.
    #[must_use]
    pub fn with_attachments(mut self, paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        self.attachments = paths.into_iter().collect();
        self
    }

    /// Sets the external link descriptors (`url[|type[|title]]`).
    #[must_use]
    pub fn with_external_links(mut self, links: impl IntoIterator<Item = String>) -> Self {
        self.external_links = links.into_iter().collect();
        self
    }

    /// Sets the comment appended on every run.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the title of the subtask to ensure.
    #[must_use]
    pub fn with_subtask(mut self, title: impl Into<String>) -> Self {
        self.subtask_title = Some(title.into());
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn project_identifier(&self) -> &str {
        &self.project_identifier
    }

    /// Returns the task reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Validates the specification and parses its mini-languages.
    pub(crate) fn validate(&self) -> Result<DesiredTask, BoardDomainError> {
        let project_identifier = required(&self.project_identifier, "project identifier")?;
        let reference = required(&self.reference, "task reference")?;
        let column = parse_placement(self.column.as_deref())?;
        let swimlane = parse_placement(self.swimlane.as_deref())?;
        let external_links = self
            .external_links
            .iter()
            .filter(|descriptor| !descriptor.trim().is_empty())
            .map(|descriptor| ExternalLinkSpec::parse(descriptor))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DesiredTask {
            project_identifier,
            reference,
            title: present(self.title.as_deref()),
            description: present(self.description.as_deref()),
            column,
            swimlane,
            color: present(self.color.as_deref()).map(|color| color.trim().to_owned()),
            owner: present(self.owner.as_deref()).map(|owner| owner.trim().to_owned()),
            creator: present(self.creator.as_deref()).map(|creator| creator.trim().to_owned()),
            tags: self.tags.as_deref().map(TagEdit::parse).unwrap_or_default(),
            attachments: self
                .attachments
                .iter()
                .filter(|path| !path.as_str().trim().is_empty())
                .cloned()
                .collect(),
            external_links,
            comment: present(self.comment.as_deref()),
            subtask_title: present(self.subtask_title.as_deref()),
        })
    }
}

/// Validated, parsed form of a [`TaskSpecification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DesiredTask {
    pub(crate) project_identifier: String,
    pub(crate) reference: String,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) column: PositionSpec,
    pub(crate) swimlane: PositionSpec,
    pub(crate) color: Option<String>,
    pub(crate) owner: Option<String>,
    pub(crate) creator: Option<String>,
    pub(crate) tags: TagEdit,
    pub(crate) attachments: Vec<Utf8PathBuf>,
    pub(crate) external_links: Vec<ExternalLinkSpec>,
    pub(crate) comment: Option<String>,
    pub(crate) subtask_title: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, BoardDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned)
}

fn parse_placement(value: Option<&str>) -> Result<PositionSpec, BoardDomainError> {
    value.map_or(Ok(PositionSpec::Unchanged), PositionSpec::parse)
}
