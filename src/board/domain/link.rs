//! External link descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BoardDomainError;

/// Kind of external link understood by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Let the remote service detect the type.
    Auto,
    /// Link to a downloadable attachment.
    Attachment,
    /// Link to a file.
    File,
    /// Plain web link.
    #[default]
    Weblink,
}

impl LinkType {
    /// Returns the wire name of the link type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Attachment => "attachment",
            Self::File => "file",
            Self::Weblink => "weblink",
        }
    }

    /// Looks up a link type by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Auto, Self::Attachment, Self::File, Self::Weblink]
            .into_iter()
            .find(|kind| kind.as_str() == name.trim())
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired external link, written as `url[|type[|title]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinkSpec {
    url: String,
    link_type: LinkType,
    title: Option<String>,
}

impl ExternalLinkSpec {
    /// Parses a pipe-delimited link descriptor.
    ///
    /// Unknown link types fall back to [`LinkType::Weblink`]; a blank title
    /// is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidExternalLink`] when the URL part is
    /// blank.
    pub fn parse(descriptor: &str) -> Result<Self, BoardDomainError> {
        let mut parts = descriptor.split('|');
        let url = parts.next().unwrap_or_default().trim();
        if url.is_empty() {
            return Err(BoardDomainError::InvalidExternalLink(descriptor.to_owned()));
        }
        let link_type = parts
            .next()
            .and_then(LinkType::from_name)
            .unwrap_or_default();
        let title = parts
            .next()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_owned);

        Ok(Self {
            url: url.to_owned(),
            link_type,
            title,
        })
    }

    /// Returns the link target.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the link type.
    #[must_use]
    pub const fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Returns the link title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
