//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while validating desired task state and parsing the
/// placement, tag and link mini-languages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A required field was missing or blank.
    #[error("{0} is required and must not be blank")]
    MissingField(&'static str),

    /// A column or swimlane placement could not be parsed.
    #[error("invalid placement '{0}', expected blank, 0, +N, -N or N")]
    InvalidPlacement(String),

    /// An external link descriptor had no URL.
    #[error("invalid external link '{0}', expected url[|type[|title]]")]
    InvalidExternalLink(String),

    /// The task reference pattern is not a valid regular expression.
    #[error("invalid reference pattern '{pattern}': {reason}")]
    InvalidReferencePattern {
        /// Pattern as supplied by the caller.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}
