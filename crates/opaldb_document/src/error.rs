//! Error types for document parsing.

use crate::document::ValueKind;
use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while parsing a boundary parameter.
///
/// Every variant carries the name of the parameter it was produced for,
/// so callers can surface "projection must be a document" rather than a
/// bare parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not valid JSON.
    #[error("{param} is not a valid document: {detail}")]
    Malformed {
        /// Name of the offending parameter.
        param: String,
        /// Parser diagnostic.
        detail: String,
    },

    /// The text parsed, but the top-level value has the wrong kind.
    #[error("{param} must be {expected}, found {actual}")]
    WrongKind {
        /// Name of the offending parameter.
        param: String,
        /// The kind the parameter requires.
        expected: ValueKind,
        /// The kind that was actually supplied.
        actual: ValueKind,
    },

    /// An element of an array parameter has the wrong kind.
    #[error("{param}[{index}] must be {expected}, found {actual}")]
    WrongElementKind {
        /// Name of the offending parameter.
        param: String,
        /// Index of the offending element.
        index: usize,
        /// The kind the elements require.
        expected: ValueKind,
        /// The kind that was actually supplied.
        actual: ValueKind,
    },
}

impl DocumentError {
    /// Creates a malformed-input error for the given parameter.
    pub fn malformed(param: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            param: param.into(),
            detail: detail.into(),
        }
    }

    /// Returns the name of the parameter this error was produced for.
    pub fn param(&self) -> &str {
        match self {
            DocumentError::Malformed { param, .. }
            | DocumentError::WrongKind { param, .. }
            | DocumentError::WrongElementKind { param, .. } => param,
        }
    }
}
