//! Error types for board domain validation and parsing.

use super::{Status, Subject};
use thiserror::Error;

/// Errors returned by board domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The requested status change is not listed in the transition table.
    #[error("cannot move {subject} from {from} to {to}")]
    InvalidTransition {
        /// Item the move was requested for.
        subject: Subject,
        /// Status the item currently has.
        from: Status,
        /// Status the move asked for.
        to: Status,
    },

    /// The item title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing a status label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

/// Error returned while parsing a priority label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing a task type label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);
