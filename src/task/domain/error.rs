//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The ticket identifier is out of range.
    #[error("invalid ticket id {0}, expected a positive integer")]
    InvalidTicketId(u64),

    /// The user identifier is out of range.
    #[error("invalid user id {0}, expected a positive integer")]
    InvalidUserId(u64),
}

/// Error returned while parsing ticket statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ticket status: {0}")]
pub struct ParseTicketStatusError(pub String);
