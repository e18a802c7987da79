//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The color tag is empty after trimming.
    #[error("task color must not be empty")]
    EmptyColor,

    /// The column name is not one of the board columns.
    #[error(transparent)]
    UnknownColumn(#[from] ParseColumnError),

    /// A position was negative or too large to store.
    #[error("invalid position {0}, expected a non-negative integer")]
    InvalidPosition(i64),
}

/// Error returned while parsing board columns from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column: {0}")]
pub struct ParseColumnError(pub String);
