//! Identifier and validated scalar types for the board domain.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task on the board.
///
/// Identifiers are random and never reused, so a deleted task's identifier
/// cannot resurface on a later task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based rank of a task within its column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// The first slot of every column.
    pub const FIRST: Self = Self(0);

    /// Largest position representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u32 = i32::MAX as u32;

    /// Creates a position from an unsigned rank.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates a position from untrusted signed input.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidPosition`] when the value is
    /// negative or exceeds the schema-backed maximum (`i32::MAX`).
    pub fn from_signed(value: i64) -> Result<Self, BoardDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|rank| *rank <= Self::MAX_PERSISTED_VALUE)
            .map(Self)
            .ok_or(BoardDomainError::InvalidPosition(value))
    }

    /// Returns the position of a column holding `len` tasks when a task is
    /// appended to it.
    #[must_use]
    pub fn after_last(len: usize) -> Self {
        Self(u32::try_from(len).unwrap_or(Self::MAX_PERSISTED_VALUE))
    }

    /// Returns the underlying rank.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the next position down the column.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the previous position up the column, saturating at the top.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
