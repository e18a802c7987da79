//! Board columns and task slots.

use super::{ParseColumnError, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status lane a task belongs to.
///
/// The variant order is the board order: listing and lane grouping walk the
/// columns in this order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Intake column for work that has not started.
    #[default]
    Todo,
    /// Work currently under way.
    InProgress,
    /// Finished work.
    Completed,
}

impl Column {
    /// Every column in board order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Returns the column new tasks land in when none is requested.
    #[must_use]
    pub const fn intake() -> Self {
        Self::Todo
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns the human-readable lane heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl TryFrom<&str> for Column {
    type Error = ParseColumnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseColumnError(value.to_owned())),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column and a position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Column holding the slot.
    pub column: Column,
    /// Zero-based rank inside the column.
    pub position: Position,
}

impl Slot {
    /// Creates a slot.
    #[must_use]
    pub const fn new(column: Column, position: Position) -> Self {
        Self { column, position }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.column, self.position)
    }
}
