//! Task aggregate and the field sets used to create and revise it.

use super::{BoardDomainError, Column, Position, Slot, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated non-positional task fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: String,
    description: Option<String>,
    color: String,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] or
    /// [`BoardDomainError::EmptyColor`] when either value is blank.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        color: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: validate_title(title.into())?,
            description,
            color: validate_color(color.into())?,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the display color tag.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }
}

/// Partial change to a task's non-positional fields.
///
/// `description` distinguishes "leave as is" (`None`) from "clear"
/// (`Some(None)`). A `column` that differs from the task's current column
/// relocates the task to the end of that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRevision {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<Option<String>>,
    /// Replacement color tag.
    pub color: Option<String>,
    /// Column to relocate the task to.
    pub column: Option<Column>,
}

impl TaskRevision {
    /// Checks the replacement values.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] or
    /// [`BoardDomainError::EmptyColor`] when a supplied value is blank.
    pub fn validated(self) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: self.title.map(validate_title).transpose()?,
            color: self.color.map(validate_color).transpose()?,
            ..self
        })
    }
}

/// A task that has not been placed on the board yet.
///
/// The store assigns the position when it appends the task to its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    id: TaskId,
    details: TaskDetails,
    column: Column,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a draft stamped with the clock's current time.
    #[must_use]
    pub fn new(details: TaskDetails, column: Column, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            details,
            column,
            created_at: clock.utc(),
        }
    }

    /// Returns the identifier the task will carry.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the target column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the task details.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Places the draft at `position` in its column.
    #[must_use]
    pub fn place(self, position: Position) -> Task {
        Task {
            id: self.id,
            details: self.details,
            slot: Slot::new(self.column, position),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    #[serde(flatten)]
    details: TaskDetails,
    #[serde(flatten)]
    slot: Slot,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted color tag.
    pub color: String,
    /// Persisted column.
    pub column: Column,
    /// Persisted position within the column.
    pub position: Position,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    ///
    /// Stored values are trusted and not revalidated.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            details: TaskDetails {
                title: data.title,
                description: data.description,
                color: data.color,
            },
            slot: Slot::new(data.column, data.position),
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.details.title()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.details.description()
    }

    /// Returns the display color tag.
    #[must_use]
    pub fn color(&self) -> &str {
        self.details.color()
    }

    /// Returns the column holding the task.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.slot.column
    }

    /// Returns the position within the column.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.slot.position
    }

    /// Returns the column and position together.
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `slot` and stamps it.
    pub fn relocate(&mut self, slot: Slot, at: DateTime<Utc>) {
        self.slot = slot;
        self.updated_at = at;
    }

    /// Applies the non-positional parts of a revision and stamps the task.
    ///
    /// The revision's column is ignored here; relocation is the store's job.
    pub fn revise(&mut self, revision: &TaskRevision, at: DateTime<Utc>) {
        if let Some(title) = &revision.title {
            title.clone_into(&mut self.details.title);
        }
        if let Some(description) = &revision.description {
            self.details.description.clone_from(description);
        }
        if let Some(color) = &revision.color {
            color.clone_into(&mut self.details.color);
        }
        self.updated_at = at;
    }
}

fn validate_title(title: String) -> Result<String, BoardDomainError> {
    if title.trim().is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    Ok(title)
}

fn validate_color(color: String) -> Result<String, BoardDomainError> {
    if color.trim().is_empty() {
        return Err(BoardDomainError::EmptyColor);
    }
    Ok(color)
}
