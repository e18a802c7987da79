//! Request payloads accepted by the board service.
//!
//! Payloads carry caller input as received: column names are strings and
//! positions are signed integers. The service parses them into domain values
//! before anything touches the store.

use crate::board::domain::TaskId;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) title: String,
    pub(super) description: Option<String>,
    pub(super) color: String,
    pub(super) column: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields; the task lands in the
    /// intake column unless [`Self::in_column`] says otherwise.
    #[must_use]
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            color: color.into(),
            column: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the target column by name.
    #[must_use]
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Request payload for editing a task's non-positional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub(super) id: TaskId,
    pub(super) title: Option<String>,
    pub(super) description: Option<Option<String>>,
    pub(super) color: Option<String>,
    pub(super) column: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing but the update timestamp.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            description: None,
            color: None,
            column: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clears the description.
    #[must_use]
    pub fn clearing_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the color tag.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sends the task to the end of another column.
    #[must_use]
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Request payload for moving a task to a column and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    pub(super) id: TaskId,
    pub(super) column: String,
    pub(super) position: i64,
}

impl MoveTaskRequest {
    /// Creates a move request.
    #[must_use]
    pub fn new(id: TaskId, column: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            column: column.into(),
            position,
        }
    }
}

/// Request payload for overwriting the positions of several tasks at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderTasksRequest {
    pub(super) items: Vec<(TaskId, i64)>,
}

impl ReorderTasksRequest {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds one absolute position write to the batch.
    #[must_use]
    pub fn with_item(mut self, id: TaskId, position: i64) -> Self {
        self.items.push((id, position));
        self
    }
}

impl FromIterator<(TaskId, i64)> for ReorderTasksRequest {
    fn from_iter<I: IntoIterator<Item = (TaskId, i64)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
