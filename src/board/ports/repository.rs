//! Repository port for board persistence and position management.
//!
//! Every mutating method is one atomic unit: implementations apply the
//! position shifts and the final write together or not at all, and serialize
//! conflicting mutations so the density of each column is never observed
//! broken between operations.

use crate::board::domain::{Column, NewTask, Position, Slot, Task, TaskId, TaskRevision};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Absolute position overwrite used by bulk reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAssignment {
    /// Task to reposition.
    pub id: TaskId,
    /// Position written verbatim.
    pub position: Position,
}

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Appends a new task at the end of its column and returns it placed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::DuplicateTask`] when the identifier is
    /// already stored.
    async fn append(&self, task: NewTask) -> BoardRepositoryResult<Task>;

    /// Applies a revision to a task's non-positional fields.
    ///
    /// When the revision names a different column the task moves to the end
    /// of that column and the gap in its old column is closed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the task does not exist.
    async fn revise(
        &self,
        id: TaskId,
        revision: &TaskRevision,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task>;

    /// Removes a task and closes the gap it leaves in its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the task does not exist.
    async fn remove(&self, id: TaskId, at: DateTime<Utc>) -> BoardRepositoryResult<()>;

    /// Moves a task to `destination`, shifting the tasks around it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the task does not exist
    /// and [`BoardRepositoryError::PositionOutOfRange`] when the destination
    /// lies past the end of the destination column.
    async fn relocate(
        &self,
        id: TaskId,
        destination: Slot,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task>;

    /// Writes every assignment verbatim, all or nothing.
    ///
    /// Assignments are not checked for density; the caller supplies a
    /// coherent renumbering.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] for the first unknown task;
    /// no assignment is persisted in that case.
    async fn overwrite_positions(
        &self,
        assignments: &[PositionAssignment],
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> BoardRepositoryResult<Option<Task>>;

    /// Returns every task ordered by column (board order) then position.
    async fn list(&self) -> BoardRepositoryResult<Vec<Task>>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The requested position lies past the end of the column.
    #[error("position {requested} is out of range for column {column}, last insertable is {last}")]
    PositionOutOfRange {
        /// Destination column.
        column: Column,
        /// Requested position.
        requested: Position,
        /// Largest accepted position.
        last: Position,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
