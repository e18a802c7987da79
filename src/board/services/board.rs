//! Service layer for board mutations and queries.

use super::requests::{CreateTaskRequest, MoveTaskRequest, ReorderTasksRequest, UpdateTaskRequest};
use crate::board::{
    domain::{
        Board, BoardDomainError, Column, DensityViolation, NewTask, Position, Slot, Task,
        TaskDetails, TaskId, TaskRevision, audit_density,
    },
    ports::{BoardRepository, BoardRepositoryError, PositionAssignment},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] BoardRepositoryError),
}

/// Coarse failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced task does not exist.
    NotFound,
    /// The input was rejected before any mutation began.
    Validation,
    /// The backing store failed; the operation was rolled back.
    Storage,
}

impl BoardServiceError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Repository(BoardRepositoryError::PositionOutOfRange { .. }) => {
                ErrorKind::Validation
            }
            Self::Repository(BoardRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(
                BoardRepositoryError::DuplicateTask(_) | BoardRepositoryError::Persistence(_),
            ) => ErrorKind::Storage,
        }
    }
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Board orchestration service.
///
/// Parses requests, stamps mutations with the injected clock, and hands
/// each one to the repository as a single atomic unit.
pub struct BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> BoardService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task at the end of its column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the title, color or column
    /// is invalid, or [`BoardServiceError::Repository`] when the store fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardServiceResult<Task> {
        let details = TaskDetails::new(request.title, request.description, request.color)
            .inspect_err(|err| tracing::warn!(error = %err, "rejected task creation"))?;
        let column = parse_optional_column(request.column.as_deref())?.unwrap_or_default();

        let draft = NewTask::new(details, column, &*self.clock);
        let id = draft.id();
        tracing::debug!(task_id = %id, %column, "creating task");
        let task = self
            .repository
            .append(draft)
            .await
            .inspect_err(|err| log_repository_failure(id, "create", err))?;
        tracing::info!(task_id = %task.id(), slot = %task.slot(), "task created");
        Ok(task)
    }

    /// Edits a task's non-positional fields.
    ///
    /// Naming a different column sends the task to the end of that column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for blank replacement values or
    /// an unknown column, and [`BoardServiceError::Repository`] with
    /// [`BoardRepositoryError::NotFound`] when the task does not exist.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> BoardServiceResult<Task> {
        let UpdateTaskRequest {
            id,
            title,
            description,
            color,
            column,
        } = request;
        let revision = TaskRevision {
            title,
            description,
            color,
            column: parse_optional_column(column.as_deref())?,
        }
        .validated()
        .inspect_err(|err| tracing::warn!(task_id = %id, error = %err, "rejected task update"))?;

        tracing::debug!(task_id = %id, "updating task");
        let task = self
            .repository
            .revise(id, &revision, self.clock.utc())
            .await
            .inspect_err(|err| log_repository_failure(id, "update", err))?;
        tracing::info!(task_id = %id, slot = %task.slot(), "task updated");
        Ok(task)
    }

    /// Deletes a task and closes the gap it leaves.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] with
    /// [`BoardRepositoryError::NotFound`] when the task does not exist.
    pub async fn delete_task(&self, id: TaskId) -> BoardServiceResult<()> {
        tracing::debug!(task_id = %id, "deleting task");
        self.repository
            .remove(id, self.clock.utc())
            .await
            .inspect_err(|err| log_repository_failure(id, "delete", err))?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Moves a task to a column and position, shifting its neighbours.
    ///
    /// Moving a task onto its own slot still refreshes its update timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] for an unknown column or a
    /// negative position, and [`BoardServiceError::Repository`] when the task
    /// does not exist or the position lies past the end of the column.
    pub async fn move_task(&self, request: MoveTaskRequest) -> BoardServiceResult<Task> {
        let MoveTaskRequest {
            id,
            column,
            position,
        } = request;
        let destination = Slot::new(
            parse_column(&column)?,
            Position::from_signed(position)
                .inspect_err(|err| tracing::warn!(task_id = %id, error = %err, "rejected move"))?,
        );

        tracing::debug!(task_id = %id, %destination, "moving task");
        let task = self
            .repository
            .relocate(id, destination, self.clock.utc())
            .await
            .inspect_err(|err| log_repository_failure(id, "move", err))?;
        tracing::info!(task_id = %id, slot = %task.slot(), "task moved");
        Ok(task)
    }

    /// Overwrites the positions of several tasks, all or nothing.
    ///
    /// Positions are written verbatim and are not checked for density; use
    /// [`Self::audit_density`] to inspect the result.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when any position is negative,
    /// and [`BoardServiceError::Repository`] with
    /// [`BoardRepositoryError::NotFound`] when any task does not exist; in
    /// both cases no position changes.
    pub async fn reorder_tasks(&self, request: ReorderTasksRequest) -> BoardServiceResult<()> {
        let assignments = request
            .items
            .into_iter()
            .map(|(id, position)| {
                Position::from_signed(position)
                    .map(|rank| PositionAssignment { id, position: rank })
            })
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| tracing::warn!(error = %err, "rejected reorder"))?;
        if assignments.is_empty() {
            return Ok(());
        }

        tracing::debug!(count = assignments.len(), "reordering tasks");
        self.repository
            .overwrite_positions(&assignments, self.clock.utc())
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "reorder failed"))?;
        tracing::info!(count = assignments.len(), "tasks reordered");
        Ok(())
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the lookup fails.
    pub async fn get_task(&self, id: TaskId) -> BoardServiceResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Lists every task by column, then position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self) -> BoardServiceResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Returns the board grouped into lanes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the lookup fails.
    pub async fn board(&self) -> BoardServiceResult<Board> {
        Ok(Board::from_tasks(self.repository.list().await?))
    }

    /// Reports every column whose positions are not exactly `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Repository`] when the lookup fails.
    pub async fn audit_density(&self) -> BoardServiceResult<Vec<DensityViolation>> {
        let tasks = self.repository.list().await?;
        let violations = audit_density(&tasks);
        for violation in &violations {
            tracing::warn!(%violation, "column is not dense");
        }
        Ok(violations)
    }
}

fn parse_column(name: &str) -> Result<Column, BoardDomainError> {
    Column::try_from(name)
        .map_err(BoardDomainError::from)
        .inspect_err(|err| tracing::warn!(error = %err, "rejected column"))
}

fn parse_optional_column(name: Option<&str>) -> Result<Option<Column>, BoardDomainError> {
    name.map(parse_column).transpose()
}

fn log_repository_failure(id: TaskId, operation: &str, err: &BoardRepositoryError) {
    match err {
        BoardRepositoryError::NotFound(_) | BoardRepositoryError::PositionOutOfRange { .. } => {
            tracing::warn!(task_id = %id, operation, error = %err, "task command rejected");
        }
        BoardRepositoryError::DuplicateTask(_) | BoardRepositoryError::Persistence(_) => {
            tracing::error!(task_id = %id, operation, error = %err, "task command failed");
        }
    }
}
