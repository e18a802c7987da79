//! In-memory board repository for tests and embedded use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        Column, NewTask, Position, PositionShift, Slot, Task, TaskId, TaskRevision,
        last_insertable, plan_move, plan_removal,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, PositionAssignment},
};

/// Thread-safe in-memory board repository.
///
/// Every mutation holds the write lock for its whole duration and checks its
/// preconditions before touching any task, so a failed call leaves the board
/// exactly as it found it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryBoardState {
    fn column_len(&self, column: Column, excluding: Option<TaskId>) -> usize {
        self.tasks
            .values()
            .filter(|task| task.column() == column && Some(task.id()) != excluding)
            .count()
    }

    /// Applies `shifts` to every task except `moving`.
    fn apply_shifts(&mut self, shifts: &[PositionShift], moving: TaskId, at: DateTime<Utc>) {
        for task in self.tasks.values_mut().filter(|task| task.id() != moving) {
            let slot = task.slot();
            if let Some(shift) = shifts.iter().find(|shift| shift.covers(slot)) {
                task.relocate(Slot::new(slot.column, shift.apply(slot.position)), at);
            }
        }
    }

    fn slot_of(&self, id: TaskId) -> BoardRepositoryResult<Slot> {
        self.tasks
            .get(&id)
            .map(Task::slot)
            .ok_or(BoardRepositoryError::NotFound(id))
    }

    fn task_mut(&mut self, id: TaskId) -> BoardRepositoryResult<&mut Task> {
        self.tasks
            .get_mut(&id)
            .ok_or(BoardRepositoryError::NotFound(id))
    }
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> BoardRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(&self) -> BoardRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn append(&self, task: NewTask) -> BoardRepositoryResult<Task> {
        let mut state = self.write_state()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(BoardRepositoryError::DuplicateTask(task.id()));
        }

        let position = Position::after_last(state.column_len(task.column(), None));
        let placed = task.place(position);
        state.tasks.insert(placed.id(), placed.clone());
        Ok(placed)
    }

    async fn revise(
        &self,
        id: TaskId,
        revision: &TaskRevision,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task> {
        let mut state = self.write_state()?;
        let source = state.slot_of(id)?;

        if let Some(column) = revision.column.filter(|column| *column != source.column) {
            state.apply_shifts(&[plan_removal(source)], id, at);
            let position = Position::after_last(state.column_len(column, Some(id)));
            state.task_mut(id)?.relocate(Slot::new(column, position), at);
        }

        let task = state.task_mut(id)?;
        task.revise(revision, at);
        Ok(task.clone())
    }

    async fn remove(&self, id: TaskId, at: DateTime<Utc>) -> BoardRepositoryResult<()> {
        let mut state = self.write_state()?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(BoardRepositoryError::NotFound(id))?;
        state.apply_shifts(&[plan_removal(removed.slot())], id, at);
        Ok(())
    }

    async fn relocate(
        &self,
        id: TaskId,
        destination: Slot,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task> {
        let mut state = self.write_state()?;
        let source = state.slot_of(id)?;

        let last = last_insertable(state.column_len(destination.column, Some(id)));
        if destination.position > last {
            return Err(BoardRepositoryError::PositionOutOfRange {
                column: destination.column,
                requested: destination.position,
                last,
            });
        }

        state.apply_shifts(&plan_move(source, destination), id, at);
        let task = state.task_mut(id)?;
        task.relocate(destination, at);
        Ok(task.clone())
    }

    async fn overwrite_positions(
        &self,
        assignments: &[PositionAssignment],
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<()> {
        let mut state = self.write_state()?;
        if let Some(missing) = assignments
            .iter()
            .find(|assignment| !state.tasks.contains_key(&assignment.id))
        {
            return Err(BoardRepositoryError::NotFound(missing.id));
        }

        for assignment in assignments {
            let task = state.task_mut(assignment.id)?;
            let column = task.column();
            task.relocate(Slot::new(column, assignment.position), at);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> BoardRepositoryResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> BoardRepositoryResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by_key(|task| (task.column(), task.position(), task.created_at()));
        Ok(tasks)
    }
}
