//! `PostgreSQL` repository implementation for board storage.
//!
//! Each mutation runs in one `READ COMMITTED` transaction whose first
//! statement takes a transaction-scoped advisory lock on the board. Competing
//! mutations block on that lock until the holder commits or rolls back, and
//! every statement after the lock reads committed state, so read-then-shift
//! sequences cannot interleave.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::board::{
    domain::{
        Column, NewTask, PersistedTaskData, Position, PositionShift, Slot, Task, TaskId,
        TaskRevision, last_insertable, plan_move, plan_removal,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult, PositionAssignment},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Advisory lock key used when none is configured.
pub const DEFAULT_BOARD_LOCK_KEY: i64 = 0x7461_736b_626f_6172;

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
    lock_key: i64,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self {
            pool,
            lock_key: DEFAULT_BOARD_LOCK_KEY,
        }
    }

    /// Uses `lock_key` for the board's advisory lock.
    ///
    /// Boards sharing a database must use distinct keys only if they live in
    /// distinct tables; the key serializes every writer that uses it.
    #[must_use]
    pub const fn with_lock_key(mut self, lock_key: i64) -> Self {
        self.lock_key = lock_key;
        self
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &BoardPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }

    /// Runs `f` inside a transaction holding the board lock.
    ///
    /// Any error returned by `f` rolls the whole transaction back.
    async fn run_locked<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let lock_key = self.lock_key;
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_committed()
                .run(|tx| {
                    lock_board(tx, lock_key)?;
                    f(tx)
                })
        })
        .await
    }
}

impl From<DieselError> for BoardRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn append(&self, task: NewTask) -> BoardRepositoryResult<Task> {
        let task_id = task.id();
        self.run_locked(move |tx| {
            let occupants = count_column(tx, task.column(), None)?;
            let placed = task.place(Position::after_last(occupants));

            diesel::insert_into(tasks::table)
                .values(&to_new_row(&placed)?)
                .execute(tx)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::DuplicateTask(task_id)
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            Ok(placed)
        })
        .await
    }

    async fn revise(
        &self,
        id: TaskId,
        revision: &TaskRevision,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task> {
        let owned_revision = revision.clone();
        self.run_locked(move |tx| {
            let mut task = row_to_task(fetch_for_update(tx, id)?)?;
            let source = task.slot();

            if let Some(column) = owned_revision
                .column
                .filter(|column| *column != source.column)
            {
                apply_shift(tx, &plan_removal(source), id, at)?;
                let occupants = count_column(tx, column, Some(id))?;
                task.relocate(Slot::new(column, Position::after_last(occupants)), at);
            }
            task.revise(&owned_revision, at);

            diesel::update(tasks::table.find(id.into_inner()))
                .set(&to_changeset(&task)?)
                .execute(tx)?;
            Ok(task)
        })
        .await
    }

    async fn remove(&self, id: TaskId, at: DateTime<Utc>) -> BoardRepositoryResult<()> {
        self.run_locked(move |tx| {
            let vacated = row_to_task(fetch_for_update(tx, id)?)?.slot();
            diesel::delete(tasks::table.find(id.into_inner())).execute(tx)?;
            let shifted = apply_shift(tx, &plan_removal(vacated), id, at)?;
            tracing::trace!(task_id = %id, %vacated, shifted, "closed gap after removal");
            Ok(())
        })
        .await
    }

    async fn relocate(
        &self,
        id: TaskId,
        destination: Slot,
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<Task> {
        self.run_locked(move |tx| {
            let source = row_to_task(fetch_for_update(tx, id)?)?.slot();

            let last = last_insertable(count_column(tx, destination.column, Some(id))?);
            if destination.position > last {
                return Err(BoardRepositoryError::PositionOutOfRange {
                    column: destination.column,
                    requested: destination.position,
                    last,
                });
            }

            let mut shifted = 0;
            for shift in plan_move(source, destination) {
                shifted += apply_shift(tx, &shift, id, at)?;
            }
            tracing::trace!(task_id = %id, %source, %destination, shifted, "shifted neighbours");

            let row = diesel::update(tasks::table.find(id.into_inner()))
                .set((
                    tasks::column_name.eq(destination.column.as_str()),
                    tasks::position.eq(to_db_position(destination.position)?),
                    tasks::updated_at.eq(at),
                ))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(tx)?;
            row_to_task(row)
        })
        .await
    }

    async fn overwrite_positions(
        &self,
        assignments: &[PositionAssignment],
        at: DateTime<Utc>,
    ) -> BoardRepositoryResult<()> {
        let owned_assignments = assignments.to_vec();
        self.run_locked(move |tx| {
            for assignment in owned_assignments {
                let updated = diesel::update(tasks::table.find(assignment.id.into_inner()))
                    .set((
                        tasks::position.eq(to_db_position(assignment.position)?),
                        tasks::updated_at.eq(at),
                    ))
                    .execute(tx)?;
                if updated == 0 {
                    return Err(BoardRepositoryError::NotFound(assignment.id));
                }
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> BoardRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> BoardRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::position.asc(), tasks::created_at.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            let mut listed = rows
                .into_iter()
                .map(row_to_task)
                .collect::<BoardRepositoryResult<Vec<_>>>()?;
            // Column order is board order, not collation order.
            listed.sort_by_key(|task| (task.column(), task.position(), task.created_at()));
            Ok(listed)
        })
        .await
    }
}

fn lock_board(connection: &mut PgConnection, lock_key: i64) -> BoardRepositoryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<diesel::sql_types::BigInt, _>(lock_key)
        .execute(connection)?;
    Ok(())
}

fn fetch_for_update(connection: &mut PgConnection, id: TaskId) -> BoardRepositoryResult<TaskRow> {
    tasks::table
        .find(id.into_inner())
        .select(TaskRow::as_select())
        .for_update()
        .first::<TaskRow>(connection)
        .optional()?
        .ok_or(BoardRepositoryError::NotFound(id))
}

fn count_column(
    connection: &mut PgConnection,
    column: Column,
    excluding: Option<TaskId>,
) -> BoardRepositoryResult<usize> {
    let mut query = tasks::table
        .filter(tasks::column_name.eq(column.as_str()))
        .into_boxed();
    if let Some(id) = excluding {
        query = query.filter(tasks::id.ne(id.into_inner()));
    }
    let count = query.count().get_result::<i64>(connection)?;
    usize::try_from(count).map_err(BoardRepositoryError::persistence)
}

/// Applies one ranged shift to every task but `moving`, returning the number
/// of shifted rows.
fn apply_shift(
    connection: &mut PgConnection,
    shift: &PositionShift,
    moving: TaskId,
    at: DateTime<Utc>,
) -> BoardRepositoryResult<usize> {
    let from = to_db_position(shift.from)?;
    let through = shift
        .through
        .map(to_db_position)
        .transpose()?
        .unwrap_or(i32::MAX);

    let shifted = diesel::update(
        tasks::table
            .filter(tasks::column_name.eq(shift.column.as_str()))
            .filter(tasks::position.between(from, through))
            .filter(tasks::id.ne(moving.into_inner())),
    )
    .set((
        tasks::position.eq(tasks::position + shift.direction.delta()),
        tasks::updated_at.eq(at),
    ))
    .execute(connection)?;
    Ok(shifted)
}

fn to_db_position(position: Position) -> BoardRepositoryResult<i32> {
    i32::try_from(position.value()).map_err(BoardRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> BoardRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        color: task.color().to_owned(),
        column_name: task.column().as_str().to_owned(),
        position: to_db_position(task.position())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> BoardRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        color: task.color().to_owned(),
        column_name: task.column().as_str().to_owned(),
        position: to_db_position(task.position())?,
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> BoardRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        color,
        column_name,
        position,
        created_at,
        updated_at,
    } = row;

    let column =
        Column::try_from(column_name.as_str()).map_err(BoardRepositoryError::persistence)?;
    let rank = u32::try_from(position).map_err(BoardRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        color,
        column,
        position: Position::new(rank),
        created_at,
        updated_at,
    }))
}
