//! Ordering semantics of [`PostgresBoardRepository`].

use crate::postgres::helpers::{BoxError, board_context};
use crate::test_helpers::{SteppingClock, lane, seed};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskboard::board::{
    domain::{Column, NewTask, TaskDetails, TaskId},
    ports::{BoardRepository, BoardRepositoryError},
    services::{
        BoardServiceError, CreateTaskRequest, ErrorKind, MoveTaskRequest, ReorderTasksRequest,
        UpdateTaskRequest,
    },
};

#[rstest]
fn postgres_create_appends_and_list_orders_by_column(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        seed(&ctx.service, Column::Completed, &["done"]).await?;
        let todo = seed(&ctx.service, Column::Todo, &["a", "b", "c"]).await?;

        let positions: Vec<u32> = todo.iter().map(|task| task.position().value()).collect();
        assert_eq!(positions, [0, 1, 2]);

        let titles: Vec<String> = ctx
            .service
            .list_tasks()
            .await?
            .iter()
            .map(|task| task.title().to_owned())
            .collect();
        assert_eq!(titles, ["a", "b", "c", "done"]);

        let fetched = ctx
            .service
            .get_task(todo.first().map(|task| task.id()).ok_or("empty seed")?)
            .await?
            .ok_or("task should exist")?;
        assert_eq!(Some(&fetched), todo.first());
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_create_stores_long_colors(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let color = "x".repeat(300);
        let created = ctx
            .service
            .create_task(CreateTaskRequest::new("Palette", color.clone()))
            .await?;
        assert_eq!(created.color(), color);

        let stored = ctx
            .repository
            .find_by_id(created.id())
            .await?
            .ok_or("task should exist")?;
        assert_eq!(stored.color(), color);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
#[case("todo", 3, &["A@0", "C@1", "D@2", "B@3"], &[])]
#[case("todo", 0, &["B@0", "A@1", "C@2", "D@3"], &[])]
#[case("in_progress", 1, &["A@0", "C@1", "D@2"], &["X@0", "B@1", "Y@2"])]
#[case("in_progress", 2, &["A@0", "C@1", "D@2"], &["X@0", "Y@1", "B@2"])]
fn postgres_move_shifts_neighbours(
    shared_test_cluster: &'static TestCluster,
    #[case] column: &str,
    #[case] position: i64,
    #[case] expected_todo: &[&str],
    #[case] expected_in_progress: &[&str],
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["A", "B", "C", "D"]).await?;
        seed(&ctx.service, Column::InProgress, &["X", "Y"]).await?;
        let b = todo.get(1).ok_or("missing seeded task")?;

        let moved = ctx
            .service
            .move_task(MoveTaskRequest::new(b.id(), column, position))
            .await?;

        assert!(moved.updated_at() > b.updated_at());
        assert_eq!(lane(&ctx.service, Column::Todo).await?, expected_todo);
        if !expected_in_progress.is_empty() {
            assert_eq!(
                lane(&ctx.service, Column::InProgress).await?,
                expected_in_progress
            );
        }
        assert!(ctx.service.audit_density().await?.is_empty());
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_move_past_end_rolls_back(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["A", "B"]).await?;
        let a = todo.first().ok_or("missing seeded task")?;

        let err = ctx
            .service
            .move_task(MoveTaskRequest::new(a.id(), "completed", 1))
            .await
            .expect_err("completed is empty, so only position 0 is valid");

        assert!(matches!(
            err,
            BoardServiceError::Repository(BoardRepositoryError::PositionOutOfRange { .. })
        ));
        assert_eq!(lane(&ctx.service, Column::Todo).await?, ["A@0", "B@1"]);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_delete_closes_gap(shared_test_cluster: &'static TestCluster) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["A", "B", "C", "D"]).await?;
        seed(&ctx.service, Column::Completed, &["Z"]).await?;
        let b = todo.get(1).ok_or("missing seeded task")?;

        ctx.service.delete_task(b.id()).await?;

        assert_eq!(lane(&ctx.service, Column::Todo).await?, ["A@0", "C@1", "D@2"]);
        assert_eq!(lane(&ctx.service, Column::Completed).await?, ["Z@0"]);
        let missing = ctx.service.delete_task(b.id()).await.expect_err("already gone");
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_update_changes_fields_and_column(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["A", "B"]).await?;
        let a = todo.first().ok_or("missing seeded task")?;

        let updated = ctx
            .service
            .update_task(
                UpdateTaskRequest::new(a.id())
                    .with_title("A2")
                    .with_description("notes")
                    .with_color("amber")
                    .in_column("completed"),
            )
            .await?;

        assert_eq!(updated.title(), "A2");
        assert_eq!(updated.description(), Some("notes"));
        assert_eq!(updated.color(), "amber");
        assert_eq!(lane(&ctx.service, Column::Todo).await?, ["B@0"]);
        assert_eq!(lane(&ctx.service, Column::Completed).await?, ["A2@0"]);

        let cleared = ctx
            .service
            .update_task(UpdateTaskRequest::new(a.id()).clearing_description())
            .await?;
        assert_eq!(cleared.description(), None);
        assert_eq!(cleared.title(), "A2");
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_reorder_is_all_or_nothing(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["A", "B", "C"]).await?;
        let ids: Vec<TaskId> = todo.iter().map(|task| task.id()).collect();

        let failing: ReorderTasksRequest = [(ids[2], 0), (TaskId::new(), 1), (ids[0], 2)]
            .into_iter()
            .collect();
        let err = ctx
            .service
            .reorder_tasks(failing)
            .await
            .expect_err("unknown id aborts the batch");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(lane(&ctx.service, Column::Todo).await?, ["A@0", "B@1", "C@2"]);

        let renumbering: ReorderTasksRequest = [(ids[2], 0), (ids[0], 1), (ids[1], 2)]
            .into_iter()
            .collect();
        ctx.service.reorder_tasks(renumbering).await?;
        assert_eq!(lane(&ctx.service, Column::Todo).await?, ["C@0", "A@1", "B@2"]);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_append_rejects_duplicate_identifiers(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 1)?;
    ctx.runtime.block_on(async {
        let draft = NewTask::new(
            TaskDetails::new("A", None, "olive")?,
            Column::InProgress,
            &SteppingClock::new(),
        );
        let stored = ctx.repository.append(draft.clone()).await?;
        assert_eq!(stored.position().value(), 0);

        let err = ctx
            .repository
            .append(draft.clone())
            .await
            .expect_err("identifier is already stored");
        assert!(matches!(err, BoardRepositoryError::DuplicateTask(id) if id == draft.id()));

        let found = ctx
            .repository
            .find_by_id(draft.id())
            .await?
            .ok_or("task should exist")?;
        assert_eq!(found, stored);
        assert_eq!(ctx.repository.list().await?.len(), 1);
        Ok::<(), BoxError>(())
    })
}
