//! Concurrent writers on separate pooled connections.

use crate::postgres::helpers::{BoxError, board_context};
use crate::test_helpers::{lane, seed};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskboard::board::{domain::Column, services::MoveTaskRequest};
use tokio::task::JoinSet;

#[rstest]
fn postgres_concurrent_moves_into_one_slot_serialize(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 4)?;
    ctx.runtime.block_on(async {
        let movers = seed(&ctx.service, Column::Todo, &["a", "b", "c", "d", "e", "f"]).await?;
        seed(&ctx.service, Column::Completed, &["x", "y"]).await?;

        let mut calls = JoinSet::new();
        for task in &movers {
            let service = ctx.service.clone();
            let id = task.id();
            calls.spawn(async move {
                service
                    .move_task(MoveTaskRequest::new(id, "completed", 1))
                    .await
            });
        }
        let mut landed = Vec::with_capacity(movers.len());
        while let Some(joined) = calls.join_next().await {
            landed.push(joined??.position());
        }

        assert_eq!(landed.len(), movers.len());
        assert!(ctx.service.audit_density().await?.is_empty());
        assert!(lane(&ctx.service, Column::Todo).await?.is_empty());
        let completed = lane(&ctx.service, Column::Completed).await?;
        assert_eq!(completed.len(), 8);
        assert_eq!(completed.first().map(String::as_str), Some("x@0"));
        assert_eq!(completed.last().map(String::as_str), Some("y@7"));
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn postgres_mixed_writers_keep_columns_dense(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let ctx = board_context(shared_test_cluster, 4)?;
    ctx.runtime.block_on(async {
        let todo = seed(&ctx.service, Column::Todo, &["t0", "t1", "t2", "t3"]).await?;
        let doing = seed(&ctx.service, Column::InProgress, &["p0", "p1", "p2", "p3"]).await?;

        let mut calls = JoinSet::new();
        for task in &todo {
            let service = ctx.service.clone();
            let id = task.id();
            calls.spawn(async move {
                service
                    .move_task(MoveTaskRequest::new(id, "in_progress", 0))
                    .await
                    .map(drop)
            });
        }
        for task in &doing {
            let service = ctx.service.clone();
            let id = task.id();
            calls.spawn(async move { service.delete_task(id).await });
        }
        while let Some(joined) = calls.join_next().await {
            joined??;
        }

        let violations = ctx.service.audit_density().await?;
        assert!(violations.is_empty(), "density broken: {violations:?}");
        assert_eq!(lane(&ctx.service, Column::InProgress).await?.len(), 4);
        Ok::<(), BoxError>(())
    })
}
