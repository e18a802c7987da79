//! Concurrent callers against one shared in-memory board.

use crate::in_memory::helpers::{MemoryBoard, board};
use crate::test_helpers::seed;
use eyre::{Result, ensure, eyre};
use rstest::rstest;
use std::sync::Arc;
use taskboard::board::{
    domain::Column,
    services::{ErrorKind, MoveTaskRequest},
};
use tokio::task::JoinSet;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_moves_and_deletes_stay_dense(board: MemoryBoard) -> Result<()> {
    let todo = seed(&board, Column::Todo, &["t0", "t1", "t2", "t3", "t4", "t5"]).await?;
    let doing = seed(&board, Column::InProgress, &["p0", "p1", "p2"]).await?;
    let board = Arc::new(board);

    let mut calls = JoinSet::new();
    for task in &todo {
        let board = Arc::clone(&board);
        let id = task.id();
        calls.spawn(async move {
            board
                .move_task(MoveTaskRequest::new(id, "in_progress", 0))
                .await
                .map(drop)
        });
    }
    for task in &doing {
        let board = Arc::clone(&board);
        let id = task.id();
        calls.spawn(async move { board.delete_task(id).await });
    }

    while let Some(joined) = calls.join_next().await {
        joined??;
    }

    ensure!(
        board.audit_density().await?.is_empty(),
        "board should stay dense"
    );
    let snapshot = board.board().await?;
    let lengths: Vec<usize> = snapshot.lanes().iter().map(|lane| lane.len()).collect();
    assert_eq!(lengths, [0, 6, 0]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_deletes_of_one_task_fail_all_but_one(board: MemoryBoard) -> Result<()> {
    let tasks = seed(&board, Column::Todo, &["a", "b", "c"]).await?;
    let target = tasks.get(1).map(|task| task.id()).ok_or_else(|| eyre!("missing task"))?;
    let board = Arc::new(board);

    let mut calls = JoinSet::new();
    for _ in 0..4 {
        let board = Arc::clone(&board);
        calls.spawn(async move { board.delete_task(target).await });
    }

    let mut deleted = 0_usize;
    while let Some(joined) = calls.join_next().await {
        match joined? {
            Ok(()) => deleted += 1,
            Err(err) => ensure!(err.kind() == ErrorKind::NotFound, "unexpected error: {err}"),
        }
    }

    assert_eq!(deleted, 1);
    ensure!(board.audit_density().await?.is_empty(), "board should stay dense");
    Ok(())
}
