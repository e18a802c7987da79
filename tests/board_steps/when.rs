//! When steps for board BDD scenarios.

use super::world::{BoardWorld, entries, run_async};
use rstest_bdd_macros::when;
use taskboard::board::services::{MoveTaskRequest, ReorderTasksRequest};

#[when(r#"task "{title}" is moved to "{name}" at position {position:u64}"#)]
fn task_is_moved(
    world: &mut BoardWorld,
    title: String,
    name: String,
    position: u64,
) -> Result<(), eyre::Report> {
    let request = MoveTaskRequest::new(world.task_id(&title), name, i64::try_from(position)?);
    world.last_result = Some(run_async(world.service.move_task(request)).map(drop));
    Ok(())
}

#[when(r#"task "{title}" is deleted"#)]
fn task_is_deleted(world: &mut BoardWorld, title: String) {
    let id = world.task_id(&title);
    world.last_result = Some(run_async(world.service.delete_task(id)));
}

#[when(r#"the tasks are reordered as "{assignments}""#)]
fn tasks_are_reordered(world: &mut BoardWorld, assignments: String) -> Result<(), eyre::Report> {
    let mut request = ReorderTasksRequest::new();
    for entry in entries(&assignments) {
        let (title, position) = entry
            .split_once('=')
            .ok_or_else(|| eyre::eyre!("expected title=position, got {entry}"))?;
        request = request.with_item(world.task_id(title.trim()), position.trim().parse()?);
    }
    world.last_result = Some(run_async(world.service.reorder_tasks(request)));
    Ok(())
}
