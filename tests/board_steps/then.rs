//! Then steps for board BDD scenarios.

use super::world::{BoardWorld, column, entries, run_async};
use crate::test_helpers::lane;
use rstest_bdd_macros::then;
use taskboard::board::services::ErrorKind;

#[then(r#"the "{name}" column reads "{titles}""#)]
fn column_reads(world: &BoardWorld, name: String, titles: String) -> Result<(), eyre::Report> {
    let actual = run_async(lane(&world.service, column(&name)?))?;
    let expected: Vec<String> = entries(&titles)
        .zip(0_u32..)
        .map(|(title, position)| format!("{title}@{position}"))
        .collect();

    if actual != expected {
        return Err(eyre::eyre!(
            "expected {name} column {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then("every column is dense")]
fn every_column_is_dense(world: &BoardWorld) -> Result<(), eyre::Report> {
    let violations = run_async(world.service.audit_density())?;
    if let Some(violation) = violations.first() {
        return Err(eyre::eyre!("density broken: {violation}"));
    }
    Ok(())
}

fn expect_failure(world: &BoardWorld, expected: ErrorKind) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result in scenario world"))?;
    match result {
        Err(err) if err.kind() == expected => Ok(()),
        other => Err(eyre::eyre!("expected {expected:?} failure, got {other:?}")),
    }
}

#[then("the last operation fails with not found")]
fn fails_with_not_found(world: &BoardWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::NotFound)
}

#[then("the last operation fails with a validation error")]
fn fails_with_validation(world: &BoardWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::Validation)
}
