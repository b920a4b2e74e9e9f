//! Then steps for board synchronisation scenarios.

use super::world::{SyncWorld, run_async};
use eyre::WrapErr;
use kanboard_sync::board::ports::WatermarkStore;
use rstest_bdd_macros::then;

#[then(r#"the task "{reference}" sits in column {rank:u32}"#)]
fn task_sits_in_column(world: &SyncWorld, reference: String, rank: u32) -> Result<(), eyre::Report> {
    let (_, project_id) = world.project()?;
    let task_id = world.task_id(&reference)?;
    let task = world
        .board
        .task(task_id)
        .ok_or_else(|| eyre::eyre!("task '{reference}' missing from board"))?;
    let expected = world.board.column_at(project_id, rank);
    if Some(task.column_id()) != expected {
        return Err(eyre::eyre!(
            "expected column {expected:?} at rank {rank}, found {}",
            task.column_id()
        ));
    }
    Ok(())
}

#[then("no move was requested")]
fn no_move_requested(world: &SyncWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if outcome.moved() || !world.board.calls_to("moveTaskPosition").is_empty() {
        return Err(eyre::eyre!("expected no moveTaskPosition call"));
    }
    Ok(())
}

#[then("the reconciliation reports a move")]
fn reconciliation_moved(world: &SyncWorld) -> Result<(), eyre::Report> {
    if !world.outcome()?.moved() {
        return Err(eyre::eyre!("expected the task to be moved"));
    }
    Ok(())
}

#[then(r#"the remote file "{name}" of task "{reference}" contains "{content}""#)]
fn remote_file_contains(
    world: &SyncWorld,
    name: String,
    reference: String,
    content: String,
) -> Result<(), eyre::Report> {
    world.outcome()?;
    let task_id = world.task_id(&reference)?;
    let stored = world
        .board
        .file_content(task_id, &name)
        .ok_or_else(|| eyre::eyre!("remote file '{name}' missing"))?;
    if stored != content.as_bytes() {
        return Err(eyre::eyre!(
            "remote file '{name}' holds {:?}",
            String::from_utf8_lossy(&stored)
        ));
    }
    if world.board.files(task_id).len() != 1 {
        return Err(eyre::eyre!("expected exactly one remote file"));
    }
    Ok(())
}

#[then(r#""{first}" was called before "{second}""#)]
fn called_in_order(world: &SyncWorld, first: String, second: String) -> Result<(), eyre::Report> {
    let names = world.board.call_names();
    let first_at = names.iter().position(|name| *name == first);
    let second_at = names.iter().position(|name| *name == second);
    match (first_at, second_at) {
        (Some(before), Some(after)) if before < after => Ok(()),
        _ => Err(eyre::eyre!("expected {first} before {second} in {names:?}")),
    }
}

#[then("no link was created")]
fn no_link_created(world: &SyncWorld) -> Result<(), eyre::Report> {
    if !world.outcome()?.linked().is_empty()
        || !world.board.calls_to("createExternalTaskLink").is_empty()
    {
        return Err(eyre::eyre!("expected no createExternalTaskLink call"));
    }
    Ok(())
}

#[then(r#"only "{reference}" triggers"#)]
fn only_reference_triggers(world: &SyncWorld, reference: String) -> Result<(), eyre::Report> {
    let events = world
        .last_events
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no poll cycle has run"))?;
    let references: Vec<&str> = events.iter().map(|event| event.reference()).collect();
    if references != [reference.as_str()] {
        return Err(eyre::eyre!("expected only {reference}, got {references:?}"));
    }
    Ok(())
}

#[then("nothing triggers")]
fn nothing_triggers(world: &SyncWorld) -> Result<(), eyre::Report> {
    let events = world
        .last_events
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no poll cycle has run"))?;
    if !events.is_empty() {
        return Err(eyre::eyre!("expected no events, got {}", events.len()));
    }
    Ok(())
}

#[then("the stored watermark is {timestamp:i32}")]
fn stored_watermark_is(world: &SyncWorld, timestamp: i32) -> Result<(), eyre::Report> {
    let stored = run_async(world.store.load())
        .wrap_err("load watermark")?
        .ok_or_else(|| eyre::eyre!("no watermark stored"))?;
    if stored.value() != timestamp {
        return Err(eyre::eyre!("expected watermark {timestamp}, found {stored}"));
    }
    Ok(())
}
