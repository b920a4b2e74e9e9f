//! When steps for board synchronisation scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use super::world::{SyncWorld, run_async};
use eyre::WrapErr;
use kanboard_sync::board::domain::TaskSpecification;
use kanboard_sync::board::services::{PollQuery, QueryPoller};
use kanboard_sync::config::KanboardConfig;
use rstest_bdd_macros::when;

fn spec_for(world: &SyncWorld, reference: &str) -> Result<TaskSpecification, eyre::Report> {
    let (identifier, _) = world.project()?;
    Ok(TaskSpecification::new(identifier, reference))
}

#[when(r#"the task "{reference}" is reconciled with column "{column}""#)]
fn reconcile_with_column(
    world: &mut SyncWorld,
    reference: String,
    column: String,
) -> Result<(), eyre::Report> {
    let spec = spec_for(world, &reference)?.with_column(column);
    world.reconcile(&spec);
    Ok(())
}

#[when(r#"the task "{reference}" is reconciled with attachment "{path}""#)]
fn reconcile_with_attachment(
    world: &mut SyncWorld,
    reference: String,
    path: String,
) -> Result<(), eyre::Report> {
    let spec = spec_for(world, &reference)?.with_attachments(vec![Utf8PathBuf::from(path)]);
    world.board.clear_calls();
    world.reconcile(&spec);
    Ok(())
}

#[when(r#"the task "{reference}" is reconciled with link "{url}""#)]
fn reconcile_with_link(
    world: &mut SyncWorld,
    reference: String,
    url: String,
) -> Result<(), eyre::Report> {
    let spec = spec_for(world, &reference)?.with_external_links(vec![url]);
    world.reconcile(&spec);
    Ok(())
}

fn poll(world: &mut SyncWorld, query: PollQuery) -> Result<(), eyre::Report> {
    let poller = QueryPoller::new(
        Arc::clone(&world.board),
        &KanboardConfig::default(),
        Arc::clone(&world.store),
        query,
    )
    .wrap_err("build poller")?;
    world.last_events = Some(run_async(poller.poll()).wrap_err("poll cycle")?);
    Ok(())
}

#[when("the board is polled")]
fn board_polled(world: &mut SyncWorld) -> Result<(), eyre::Report> {
    let (identifier, _) = world.project()?;
    poll(world, PollQuery::new(identifier, "status:open"))
}

#[when(r#"the board is polled for references matching "{pattern}""#)]
fn board_polled_with_pattern(world: &mut SyncWorld, pattern: String) -> Result<(), eyre::Report> {
    let (identifier, _) = world.project()?;
    poll(
        world,
        PollQuery::new(identifier, "status:open").with_reference_pattern(pattern),
    )
}
