//! Given steps for board synchronisation scenarios.

use super::world::{SyncWorld, run_async};
use eyre::WrapErr;
use kanboard_sync::board::domain::{LinkType, Watermark};
use kanboard_sync::board::ports::WatermarkStore;
use rstest_bdd_macros::given;

#[given(r#"a board project "{identifier}" with {count:u32} columns"#)]
fn board_project(world: &mut SyncWorld, identifier: String, count: u32) {
    let titles: Vec<String> = (1..=count).map(|rank| format!("Column {rank}")).collect();
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let project_id = world.board.add_project(&identifier, &title_refs);
    world.project = Some((identifier, project_id));
}

#[given(r#"a task "{reference}" in column {rank:u32}"#)]
fn task_in_column(
    world: &mut SyncWorld,
    reference: String,
    rank: u32,
) -> Result<(), eyre::Report> {
    let (_, project_id) = world.project()?;
    let task_id = world.board.add_task(project_id, &reference, rank);
    world.tasks.insert(reference, task_id);
    Ok(())
}

#[given(r#"a task "{reference}" changed at {timestamp:i32}"#)]
fn task_changed_at(
    world: &mut SyncWorld,
    reference: String,
    timestamp: i32,
) -> Result<(), eyre::Report> {
    let (_, project_id) = world.project()?;
    let task_id = world.board.add_task(project_id, &reference, 1);
    world.board.set_task_timestamp(task_id, timestamp);
    world.tasks.insert(reference, task_id);
    Ok(())
}

#[given(r#"the task "{reference}" has a remote file "{name}""#)]
fn remote_file(world: &mut SyncWorld, reference: String, name: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&reference)?;
    let _file_id = world.board.add_file(task_id, &name, b"stale");
    Ok(())
}

#[given(r#"the task "{reference}" links to "{url}""#)]
fn existing_link(world: &mut SyncWorld, reference: String, url: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&reference)?;
    let _link_id = world.board.add_link(task_id, &url, LinkType::Weblink, &url);
    Ok(())
}

#[given(r#"the workspace file "{path}" contains "{content}""#)]
fn workspace_file(world: &mut SyncWorld, path: String, content: String) -> Result<(), eyre::Report> {
    world
        .workspace
        .write(&path, content.as_bytes())
        .wrap_err("write workspace file")
}

#[given("a stored watermark of {timestamp:i32}")]
fn stored_watermark(world: &mut SyncWorld, timestamp: i32) -> Result<(), eyre::Report> {
    run_async(world.store.save(Watermark::new(timestamp))).wrap_err("seed watermark")
}
