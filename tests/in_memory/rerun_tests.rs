//! Reconciling an unchanged specification a second time.

use camino::Utf8PathBuf;
use kanboard_sync::board::domain::TaskSpecification;
use kanboard_sync::config::KanboardConfig;
use rstest::rstest;

use super::helpers::{SeededBoard, Workspace, seeded, workspace};

fn full_spec() -> TaskSpecification {
    TaskSpecification::new("OPS", "REL-7")
        .with_title("Release 7")
        .with_description("Tracks the release build")
        .with_column("3")
        .with_swimlane("2")
        .with_color("green")
        .with_creator("builder")
        .with_owner("builder")
        .with_tags("release,+qa,-draft")
        .with_external_links(vec!["https://ci.example/rel-7|weblink|Pipeline".to_owned()])
        .with_attachments(vec![Utf8PathBuf::from("dist/notes.md")])
        .with_subtask("Sign off")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_run_only_reuploads_attachments(seeded: SeededBoard, workspace: Workspace) {
    workspace.write("dist/notes.md", b"# Release 7");
    let reconciler = seeded.reconciler(&KanboardConfig::default());

    let first = reconciler
        .reconcile(&full_spec(), &workspace.dir)
        .await
        .expect("first run should succeed");
    seeded.board.clear_calls();
    let second = reconciler
        .reconcile(&full_spec(), &workspace.dir)
        .await
        .expect("second run should succeed");

    assert!(first.created());
    assert!(!second.created());
    assert_eq!(first.task_id(), second.task_id());
    assert!(!second.owner_updated());
    assert!(!second.tags_updated());
    assert!(!second.moved());
    assert!(second.linked().is_empty());
    assert!(!second.subtask_created());
    assert_eq!(second.uploaded(), ["notes.md"]);

    let mutations: Vec<String> = seeded
        .board
        .call_names()
        .into_iter()
        .filter(|name| !name.starts_with("get"))
        .collect();
    assert_eq!(mutations, ["removeTaskFile", "createTaskFile"]);
    assert_eq!(seeded.board.task_count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_reflects_the_specification(seeded: SeededBoard, workspace: Workspace) {
    workspace.write("dist/notes.md", b"# Release 7");

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&full_spec(), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    let task = seeded.board.task(outcome.task_id()).expect("task exists");
    assert_eq!(task.title(), "Release 7");
    assert_eq!(
        Some(task.column_id()),
        seeded.board.column_at(seeded.project_id, 3)
    );
    assert_eq!(task.swimlane_id().map(|id| id.value()), Some(2));
    assert_eq!(task.owner_id(), Some(seeded.builder));
    assert_eq!(
        task.tags().iter().map(String::as_str).collect::<Vec<_>>(),
        ["qa", "release"]
    );
    assert_eq!(seeded.board.files(outcome.task_id()).len(), 1);
    assert_eq!(seeded.board.links(outcome.task_id()).len(), 1);
    assert_eq!(seeded.board.subtasks(outcome.task_id()).len(), 1);
}
