//! External links, comments and subtasks through the reconciler.

use kanboard_sync::board::domain::{LinkType, TaskSpecification};
use kanboard_sync::config::KanboardConfig;
use rstest::rstest;
use serde_json::json;

use super::helpers::{SeededBoard, Workspace, seeded, workspace};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn known_link_url_is_not_recreated(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-1");
    let _link = seeded
        .board
        .add_link(task_id, "https://ci.example/1", LinkType::Weblink, "Build");
    let spec = TaskSpecification::new("OPS", "TASK-1")
        .with_external_links(vec!["https://ci.example/1|file|Other title".to_owned()]);

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert!(outcome.linked().is_empty());
    assert!(seeded.board.calls_to("createExternalTaskLink").is_empty());
    assert_eq!(seeded.board.links(task_id).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_links_are_related_and_attributed(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-2");
    let spec = TaskSpecification::new("OPS", "TASK-2")
        .with_creator("builder")
        .with_external_links(vec![
            "https://ci.example/2|file|Build log".to_owned(),
            "https://docs.example|unknown".to_owned(),
        ]);

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(
        outcome.linked(),
        ["https://ci.example/2", "https://docs.example"]
    );
    assert_eq!(
        seeded.board.calls_to("createExternalTaskLink"),
        [
            json!({
                "task_id": task_id.value(),
                "url": "https://ci.example/2",
                "dependency": "related",
                "type": "file",
                "title": "Build log",
                "creator_id": seeded.builder.value(),
            }),
            json!({
                "task_id": task_id.value(),
                "url": "https://docs.example",
                "dependency": "related",
                "type": "weblink",
                "creator_id": seeded.builder.value(),
            }),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_descriptors_create_one_link(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-3");
    let spec = TaskSpecification::new("OPS", "TASK-3").with_external_links(vec![
        "https://ci.example/3".to_owned(),
        "https://ci.example/3|auto".to_owned(),
    ]);

    seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(seeded.board.links(task_id).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_appended_by_the_creator(seeded: SeededBoard, workspace: Workspace) {
    let spec = TaskSpecification::new("OPS", "TASK-4")
        .with_creator("builder")
        .with_comment("Build #12 passed");
    let reconciler = seeded.reconciler(&KanboardConfig::default());

    let first = reconciler
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("first run should succeed");
    let second = reconciler
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("second run should succeed");

    assert!(first.comment_id().is_some());
    assert_ne!(first.comment_id(), second.comment_id());
    assert_eq!(
        seeded.board.comments(first.task_id()),
        ["Build #12 passed", "Build #12 passed"]
    );
    assert_eq!(
        seeded.board.comment_authors(first.task_id()),
        [Some(seeded.builder), Some(seeded.builder)]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subtask_is_created_once_for_the_owner(seeded: SeededBoard, workspace: Workspace) {
    let spec = TaskSpecification::new("OPS", "TASK-5")
        .with_owner("builder")
        .with_subtask("Verify deployment");
    let reconciler = seeded.reconciler(&KanboardConfig::default());

    let first = reconciler
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("first run should succeed");
    let second = reconciler
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("second run should succeed");

    assert!(first.subtask_created());
    assert!(!second.subtask_created());
    let subtasks = seeded.board.subtasks(first.task_id());
    assert_eq!(subtasks.len(), 1);
    assert!(
        subtasks
            .iter()
            .all(|subtask| subtask.matches("Verify deployment", Some(seeded.builder)))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subtask_for_another_assignee_is_distinct(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-6");
    seeded.board.set_task_owner(task_id, Some(seeded.builder));
    let _unassigned = seeded.board.add_subtask(task_id, "Verify deployment", None);
    let spec = TaskSpecification::new("OPS", "TASK-6")
        .with_owner("builder")
        .with_subtask("Verify deployment");

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert!(outcome.subtask_created());
    assert_eq!(seeded.board.subtasks(task_id).len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subtask_is_keyed_on_the_owner_before_reassignment(
    seeded: SeededBoard,
    workspace: Workspace,
) {
    let alice = seeded.board.add_user("alice");
    let task_id = seeded.task("TASK-8");
    seeded.board.set_task_owner(task_id, Some(alice));
    let _existing = seeded.board.add_subtask(task_id, "Verify deployment", Some(alice));
    let spec = TaskSpecification::new("OPS", "TASK-8")
        .with_owner("builder")
        .with_subtask("Verify deployment");

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert!(outcome.owner_updated());
    assert!(!outcome.subtask_created());
    assert!(seeded.board.calls_to("createSubtask").is_empty());
    let task = seeded.board.task(task_id).expect("task exists");
    assert_eq!(task.owner_id(), Some(seeded.builder));
}
