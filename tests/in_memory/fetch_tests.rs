//! Reconciling a task, then fetching it back into a fresh workspace.

use std::sync::Arc;

use camino::Utf8PathBuf;
use kanboard_sync::board::domain::TaskSpecification;
use kanboard_sync::board::services::{FetchRequest, TaskFetcher};
use kanboard_sync::config::KanboardConfig;
use rstest::rstest;

use super::helpers::{SeededBoard, Workspace, open_workspace, seeded, workspace};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploaded_attachment_downloads_unchanged(seeded: SeededBoard, workspace: Workspace) {
    let payload: Vec<u8> = (0_u8..=255).collect();
    workspace.write("out/blob.bin", &payload);
    let spec = TaskSpecification::new("OPS", "TASK-1")
        .with_title("Binary artefact")
        .with_creator("builder")
        .with_attachments(vec![Utf8PathBuf::from("out/blob.bin")]);
    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&spec, &workspace.dir)
        .await
        .expect("reconcile should succeed");

    let target = open_workspace();
    let fetched = TaskFetcher::new(Arc::clone(&seeded.board), &KanboardConfig::default())
        .fetch(
            &FetchRequest::new("OPS", "TASK-1").with_attachments(vec!["blob.bin".to_owned()]),
            &target.dir,
        )
        .await
        .expect("fetch should succeed")
        .expect("task should exist");

    assert_eq!(fetched.task().id(), outcome.task_id());
    assert_eq!(fetched.task().title(), "Binary artefact");
    assert_eq!(fetched.creator_name(), Some("builder"));
    let path = fetched.files().first().expect("one file downloaded");
    assert_eq!(target.dir.read(path).expect("downloaded file"), payload);
}
