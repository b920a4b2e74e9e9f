//! Attachment synchronisation through the reconciler.

use camino::Utf8PathBuf;
use kanboard_sync::board::domain::TaskSpecification;
use kanboard_sync::board::services::SyncWarning;
use kanboard_sync::config::KanboardConfig;
use rstest::rstest;
use serde_json::json;

use super::helpers::{SeededBoard, Workspace, seeded, workspace};

fn attach(reference: &str, paths: &[&str]) -> TaskSpecification {
    TaskSpecification::new("OPS", reference)
        .with_creator("builder")
        .with_attachments(paths.iter().map(|path| Utf8PathBuf::from(*path)))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_name_file_is_removed_then_uploaded(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-1");
    let _stale = seeded.board.add_file(task_id, "report.pdf", b"stale");
    workspace.write("build/report.pdf", b"fresh");
    seeded.board.clear_calls();

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&attach("TASK-1", &["build/report.pdf"]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(outcome.uploaded(), ["report.pdf"]);
    assert_eq!(
        seeded.board.file_content(task_id, "report.pdf"),
        Some(b"fresh".to_vec())
    );
    assert_eq!(seeded.board.files(task_id).len(), 1);
    let names = seeded.board.call_names();
    let position = |method: &str| names.iter().position(|name| name == method);
    assert!(position("getAllTaskFiles") < position("removeTaskFile"));
    assert!(position("removeTaskFile") < position("createTaskFile"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upload_carries_project_and_creator(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-2");
    workspace.write("notes.txt", b"hi");

    seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&attach("TASK-2", &["notes.txt"]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(
        seeded.board.calls_to("createTaskFile"),
        [json!({
            "project_id": seeded.project_id.value(),
            "task_id": task_id.value(),
            "filename": "notes.txt",
            "blob": "aGk=",
            "creator_id": seeded.builder.value(),
        })]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_file_is_skipped_with_a_warning(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-3");
    workspace.write("present.txt", b"here");

    let outcome = seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&attach("TASK-3", &["absent.txt", "present.txt"]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(
        outcome.warnings(),
        [SyncWarning::AttachmentMissing(Utf8PathBuf::from("absent.txt"))]
    );
    assert_eq!(outcome.uploaded(), ["present.txt"]);
    assert_eq!(seeded.board.files(task_id).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_file_is_skipped(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-4");
    workspace.write("big.bin", &[7_u8; 10]);
    let config = KanboardConfig::default().with_attachment_max_size(4);

    let outcome = seeded
        .reconciler(&config)
        .reconcile(&attach("TASK-4", &["big.bin"]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert_eq!(
        outcome.warnings(),
        [SyncWarning::AttachmentTooLarge {
            path: Utf8PathBuf::from("big.bin"),
            size: 10,
            limit: 4,
        }]
    );
    assert!(seeded.board.files(task_id).is_empty());
    assert!(seeded.board.calls_to("createTaskFile").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn zero_limit_disables_the_size_check(seeded: SeededBoard, workspace: Workspace) {
    let task_id = seeded.task("TASK-5");
    workspace.write("big.bin", &[1_u8; 64]);
    let config = KanboardConfig::default().with_attachment_max_size(0);

    let outcome = seeded
        .reconciler(&config)
        .reconcile(&attach("TASK-5", &["big.bin"]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert!(outcome.warnings().is_empty());
    assert_eq!(
        seeded.board.file_content(task_id, "big.bin").map(|bytes| bytes.len()),
        Some(64)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_attachments_means_no_file_listing(seeded: SeededBoard, workspace: Workspace) {
    let _task_id = seeded.task("TASK-6");

    seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(&attach("TASK-6", &[]), &workspace.dir)
        .await
        .expect("reconcile should succeed");

    assert!(seeded.board.calls_to("getAllTaskFiles").is_empty());
}
