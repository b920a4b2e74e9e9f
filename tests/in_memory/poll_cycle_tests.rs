//! Polling across several cycles with a persisted watermark.

use std::sync::Arc;

use kanboard_sync::board::adapters::memory::{InMemoryBoard, InMemoryWatermarkStore};
use kanboard_sync::board::domain::{TaskSpecification, Watermark};
use kanboard_sync::board::ports::WatermarkStore;
use kanboard_sync::board::services::{PollQuery, QueryPoller};
use kanboard_sync::config::KanboardConfig;
use rstest::rstest;

use super::helpers::{SeededBoard, Workspace, seeded, workspace};

fn poller(
    seeded: &SeededBoard,
    store: &Arc<InMemoryWatermarkStore>,
) -> QueryPoller<InMemoryBoard, InMemoryWatermarkStore> {
    QueryPoller::new(
        Arc::clone(&seeded.board),
        &KanboardConfig::default(),
        Arc::clone(store),
        PollQuery::new("OPS", "status:open").with_reference_pattern(r"TASK-\d+"),
    )
    .expect("poller should build")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_change_triggers_once(seeded: SeededBoard, workspace: Workspace) {
    let store = Arc::new(InMemoryWatermarkStore::new());
    let poller = poller(&seeded, &store);
    let first_task = seeded.task("TASK-1");
    seeded.board.set_task_timestamp(first_task, 100);
    let second_task = seeded.task("TASK-2");
    seeded.board.set_task_timestamp(second_task, 200);

    let first = poller.poll().await.expect("first cycle");
    let second = poller.poll().await.expect("second cycle");

    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
    assert_eq!(
        store.load().await.expect("watermark readable"),
        Some(Watermark::new(200))
    );

    seeded.board.set_clock(300);
    seeded
        .reconciler(&KanboardConfig::default())
        .reconcile(
            &TaskSpecification::new("OPS", "TASK-1").with_column("+1"),
            &workspace.dir,
        )
        .await
        .expect("move should succeed");
    let third = poller.poll().await.expect("third cycle");

    let references: Vec<_> = third.iter().map(|event| event.reference()).collect();
    assert_eq!(references, ["TASK-1"]);
    assert_eq!(
        third.first().map(|event| event.parameters()),
        Some(vec![("KANBOARD_TASKREF".to_owned(), "TASK-1".to_owned())])
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_matching_references_never_trigger(seeded: SeededBoard) {
    let store = Arc::new(InMemoryWatermarkStore::with_watermark(Watermark::new(10)));
    let excluded = seeded.task("XTASK-12");
    seeded.board.set_task_timestamp(excluded, 500);

    let events = poller(&seeded, &store).poll().await.expect("cycle");

    assert!(events.is_empty());
    assert_eq!(
        store.load().await.expect("watermark readable"),
        Some(Watermark::new(500))
    );
}
