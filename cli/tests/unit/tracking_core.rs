//! Behaviour of the tracking core through the public `Session` API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use droplet_shell::application::services::session::Session;
use droplet_shell::domain::{ApiResponse, CollectionKey, ShellError, Size, validate};

use crate::mocks::{FakeCloud, FixedAnswer, RecordingView, SilentReporter, event};

fn session(cloud: FakeCloud) -> Session<FakeCloud> {
    Session::new(Arc::new(cloud), Arc::new(SilentReporter), Duration::ZERO)
}

fn with_sizes() -> FakeCloud {
    FakeCloud {
        sizes: vec![
            Size {
                id: 66,
                name: "512MB".to_string(),
            },
            Size {
                id: 63,
                name: "1GB".to_string(),
            },
        ],
        ..FakeCloud::new()
    }
}

// ── Collection Cache ─────────────────────────────────────────────────────────

#[test]
fn cache_returns_same_sequence_until_forced() {
    let mut s = session(with_sizes());
    let first = s.get(CollectionKey::Sizes, false).unwrap();
    let second = s.get(CollectionKey::Sizes, false).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(s.api().count("list_sizes"), 1);
}

#[test]
fn forced_get_always_fetches() {
    let mut s = session(with_sizes());
    let first = s.get(CollectionKey::Sizes, true).unwrap();
    let second = s.get(CollectionKey::Sizes, true).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(s.api().count("list_sizes"), 2);
}

// ── Response Validator ───────────────────────────────────────────────────────

#[test]
fn validator_extracts_field_from_ok_response() {
    let response = ApiResponse::ok("event_id", json!(42));
    let id: u64 = validate(&response, "event_id").unwrap();
    assert_eq!(id, 42);
}

#[test]
fn validator_turns_error_status_into_operation_failed() {
    let response = ApiResponse::error("quota exceeded");
    let err = validate::<u64>(&response, "event_id").unwrap_err();
    assert_eq!(err, ShellError::OperationFailed("quota exceeded".to_string()));
}

// ── Selector ─────────────────────────────────────────────────────────────────

#[test]
fn select_on_empty_snapshots_fails_with_empty_list() {
    let mut s = session(FakeCloud::new());
    let view = RecordingView::default();
    let err = s
        .select(CollectionKey::Snapshots, &view, &FixedAnswer(""))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShellError>(),
        Some(&ShellError::EmptyList(CollectionKey::Snapshots))
    );
}

#[test]
fn select_defaults_to_first_record() {
    let mut s = session(with_sizes());
    let view = RecordingView::default();
    let id = s.select(CollectionKey::Sizes, &view, &FixedAnswer("")).unwrap();
    assert_eq!(id, 66);
    assert_eq!(
        *view.shown.lock().unwrap(),
        vec![(CollectionKey::Sizes, 2)]
    );
}

#[test]
fn select_rejects_index_past_the_end() {
    let mut s = session(with_sizes());
    let view = RecordingView::default();
    let err = s
        .select(CollectionKey::Sizes, &view, &FixedAnswer("3"))
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShellError>(),
        Some(&ShellError::IndexOutOfRange { index: 3, len: 2 })
    );
}

// ── Watchers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_watcher_completes_on_third_poll() {
    let cloud = FakeCloud::new();
    cloud.events.lock().unwrap().extend([
        event(5, "in-progress", 10),
        event(5, "in-progress", 50),
        event(5, "done", 100),
    ]);
    let s = session(cloud);
    let outcome = s.watch(5).wait().await.unwrap();
    assert_eq!(outcome.polls, 3);
    assert_eq!(s.api().count("find_event(5)"), 3);
}

#[tokio::test]
async fn lock_watcher_completes_on_third_poll() {
    let cloud = FakeCloud::new();
    cloud.locks.lock().unwrap().extend([true, true, false]);
    let s = session(cloud);
    let outcome = s.wait_until_unlocked(9).wait().await.unwrap();
    assert_eq!(outcome.polls, 3);
    assert_eq!(s.api().count("find_droplet(9)"), 3);
}

// ── Workflow Orchestrator ────────────────────────────────────────────────────

fn mutations(cloud: &FakeCloud) -> Vec<String> {
    cloud
        .calls()
        .into_iter()
        .filter(|c| !c.starts_with("find_"))
        .collect()
}

#[tokio::test]
async fn composite_issues_calls_in_order() {
    let s = session(FakeCloud::new());
    let report = s.run_composite(7, "retired").await.unwrap();
    assert_eq!(
        mutations(s.api()),
        vec![
            "power_off(7)",
            "snapshot(7,retired)",
            "power_off(7)",
            "destroy(7)",
        ]
    );
    assert_eq!(report.steps.len(), 6);
}

#[tokio::test]
async fn composite_waits_for_each_step_before_the_next_call() {
    let s = session(FakeCloud::new());
    s.run_composite(7, "retired").await.unwrap();
    let calls = s.api().calls();
    let position = |call: &str| calls.iter().position(|c| c == call).unwrap();

    // Each mutating call is preceded by the previous step's completed poll.
    let snapshot = position("snapshot(7,retired)");
    assert!(calls[..snapshot].iter().any(|c| c == "find_event(1000)"));
    let destroy = position("destroy(7)");
    assert!(calls[..destroy].iter().any(|c| c.starts_with("find_droplet(7)")));
    assert!(calls[..destroy].iter().any(|c| c == "find_event(1002)"));
}

#[tokio::test]
async fn composite_aborts_when_snapshot_is_rejected() {
    let cloud = FakeCloud {
        failing_call: Some(("snapshot", "droplet is locked")),
        ..FakeCloud::new()
    };
    let s = session(cloud);
    let err = s.run_composite(7, "retired").await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShellError>(),
        Some(&ShellError::OperationFailed("droplet is locked".to_string()))
    );
    assert_eq!(
        mutations(s.api()),
        vec!["power_off(7)", "snapshot(7,retired)"]
    );
}
