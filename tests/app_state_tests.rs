//! Application state tests
//!
//! Tests for the phase machine: build dispatch, result consumption, the
//! automatic clipboard copy, and state reset when returning to the list.

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use vitae::build::{BuildResult, FAILURE_MARKER, SUCCESS_MARKER};
use vitae::catalog::VariantEntry;
use vitae::config::Config;
use vitae::ui::theme::Theme;
use vitae::ui::{App, Phase, TaskMsg};

fn entry(name: &str) -> VariantEntry {
    VariantEntry {
        name: name.to_string(),
        description: "Typst resume variant • 1.0 KB".to_string(),
        size_label: "1.0 KB".to_string(),
    }
}

/// Helper to create a test app with mock entries. The compiler is pointed at
/// a name that never resolves so an accidentally spawned build fails fast.
fn create_test_app() -> (App, UnboundedReceiver<TaskMsg>) {
    let (tx, rx) = unbounded_channel();
    let config = Config {
        compiler: "vitae-test-compiler-that-does-not-exist".to_string(),
        ..Config::default()
    };
    let app = App::new(
        vec![entry("modern"), entry("classic")],
        config,
        Theme::default_theme().clone(),
        tx,
    );
    (app, rx)
}

fn success_result() -> BuildResult {
    BuildResult {
        log: format!("{} Build successful", SUCCESS_MARKER),
        succeeded: true,
        artifact_path: Some(PathBuf::from("output/Modern.pdf")),
    }
}

fn failure_result() -> BuildResult {
    BuildResult {
        log: format!("{} Build failed: exit status: 1\nmissing font", FAILURE_MARKER),
        succeeded: false,
        artifact_path: None,
    }
}

#[tokio::test]
async fn test_confirm_selection_enters_building() {
    let (mut app, _rx) = create_test_app();
    assert_eq!(app.phase, Phase::Listing);

    app.confirm_selection();
    assert_eq!(
        app.phase,
        Phase::Building {
            variant: "modern".to_string()
        }
    );
}

#[tokio::test]
async fn test_confirm_selection_outside_listing_is_ignored() {
    let (mut app, _rx) = create_test_app();
    app.phase = Phase::Completed {
        result: failure_result(),
    };

    app.confirm_selection();
    assert!(matches!(app.phase, Phase::Completed { .. }));
}

#[tokio::test]
async fn test_build_success_completes_and_copies_once() {
    let (mut app, mut rx) = create_test_app();
    app.phase = Phase::Building {
        variant: "modern".to_string(),
    };

    app.handle_task(TaskMsg::BuildFinished(success_result()));

    match &app.phase {
        Phase::Completed { result } => {
            assert!(result.succeeded);
            assert_eq!(result.artifact_path, Some(PathBuf::from("output/Modern.pdf")));
            assert!(result.log.contains(SUCCESS_MARKER));
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    // Exactly one clipboard acknowledgment arrives for the auto-copy.
    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("clipboard task should finish")
        .expect("channel open");
    assert!(matches!(msg, TaskMsg::ClipboardDone));

    let extra = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(extra.is_err(), "no second clipboard dispatch expected");
}

#[tokio::test]
async fn test_build_failure_completes_without_clipboard() {
    let (mut app, mut rx) = create_test_app();
    app.phase = Phase::Building {
        variant: "modern".to_string(),
    };

    app.handle_task(TaskMsg::BuildFinished(failure_result()));

    match &app.phase {
        Phase::Completed { result } => {
            assert!(!result.succeeded);
            assert!(result.artifact_path.is_none());
            assert!(result.log.contains(FAILURE_MARKER));
            assert!(result.log.contains("missing font"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    // No clipboard dispatch for failed builds.
    let msg = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(msg.is_err(), "no clipboard dispatch expected after a failure");
}

#[tokio::test]
async fn test_clipboard_done_is_ignored_for_state() {
    let (mut app, _rx) = create_test_app();
    app.handle_task(TaskMsg::ClipboardDone);
    assert_eq!(app.phase, Phase::Listing);

    app.phase = Phase::Building {
        variant: "modern".to_string(),
    };
    app.handle_task(TaskMsg::ClipboardDone);
    assert!(app.is_building());
}

#[tokio::test]
async fn test_back_returns_to_listing() {
    let (mut app, _rx) = create_test_app();
    app.phase = Phase::Completed {
        result: failure_result(),
    };

    app.go_back();
    assert_eq!(app.phase, Phase::Listing);
}

#[tokio::test]
async fn test_rebuild_carries_no_stale_state() {
    let (mut app, _rx) = create_test_app();

    // First build fails with a distinctive log.
    app.phase = Phase::Building {
        variant: "modern".to_string(),
    };
    app.handle_task(TaskMsg::BuildFinished(failure_result()));
    app.go_back();
    assert_eq!(app.phase, Phase::Listing);

    // Second build of the same variant sees only its own result.
    app.confirm_selection();
    assert!(app.is_building());
    app.handle_task(TaskMsg::BuildFinished(success_result()));

    match &app.phase {
        Phase::Completed { result } => {
            assert!(result.succeeded);
            assert!(!result.log.contains("missing font"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resize_never_changes_phase() {
    let (mut app, _rx) = create_test_app();

    app.handle_resize(100, 30);
    assert_eq!(app.phase, Phase::Listing);
    assert_eq!((app.width, app.height), (100, 30));

    app.phase = Phase::Building {
        variant: "modern".to_string(),
    };
    app.handle_resize(80, 24);
    assert!(app.is_building());

    app.phase = Phase::Completed {
        result: success_result(),
    };
    app.handle_resize(60, 20);
    assert!(matches!(app.phase, Phase::Completed { .. }));
    assert_eq!((app.width, app.height), (60, 20));
}

#[tokio::test]
async fn test_ticks_outside_building_are_ignored() {
    let (mut app, _rx) = create_test_app();

    for _ in 0..5 {
        app.tick();
    }
    assert_eq!(app.spinner_frame, 0);
    assert_eq!(app.phase, Phase::Listing);

    app.phase = Phase::Completed {
        result: success_result(),
    };
    app.tick();
    assert_eq!(app.spinner_frame, 0);
}
