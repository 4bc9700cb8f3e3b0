//! Integration tests for the dirpane controller.
//!
//! The tests play the role of the event loop: worker results arrive on a
//! tokio MPSC channel and are fed back into the `Controller`, exactly as
//! `tao` would deliver them on the UI thread.

use dirpane::app::events::{UiCommand, UserEvent};
use dirpane::app::proxy::EventProxy;
use dirpane::app::view_model::{TreeNodeView, UiState};
use dirpane::app::{handle_ipc_message, Controller};
use dirpane::config::AppConfig;
use dirpane::core::{DirectoryEnumerator, FsEnumerator, NodeId};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Contains the test infrastructure.
mod helpers {
    use super::*;
    use std::fs;

    /// A test double for the `EventLoopProxy` using a tokio MPSC channel.
    #[derive(Clone)]
    pub struct TestEventProxy {
        pub sender: mpsc::UnboundedSender<UserEvent>,
    }

    impl EventProxy for TestEventProxy {
        fn send_event(&self, event: UserEvent) {
            if let Err(e) = self.sender.send(event) {
                panic!("Test receiver dropped: {}", e);
            }
        }
    }

    /// `TestHarness` sets up a complete, isolated environment for each test case.
    pub struct TestHarness {
        pub controller: Controller<TestEventProxy>,
        pub proxy: TestEventProxy,
        pub event_rx: mpsc::UnboundedReceiver<UserEvent>,
        pub root_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        /// Creates the fixture tree and a controller rooted at it.
        ///
        /// root/
        ///   a.txt, b.txt
        ///   docs/old/
        ///   music/
        pub fn new() -> Self {
            dirpane::utils::test_helpers::setup_test_logging();
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let root_path = temp_dir.path().to_path_buf();
            fs::write(root_path.join("a.txt"), "alpha").unwrap();
            fs::write(root_path.join("b.txt"), "beta").unwrap();
            fs::create_dir_all(root_path.join("docs/old")).unwrap();
            fs::create_dir(root_path.join("music")).unwrap();

            let (event_tx, event_rx) = mpsc::unbounded_channel();
            let proxy = TestEventProxy { sender: event_tx };
            let enumerator: Arc<dyn DirectoryEnumerator> = Arc::new(FsEnumerator::default());
            let controller = Controller::new(
                AppConfig::default(),
                &root_path,
                enumerator,
                proxy.clone(),
                tokio::runtime::Handle::current(),
            );

            Self {
                controller,
                proxy,
                event_rx,
                root_path,
                _temp_dir: temp_dir,
            }
        }

        pub fn node(&self, relative: &str) -> NodeId {
            self.controller
                .state()
                .tree
                .find_by_path(&self.root_path.join(relative))
                .expect("node not in tree")
        }

        /// Sends a raw IPC message the way the web view would.
        pub fn ipc(&self, raw: &str) {
            handle_ipc_message(raw, &self.proxy);
        }

        /// Dispatches a command directly and returns the resulting view.
        pub fn command(&mut self, command: UiCommand) -> UiState {
            self.controller
                .handle_user_event(UserEvent::Command(command))
                .expect("commands always re-render")
        }

        /// Drains events into the controller until the scan and all pending
        /// expansions have been applied, returning the last rendered view.
        pub async fn settle(&mut self) -> UiState {
            let mut last = None;
            loop {
                let state = self.controller.state();
                if !state.is_scanning && state.pending_expansions.is_empty() {
                    if let Some(ui) = last.take() {
                        return ui;
                    }
                }
                match tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv()).await {
                    Ok(Some(event)) => {
                        if let Some(ui) = self.controller.handle_user_event(event) {
                            last = Some(ui);
                        }
                    }
                    _ => panic!("Controller did not settle within timeout or channel closed"),
                }
            }
        }
    }

    pub fn child<'a>(view: &'a TreeNodeView, name: &str) -> &'a TreeNodeView {
        view.children
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("{name} not rendered"))
    }
}

#[tokio::test]
async fn test_initial_tree_has_placeholders_only_where_needed() {
    let mut harness = helpers::TestHarness::new();

    let ui = harness.command(UiCommand::Ready);

    let names: Vec<_> = ui.tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "music"]);
    assert!(helpers::child(&ui.tree, "docs").expandable);
    assert!(!helpers::child(&ui.tree, "music").expandable);
    assert!(ui.content.rows.is_empty());
    assert_eq!(ui.status_message, "Ready.");
}

#[tokio::test]
async fn test_selecting_docs_attaches_old_and_lists_it() {
    let mut harness = helpers::TestHarness::new();
    let docs = harness.node("docs");

    let ui = harness.command(UiCommand::Select(docs));
    assert!(ui.is_scanning);
    assert_eq!(ui.selected, Some(docs));

    let ui = harness.settle().await;
    let rows: Vec<_> = ui.content.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rows, vec!["old"]);
    assert_eq!(ui.content.rows[0].type_label, "Folder");
    assert_eq!(ui.content.directory, Some(harness.root_path.join("docs")));

    let state = harness.controller.state();
    assert_eq!(state.tree.children(docs).len(), 1);
    assert_eq!(state.tree.placeholder_count(docs), 0);

    let ui = harness.command(UiCommand::Collapse(docs));
    assert!(helpers::child(&ui.tree, "docs").expandable);
}

#[tokio::test]
async fn test_ipc_round_trip_expand_then_select() {
    let mut harness = helpers::TestHarness::new();
    let docs = harness.node("docs");
    let docs_id = serde_json::to_value(docs).unwrap();

    harness.ipc(&format!(
        r#"{{"command":"expand","payload":{{"id":{docs_id}}}}}"#
    ));
    let ui = harness.settle().await;
    let docs_view = helpers::child(&ui.tree, "docs");
    assert!(docs_view.is_expanded);
    assert!(!docs_view.is_loading);
    assert_eq!(docs_view.children.len(), 1);
    assert_eq!(docs_view.children[0].name, "old");

    harness.ipc(r#"{"command":"select","payload":{"id":0}}"#);
    let ui = harness.settle().await;
    let rows: Vec<_> = ui.content.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rows, vec!["a.txt", "b.txt", "docs", "music"]);
    assert_eq!(harness.controller.state().tree.children(docs).len(), 1);
}

#[tokio::test]
async fn test_malformed_ipc_is_ignored() {
    let mut harness = helpers::TestHarness::new();

    harness.ipc("not json");
    harness.ipc(r#"{"command":"format_disk","payload":{}}"#);
    harness.ipc(r#"{"command":"select","payload":{"id":"docs"}}"#);

    let nothing = tokio::time::timeout(Duration::from_millis(200), harness.event_rx.recv()).await;
    assert!(nothing.is_err(), "no event should have been forwarded");
}

#[tokio::test]
async fn test_sort_via_ipc_reorders_rows() {
    let mut harness = helpers::TestHarness::new();
    let root = harness.controller.state().tree.root();

    harness.command(UiCommand::Select(root));
    harness.settle().await;

    harness.ipc(r#"{"command":"sort","payload":{"column":"size"}}"#);
    harness.ipc(r#"{"command":"sort","payload":{"column":"size"}}"#);
    let mut last = None;
    for _ in 0..2 {
        let event = harness.event_rx.recv().await.expect("command forwarded");
        last = harness.controller.handle_user_event(event);
    }

    let ui = last.expect("sort re-renders");
    let rows: Vec<_> = ui.content.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rows, vec!["a.txt", "b.txt", "docs", "music"]);
    assert_eq!(
        serde_json::to_value(ui.content.sort).unwrap(),
        serde_json::json!({ "column": "size", "order": "descending" })
    );
}

#[tokio::test]
async fn test_directory_deleted_after_tree_construction() {
    let mut harness = helpers::TestHarness::new();
    let docs = harness.node("docs");
    std::fs::remove_dir_all(harness.root_path.join("docs")).unwrap();

    harness.command(UiCommand::Select(docs));
    let ui = harness.settle().await;

    assert!(ui.content.rows.is_empty());
    assert!(ui.status_message.starts_with("Could not read"));
    assert!(!ui.is_scanning);
}

#[tokio::test]
async fn test_refresh_picks_up_new_files() {
    let mut harness = helpers::TestHarness::new();
    let music = harness.node("music");

    harness.command(UiCommand::Select(music));
    let ui = harness.settle().await;
    assert!(ui.content.rows.is_empty());

    std::fs::write(harness.root_path.join("music/track.mp3"), "id3").unwrap();
    harness.command(UiCommand::Refresh);
    let ui = harness.settle().await;

    assert_eq!(ui.content.rows.len(), 1);
    assert_eq!(ui.content.rows[0].type_label, "MP3 Audio");
    assert_eq!(ui.content.rows[0].size_display, "3 B");
}
