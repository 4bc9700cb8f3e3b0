//! The application layer: owns the UI-side state on the event-loop thread and
//! wires IPC gestures and worker results to the core.

pub mod commands;
pub mod events;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use wry::WebView;

use crate::config::AppConfig;
use crate::core::{DirectoryEnumerator, DirectoryScanner, DirectoryTree};
use events::{IpcMessage, UiCommand, UserEvent};
use proxy::EventProxy;
use state::AppState;
use tasks::TaskSpawner;
use view_model::{generate_ui_state, UiState};

/// Parses a raw IPC message from the web view and forwards it to the event
/// loop. Runs inside the web view's callback, so it never touches state.
pub fn handle_ipc_message<P: EventProxy>(message: &str, proxy: &P) {
    let parsed = serde_json::from_str::<IpcMessage>(message)
        .map_err(|e| format!("Malformed IPC message: {e}"))
        .and_then(UiCommand::try_from);

    match parsed {
        Ok(command) => proxy.send_event(UserEvent::Command(command)),
        Err(e) => tracing::warn!("{} ({})", e, message),
    }
}

/// Owns the application state and applies every `UserEvent` to it.
///
/// Lives inside the event-loop closure; all of its methods run on the UI
/// thread.
pub struct Controller<P: EventProxy> {
    state: AppState,
    tasks: TaskSpawner<P>,
}

impl<P: EventProxy> Controller<P> {
    /// Builds the initial tree for `root` and prepares the worker spawner.
    ///
    /// The root listing is the only enumeration done synchronously, before the
    /// window is shown.
    pub fn new(
        config: AppConfig,
        root: &Path,
        enumerator: Arc<dyn DirectoryEnumerator>,
        proxy: P,
        runtime: Handle,
    ) -> Self {
        let tree = DirectoryTree::build_root(root, enumerator.as_ref());
        let tasks = TaskSpawner::new(DirectoryScanner::new(enumerator), proxy, runtime);
        Self {
            state: AppState::new(config, tree),
            tasks,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `event` and returns the view model to render, or `None` if
    /// nothing visible changed.
    pub fn handle_user_event(&mut self, event: UserEvent) -> Option<UiState> {
        let changed = match event {
            UserEvent::Command(command) => {
                self.handle_command(command);
                true
            }
            UserEvent::ScanFinished(result) => commands::apply_scan_result(&mut self.state, *result),
            UserEvent::ExpansionFinished { node, listing } => {
                commands::apply_expansion(&mut self.state, node, listing)
            }
        };

        changed.then(|| generate_ui_state(&self.state))
    }

    fn handle_command(&mut self, command: UiCommand) {
        tracing::debug!("Handling {:?}", command);
        match command {
            UiCommand::Ready => {}
            UiCommand::Select(node) => commands::select_node(&mut self.state, &self.tasks, node),
            UiCommand::Expand(node) => commands::expand_node(&mut self.state, &self.tasks, node),
            UiCommand::Collapse(node) => commands::collapse_node(&mut self.state, node),
            UiCommand::Sort(column) => commands::sort_content(&mut self.state, column),
            UiCommand::Refresh => commands::refresh(&mut self.state, &self.tasks),
        }
    }
}

/// Pushes a view model into the web view by calling `window.render`.
pub fn render_ui_state(webview: &WebView, ui_state: &UiState) {
    let json = match serde_json::to_string(ui_state) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize UI state: {}", e);
            return;
        }
    };

    if let Err(e) = webview.evaluate_script(&format!("window.render({json});")) {
        tracing::error!("Failed to push UI state to the web view: {}", e);
    }
}
