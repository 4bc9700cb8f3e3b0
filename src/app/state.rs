//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::{ContentTable, DirectoryTree, NodeId};
use std::collections::HashSet;
use tokio::task::JoinHandle;

/// Holds the complete, mutable state of the application.
///
/// Owned by the event-loop closure and only ever touched on the UI thread.
/// Workers never see it; they report back through `UserEvent`s.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// The folder tree shown on the left.
    pub tree: DirectoryTree,
    /// The rows of the directory shown on the right.
    pub content: ContentTable,
    /// The tree node whose contents the table shows (or is loading).
    pub selected: Option<NodeId>,
    /// Nodes the user has expanded in the tree widget.
    pub expanded: HashSet<NodeId>,
    /// Nodes whose expansion listing is still running on a worker.
    pub pending_expansions: HashSet<NodeId>,
    /// Ticket of the latest selection. Scan results with an older ticket
    /// are stale and must not replace the table.
    pub selection_ticket: u64,
    /// `true` while the scan for the latest selection is running.
    pub is_scanning: bool,
    /// A handle to the currently running scan task, allowing it to be aborted.
    pub scan_task: Option<JoinHandle<()>>,
    /// One-line status shown under the table.
    pub status_message: String,
}

impl AppState {
    pub fn new(config: AppConfig, tree: DirectoryTree) -> Self {
        let content = ContentTable::new(config.default_sort);
        let mut expanded = HashSet::new();
        expanded.insert(tree.root());

        Self {
            config,
            tree,
            content,
            selected: None,
            expanded,
            pending_expansions: HashSet::new(),
            selection_ticket: 0,
            is_scanning: false,
            scan_task: None,
            status_message: "Ready.".to_string(),
        }
    }

    /// Starts a new selection and returns its ticket.
    pub fn next_ticket(&mut self) -> u64 {
        self.selection_ticket += 1;
        self.selection_ticket
    }

    /// Aborts the scan of the previous selection, if it is still running.
    pub fn cancel_current_scan(&mut self) {
        if let Some(handle) = self.scan_task.take() {
            tracing::debug!(
                "Aborting scan for ticket {} in favour of a new selection",
                self.selection_ticket
            );
            handle.abort();
        }
        self.is_scanning = false;
    }

    /// Drops references to nodes that were detached by a re-expansion.
    pub fn forget_detached(&mut self) {
        let tree = &self.tree;
        self.expanded.retain(|id| tree.contains(*id));
        self.pending_expansions.retain(|id| tree.contains(*id));
        if self.selected.is_some_and(|id| !tree.contains(id)) {
            tracing::debug!("Selected node was detached; clearing selection");
            self.selected = None;
        }
    }
}
