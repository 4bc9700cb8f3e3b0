//! Handlers for UI commands and for results coming back from workers.
//!
//! All functions here run on the UI thread and are the only code that
//! mutates `AppState`.

use super::proxy::EventProxy;
use super::state::AppState;
use super::tasks::TaskSpawner;
use crate::core::{ExpansionListing, NodeId, ScanAttachment, ScanRequest, ScanResult, SortColumn};

/// Starts a background scan of the directory behind `node`.
///
/// Returns immediately. Any scan still running for an earlier selection is
/// aborted, and its result would be dropped as stale if it arrived anyway.
pub fn select_node<P: EventProxy>(state: &mut AppState, tasks: &TaskSpawner<P>, node: NodeId) {
    let Some(target) = state.tree.get(node) else {
        tracing::warn!("Ignoring selection of unknown node {:?}", node);
        return;
    };
    let directory = target.path.clone();
    let collect_subdirectories = !target.is_loaded();

    tracing::info!("Selected {}", target.name);

    state.cancel_current_scan();
    let request = ScanRequest {
        ticket: state.next_ticket(),
        node,
        directory,
        collect_subdirectories,
    };

    state.selected = Some(node);
    state.is_scanning = true;
    state.status_message = format!("Reading {}...", request.directory.display());
    state.scan_task = Some(tasks.spawn_scan(request));
}

/// Marks `node` as expanded and re-lists its subdirectories on a worker.
///
/// Every expansion re-lists, so folders created since the last visit show up.
pub fn expand_node<P: EventProxy>(state: &mut AppState, tasks: &TaskSpawner<P>, node: NodeId) {
    let Some(target) = state.tree.get(node) else {
        tracing::warn!("Ignoring expansion of unknown node {:?}", node);
        return;
    };
    let path = target.path.clone();

    state.expanded.insert(node);
    if state.pending_expansions.insert(node) {
        tasks.spawn_expansion(node, path);
    } else {
        tracing::debug!("Expansion of {:?} already in flight", path);
    }
}

pub fn collapse_node(state: &mut AppState, node: NodeId) {
    if node == state.tree.root() {
        return;
    }
    state.expanded.remove(&node);
}

pub fn sort_content(state: &mut AppState, column: SortColumn) {
    state.content.toggle_sort(column);
}

/// Scans the selected directory again; without a selection, the root.
pub fn refresh<P: EventProxy>(state: &mut AppState, tasks: &TaskSpawner<P>) {
    let node = state.selected.unwrap_or_else(|| state.tree.root());
    select_node(state, tasks, node);
}

/// Applies a finished scan. Returns `true` if anything visible changed.
///
/// The table is only replaced for the latest selection. The tree only takes
/// the scanned directories if the node still exists and has not been
/// expanded in the meantime, so a late result can never duplicate children.
/// A failed scan leaves the tree as it was.
pub fn apply_scan_result(state: &mut AppState, result: ScanResult) -> bool {
    if result.ticket != state.selection_ticket {
        tracing::debug!(
            "Dropping stale scan of {:?} (ticket {}, latest {})",
            result.directory,
            result.ticket,
            state.selection_ticket
        );
        return false;
    }

    let ScanResult {
        node,
        directory,
        entries,
        subdirectories,
        error,
        ..
    } = result;

    state.scan_task = None;
    state.is_scanning = false;

    // A failed scan never changes the tree.
    if error.is_none()
        && (!subdirectories.is_empty() || state.tree.get(node).is_some_and(|n| !n.is_loaded()))
    {
        match state.tree.apply_scan(node, &subdirectories) {
            ScanAttachment::Attached(count) => {
                tracing::debug!("Attached {} folders under {:?}", count, directory);
            }
            ScanAttachment::NodeDetached => {
                tracing::debug!("Node for {:?} was detached; tree left unchanged", directory);
            }
            ScanAttachment::AlreadyLoaded => {
                tracing::debug!("{:?} was expanded meanwhile; tree left unchanged", directory);
            }
        }
    }

    state.status_message = match &error {
        Some(e) => format!("Could not read {}: {}", directory.display(), e),
        None => format!("{} items in {}", entries.len(), directory.display()),
    };
    state.content.replace(directory, entries);
    true
}

/// Applies a finished expansion listing to the tree.
pub fn apply_expansion(state: &mut AppState, node: NodeId, listing: ExpansionListing) -> bool {
    state.pending_expansions.remove(&node);

    if !state.tree.apply_expansion(node, &listing) {
        tracing::debug!(
            "Node for {:?} was detached before its expansion finished",
            listing.path
        );
        return false;
    }
    if let Some(e) = &listing.error {
        state.status_message = format!("Could not read {}: {}", listing.path.display(), e);
    }
    state.forget_detached();
    true
}
