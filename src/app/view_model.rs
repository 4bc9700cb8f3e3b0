//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! The web view renders nothing but this structure; it never sees `AppState`.
//! Collapsed folders are sent without their children, so the payload grows
//! with what is on screen rather than with what has been loaded.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

use super::state::AppState;
use crate::core::{DirectoryEntry, NodeId, SortSpec};

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub tree: TreeNodeView,
    pub content: ContentView,
    pub selected: Option<NodeId>,
    pub is_scanning: bool,
    pub status_message: String,
    pub tree_pane_width: u32,
}

/// A serializable representation of a single node in the folder tree.
#[derive(Serialize, Clone, Debug)]
pub struct TreeNodeView {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub expandable: bool,
    pub is_expanded: bool,
    pub is_loading: bool,
    pub children: Vec<TreeNodeView>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ContentView {
    pub directory: Option<PathBuf>,
    pub sort: SortSpec,
    pub rows: Vec<RowView>,
}

#[derive(Serialize, Clone, Debug)]
pub struct RowView {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub size: u64,
    pub size_display: String,
    pub modified: String,
    pub type_label: String,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let date_format = state.config.date_format.as_str();
    let rows = state
        .content
        .rows()
        .iter()
        .map(|entry| row_view(entry, date_format))
        .collect();

    UiState {
        tree: tree_node_view(state, state.tree.root()),
        content: ContentView {
            directory: state.content.directory().map(|d| d.to_path_buf()),
            sort: state.content.sort(),
            rows,
        },
        selected: state.selected,
        is_scanning: state.is_scanning,
        status_message: state.status_message.clone(),
        tree_pane_width: state.config.tree_pane_width,
    }
}

fn tree_node_view(state: &AppState, id: NodeId) -> TreeNodeView {
    let tree = &state.tree;
    let (name, path) = tree
        .get(id)
        .map(|n| (n.name.clone(), n.path.clone()))
        .unwrap_or_default();
    let is_expanded = state.expanded.contains(&id);
    let children = if is_expanded {
        tree.children(id)
            .iter()
            .map(|child| tree_node_view(state, *child))
            .collect()
    } else {
        Vec::new()
    };

    TreeNodeView {
        id,
        name,
        path,
        expandable: tree.is_expandable(id),
        is_expanded,
        is_loading: state.pending_expansions.contains(&id),
        children,
    }
}

fn row_view(entry: &DirectoryEntry, date_format: &str) -> RowView {
    RowView {
        name: entry.name.clone(),
        path: entry.path.clone(),
        is_directory: entry.is_directory,
        size: entry.size,
        size_display: if entry.is_directory {
            String::new()
        } else {
            format_size(entry.size)
        },
        modified: entry
            .modified
            .map(|m| format_date(&m, date_format))
            .unwrap_or_default(),
        type_label: entry.type_label.clone(),
    }
}

/// Formats a timestamp for the "Modified" column. A format chrono cannot
/// render yields an empty cell.
fn format_date(time: &DateTime<Local>, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(date_format)).is_err() {
        tracing::warn!("Cannot format dates with {:?}", date_format);
        out.clear();
    }
    out
}

/// Formats a byte count for the "Size" column.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
