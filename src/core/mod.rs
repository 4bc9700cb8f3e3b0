//! Filesystem-facing core of the browser: directory enumeration, the lazily
//! populated folder tree, background scans and the content table model.
//!
//! Nothing in here knows about windows or web views. The `app` module owns the
//! event loop and feeds these types from the UI thread.

pub mod content;
pub mod enumerator;
pub mod error;
pub mod scanner;
pub mod tree;

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::file_detection::{is_hidden, type_label};

/// One file-system object shown in the content table.
///
/// Entries are rebuilt on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub is_directory: bool,
    pub is_hidden: bool,
    pub type_label: String,
}

impl DirectoryEntry {
    /// Reads the metadata of `path` and builds an entry for it.
    ///
    /// Symlinks are followed the way a file manager shows them; a dangling
    /// link falls back to the link's own metadata instead of failing.
    pub fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let metadata = fs::metadata(&path).or_else(|_| fs::symlink_metadata(&path))?;
        let name = display_name(&path);
        let is_directory = metadata.is_dir();

        Ok(Self {
            size: if is_directory { 0 } else { metadata.len() },
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            is_hidden: is_hidden(&path),
            type_label: type_label(&path, is_directory),
            is_directory,
            name,
            path,
        })
    }
}

/// A subdirectory discovered by an enumeration pass, together with the
/// one-level lookahead that decides whether the tree shows it as expandable.
///
/// The lookahead touches the filesystem, so it is computed on the worker that
/// produced the listing and never on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdirectoryListing {
    pub name: String,
    pub path: PathBuf,
    pub has_subdirectories: bool,
}

/// Returns the label used for a path in the tree and in the table.
///
/// Filesystem roots have no file name, so they are shown as their full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub use content::{ContentTable, SortColumn, SortOrder, SortSpec};
pub use enumerator::{DirectoryEnumerator, FsEnumerator};
pub use error::CoreError;
pub use scanner::{DirectoryScanner, ScanRequest, ScanResult};
pub use tree::{DirectoryNode, DirectoryTree, ExpansionListing, NodeId, NodeState, ScanAttachment};
