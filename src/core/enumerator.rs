//! The directory enumerator: the only component that lists directories.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use super::error::CoreError;
use super::DirectoryEntry;
use crate::utils::file_detection::is_hidden;

/// Lists the immediate children of a directory.
///
/// Implementations must return entries in a deterministic order, return an
/// empty list for an empty but readable directory, and report a read failure
/// as an error rather than as an empty listing.
///
/// A single instance is built at startup and shared as
/// `Arc<dyn DirectoryEnumerator>` between the tree, the scanner and the
/// background workers.
pub trait DirectoryEnumerator: Send + Sync {
    /// Lists every visible entry (files and directories) of `dir`.
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, CoreError>;

    /// Lists only the subdirectories of `dir`, in the same order as [`list`].
    ///
    /// [`list`]: DirectoryEnumerator::list
    fn subdirectories(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, CoreError> {
        Ok(self
            .list(dir)?
            .into_iter()
            .filter(|entry| entry.is_directory)
            .collect())
    }

    /// One-level lookahead: does `dir` contain at least one subdirectory?
    ///
    /// Read failures count as "no".
    fn contains_subdirectory(&self, dir: &Path) -> bool;
}

/// The production enumerator backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsEnumerator {
    show_hidden: bool,
}

impl FsEnumerator {
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }

    fn is_visible(&self, path: &Path) -> bool {
        self.show_hidden || !is_hidden(path)
    }
}

impl DirectoryEnumerator for FsEnumerator {
    fn list(&self, dir: &Path) -> Result<Vec<DirectoryEntry>, CoreError> {
        let metadata = fs::metadata(dir).map_err(|e| CoreError::io(e, dir))?;
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(dir.to_path_buf()));
        }

        let read_dir = fs::read_dir(dir).map_err(|e| CoreError::io(e, dir))?;
        let mut entries = Vec::new();

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if !self.is_visible(&path) {
                continue;
            }

            match DirectoryEntry::from_path(path) {
                Ok(item) => entries.push(item),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", entry.path(), e);
                }
            }
        }

        entries.sort_by(|a, b| platform_order(&a.name, &b.name));
        Ok(entries)
    }

    fn contains_subdirectory(&self, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }

        match fs::read_dir(dir) {
            Ok(read_dir) => read_dir
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .any(|path| self.is_visible(&path) && path.is_dir()),
            Err(e) => {
                tracing::warn!("Cannot look inside {:?}: {}", dir, e);
                false
            }
        }
    }
}

/// Compares two file names the way the host platform's file view sorts them.
///
/// Windows file systems are case-insensitive, so names compare ignoring case
/// there; elsewhere the comparison is a plain ordinal one.
pub fn platform_order(a: &str, b: &str) -> Ordering {
    #[cfg(windows)]
    {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    }
    #[cfg(not(windows))]
    {
        a.cmp(b)
    }
}
