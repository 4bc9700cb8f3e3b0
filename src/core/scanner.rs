//! Selection scans: one enumeration pass over a directory's immediate
//! contents, run off the UI thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::enumerator::DirectoryEnumerator;
use super::tree::{ExpansionListing, NodeId};
use super::{DirectoryEntry, SubdirectoryListing};

/// What a worker needs to scan the directory behind a selected tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Selection ticket; only the latest ticket may replace the table rows.
    pub ticket: u64,
    pub node: NodeId,
    pub directory: PathBuf,
    /// Set when the node had never been listed, so the scan should also
    /// gather the directories the tree will attach under it.
    pub collect_subdirectories: bool,
}

/// The outcome of one scan. Consumed once by the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub ticket: u64,
    pub node: NodeId,
    pub directory: PathBuf,
    /// Every visible entry, in platform order.
    pub entries: Vec<DirectoryEntry>,
    /// Directories to attach to the tree; empty unless requested.
    pub subdirectories: Vec<SubdirectoryListing>,
    pub error: Option<String>,
}

impl ScanResult {
    /// An empty result for `request` carrying `error`.
    pub fn failed(request: &ScanRequest, error: impl Into<String>) -> Self {
        Self {
            ticket: request.ticket,
            node: request.node,
            directory: request.directory.clone(),
            entries: Vec::new(),
            subdirectories: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn directory_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_directory).count()
    }
}

/// Runs scans and expansion listings against the injected enumerator.
///
/// Cheap to clone; workers get their own copy.
#[derive(Clone)]
pub struct DirectoryScanner {
    enumerator: Arc<dyn DirectoryEnumerator>,
}

impl DirectoryScanner {
    pub fn new(enumerator: Arc<dyn DirectoryEnumerator>) -> Self {
        Self { enumerator }
    }

    pub fn enumerator(&self) -> &dyn DirectoryEnumerator {
        self.enumerator.as_ref()
    }

    /// Enumerates the requested directory. Blocking; call from a worker.
    ///
    /// An unreadable directory produces an empty result with `error` set.
    pub fn scan(&self, request: &ScanRequest) -> ScanResult {
        let entries = match self.enumerator.list(&request.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Scan of {:?} failed: {}", request.directory, e);
                return ScanResult::failed(request, e.to_string());
            }
        };

        let subdirectories = if request.collect_subdirectories {
            entries
                .iter()
                .filter(|e| e.is_directory)
                .map(|e| SubdirectoryListing {
                    name: e.name.clone(),
                    path: e.path.clone(),
                    has_subdirectories: self.enumerator.contains_subdirectory(&e.path),
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Scanned {:?}: {} entries, {} folders for the tree (ticket {})",
            request.directory,
            entries.len(),
            subdirectories.len(),
            request.ticket
        );

        ScanResult {
            ticket: request.ticket,
            node: request.node,
            directory: request.directory.clone(),
            entries,
            subdirectories,
            error: None,
        }
    }

    /// Lists the subdirectories of `path` for a tree expansion. Blocking.
    pub fn list_for_expansion(&self, path: &Path) -> ExpansionListing {
        ExpansionListing::collect(path, self.enumerator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enumerator::FsEnumerator;
    use crate::core::tree::DirectoryTree;
    use crate::utils::test_helpers::setup_test_logging;
    use std::fs;
    use tempfile::tempdir;

    fn scanner() -> DirectoryScanner {
        DirectoryScanner::new(Arc::new(FsEnumerator::default()))
    }

    fn request(dir: &Path, collect: bool) -> ScanRequest {
        let tree = DirectoryTree::build_root(dir, &FsEnumerator::default());
        ScanRequest {
            ticket: 7,
            node: tree.root(),
            directory: dir.to_path_buf(),
            collect_subdirectories: collect,
        }
    }

    #[test]
    fn test_scan_counts_files_and_directories() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        for name in ["f1.txt", "f2.rs", "f3"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("s1")).unwrap();
        fs::create_dir_all(dir.path().join("s2/deeper")).unwrap();

        let result = scanner().scan(&request(dir.path(), true));

        assert_eq!(result.entries.len(), 5);
        assert_eq!(result.directory_count(), 2);
        assert_eq!(result.subdirectories.len(), 2);
        assert_eq!(result.ticket, 7);
        assert!(result.error.is_none());

        let s2 = &result.subdirectories[1];
        assert_eq!(s2.name, "s2");
        assert!(s2.has_subdirectories);
        assert!(!result.subdirectories[0].has_subdirectories);
    }

    #[test]
    fn test_scan_skips_tree_collection_when_not_requested() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("s1")).unwrap();

        let result = scanner().scan(&request(dir.path(), false));

        assert_eq!(result.entries.len(), 1);
        assert!(result.subdirectories.is_empty());
    }

    #[test]
    fn test_scan_of_deleted_directory_is_empty_not_fatal() {
        setup_test_logging();
        let dir = tempdir().unwrap();
        let target = dir.path().join("doomed");
        fs::create_dir_all(target.join("child")).unwrap();
        let req = request(&target, true);

        fs::remove_dir_all(&target).unwrap();
        let result = scanner().scan(&req);

        assert!(result.entries.is_empty());
        assert!(result.subdirectories.is_empty());
        assert!(result.error.is_some());
        assert_eq!(result.directory, target);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_of_unreadable_directory_is_empty() {
        use crate::utils::test_helpers::running_as_root;
        use std::os::unix::fs::PermissionsExt;

        if running_as_root() {
            return;
        }
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inside.txt"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = scanner().scan(&request(&locked, true));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(result.entries.is_empty());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_list_for_expansion_matches_tree_rules() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("d.txt"), "").unwrap();

        let listing = scanner().list_for_expansion(dir.path());

        let names: Vec<_> = listing.subdirectories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(listing.subdirectories[0].has_subdirectories);
        assert!(listing.error.is_none());
    }
}
