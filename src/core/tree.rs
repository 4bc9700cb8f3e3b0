//! The lazily populated folder tree.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Ids are never reused, so an id
//! that no longer resolves means the node was detached by a re-expansion of
//! one of its ancestors. Background results use that to detect staleness.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::enumerator::DirectoryEnumerator;
use super::{display_name, SubdirectoryListing};

/// Opaque handle to a node of a [`DirectoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

/// Whether a node's children reflect an actual listing of its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Never listed. `has_subdirectories` is the one-level lookahead taken when
    /// the node was created and decides whether the UI offers to expand it.
    Unexpanded { has_subdirectories: bool },
    /// Children were produced by listing the directory.
    Loaded,
}

/// One directory in the tree.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    pub id: NodeId,
    pub path: PathBuf,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub state: NodeState,
}

impl DirectoryNode {
    pub fn is_loaded(&self) -> bool {
        self.state == NodeState::Loaded
    }
}

/// The subdirectories of one directory, gathered off the UI thread and later
/// applied to the tree with [`DirectoryTree::apply_expansion`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionListing {
    pub path: PathBuf,
    pub subdirectories: Vec<SubdirectoryListing>,
    /// Why the directory could not be listed, if it could not.
    pub error: Option<String>,
}

impl ExpansionListing {
    /// Lists the subdirectories of `path` with their lookahead flags.
    ///
    /// An unreadable directory yields an empty listing and a logged warning.
    pub fn collect(path: &Path, enumerator: &dyn DirectoryEnumerator) -> Self {
        match enumerator.subdirectories(path) {
            Ok(dirs) => Self {
                path: path.to_path_buf(),
                subdirectories: dirs
                    .into_iter()
                    .map(|dir| SubdirectoryListing {
                        has_subdirectories: enumerator.contains_subdirectory(&dir.path),
                        name: dir.name,
                        path: dir.path,
                    })
                    .collect(),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Cannot list subdirectories of {:?}: {}", path, e);
                Self {
                    path: path.to_path_buf(),
                    subdirectories: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Outcome of attaching a scan's directories to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAttachment {
    /// The node was unloaded; this many children were attached.
    Attached(usize),
    /// The node is gone, its parent was re-expanded in the meantime.
    NodeDetached,
    /// The node was expanded after the scan started; its listing wins.
    AlreadyLoaded,
}

#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: HashMap<NodeId, DirectoryNode>,
    root: NodeId,
    next_id: u64,
}

impl DirectoryTree {
    /// Builds the tree for `path`: the root with its immediate subdirectories
    /// attached, each carrying a one-level lookahead.
    ///
    /// An unreadable `path` yields a root without children. The error is
    /// logged, not returned.
    pub fn build_root(path: &Path, enumerator: &dyn DirectoryEnumerator) -> Self {
        let mut tree = Self::unloaded(path);
        let listing = ExpansionListing::collect(path, enumerator);
        let root = tree.root;
        tree.apply_expansion(root, &listing);

        tracing::info!(
            "Built directory tree for {:?} with {} top-level folders",
            path,
            tree.children(root).len()
        );
        tracing::debug!("Initial tree:\n{}", tree.outline());
        tree
    }

    /// A tree containing only an unlisted root.
    fn unloaded(path: &Path) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            DirectoryNode {
                id: root,
                path: path.to_path_buf(),
                name: display_name(path),
                parent: None,
                children: Vec::new(),
                state: NodeState::Unexpanded {
                    has_subdirectories: false,
                },
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// Re-lists `node`'s directory and replaces its children.
    ///
    /// Returns `false` if the node no longer exists.
    pub fn expand(&mut self, node: NodeId, enumerator: &dyn DirectoryEnumerator) -> bool {
        let Some(path) = self.get(node).map(|n| n.path.clone()) else {
            return false;
        };
        let listing = ExpansionListing::collect(&path, enumerator);
        self.apply_expansion(node, &listing)
    }

    /// Replaces `node`'s children with the directories of `listing`.
    ///
    /// The old children and their subtrees are removed first, so applying
    /// the same listing twice yields the same child set. Returns `false` if
    /// the node no longer exists.
    pub fn apply_expansion(&mut self, node: NodeId, listing: &ExpansionListing) -> bool {
        let old_children = match self.nodes.get_mut(&node) {
            Some(n) => std::mem::take(&mut n.children),
            None => return false,
        };
        for child in old_children {
            self.remove_subtree(child);
        }

        let new_children: Vec<NodeId> = listing
            .subdirectories
            .iter()
            .map(|dir| self.insert_child(node, dir))
            .collect();

        if let Some(n) = self.nodes.get_mut(&node) {
            tracing::debug!("Expanded {:?}: {} folders", n.path, new_children.len());
            n.children = new_children;
            n.state = NodeState::Loaded;
        }
        true
    }

    /// Attaches the directories found by a selection scan to `node`.
    ///
    /// Only an unloaded node takes them; children already present by path are
    /// skipped and nothing unrelated is removed. Afterwards the node counts as
    /// loaded.
    pub fn apply_scan(&mut self, node: NodeId, directories: &[SubdirectoryListing]) -> ScanAttachment {
        let existing: Vec<PathBuf> = match self.nodes.get(&node) {
            None => return ScanAttachment::NodeDetached,
            Some(n) if n.is_loaded() => return ScanAttachment::AlreadyLoaded,
            Some(n) => n
                .children
                .iter()
                .filter_map(|c| self.nodes.get(c))
                .map(|c| c.path.clone())
                .collect(),
        };

        let mut attached = Vec::new();
        for dir in directories {
            if existing.contains(&dir.path) || attached.iter().any(|(p, _)| p == &dir.path) {
                continue;
            }
            let id = self.insert_child(node, dir);
            attached.push((dir.path.clone(), id));
        }

        let count = attached.len();
        if let Some(n) = self.nodes.get_mut(&node) {
            n.children.extend(attached.into_iter().map(|(_, id)| id));
            n.state = NodeState::Loaded;
        }
        ScanAttachment::Attached(count)
    }

    fn insert_child(&mut self, parent: NodeId, dir: &SubdirectoryListing) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            DirectoryNode {
                id,
                path: dir.path.clone(),
                name: dir.name.clone(),
                parent: Some(parent),
                children: Vec::new(),
                state: NodeState::Unexpanded {
                    has_subdirectories: dir.has_subdirectories,
                },
            },
        );
        id
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&DirectoryNode> {
        self.nodes.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// The children of `node` in display order; empty for unknown ids.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of placeholder entries the UI shows under `node`: one for an
    /// unexpanded directory known to have subdirectories, otherwise zero.
    pub fn placeholder_count(&self, node: NodeId) -> usize {
        match self.nodes.get(&node).map(|n| n.state) {
            Some(NodeState::Unexpanded {
                has_subdirectories: true,
            }) => 1,
            _ => 0,
        }
    }

    /// Whether the UI should offer to expand `node`.
    pub fn is_expandable(&self, node: NodeId) -> bool {
        !self.children(node).is_empty() || self.placeholder_count(node) > 0
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.path == path)
            .map(|n| n.id)
    }

    /// Number of nodes currently attached, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Renders the loaded part of the tree as indented text. Nodes that still
    /// carry a placeholder are marked with `[+]`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push_str(&"  ".repeat(depth));
            out.push_str(&node.name);
            if self.placeholder_count(id) > 0 {
                out.push_str(" [+]");
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }
}
