//! Filesystem node types as reported by the file-manager service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expansion::ExpansionState;
use super::utils::{extension_of, is_strict_descendant};

/// Immutable snapshot of one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNodeInfo {
    /// Full path on the remote service
    pub path: String,
    /// Entry name (last path segment)
    pub name: String,
    /// True for directories
    pub is_directory: bool,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Last modification time; absent on a synthetic root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileNodeInfo {
    /// Get the lowercase extension of the entry name, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// A node in the mirrored tree.
///
/// `children` is `Some` only for directories. Keys equal the child's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub info: FileNodeInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<BTreeMap<String, TreeNode>>,
}

/// Reason a fetched tree was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeViolation {
    /// A child's path does not sit under its parent's path
    NotDescendant { parent: String, child: String },
    /// A `children` key differs from the child's name
    KeyMismatch { key: String, name: String },
    /// A file node carries children
    FileWithChildren { path: String },
}

impl std::fmt::Display for TreeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeViolation::NotDescendant { parent, child } => {
                write!(f, "{} is not under {}", child, parent)
            }
            TreeViolation::KeyMismatch { key, name } => {
                write!(f, "child key {} does not match name {}", key, name)
            }
            TreeViolation::FileWithChildren { path } => {
                write!(f, "file {} has children", path)
            }
        }
    }
}

/// One row of the navigation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry<'a> {
    /// Nesting level; top-level entries are 0
    pub depth: usize,
    pub info: &'a FileNodeInfo,
    /// Directory with at least one child
    pub expandable: bool,
    pub expanded: bool,
}

impl TreeNode {
    /// Synthetic empty root, shown before the first refresh.
    pub fn empty_root() -> Self {
        TreeNode {
            info: FileNodeInfo {
                path: String::new(),
                name: String::new(),
                is_directory: true,
                size: 0,
                last_modified: None,
            },
            children: Some(BTreeMap::new()),
        }
    }

    /// Create a directory node with the given children.
    pub fn directory(info: FileNodeInfo, children: impl IntoIterator<Item = TreeNode>) -> Self {
        let children = children
            .into_iter()
            .map(|child| (child.info.name.clone(), child))
            .collect();
        TreeNode {
            info,
            children: Some(children),
        }
    }

    /// Create a directory node without children.
    pub fn empty_directory(info: FileNodeInfo) -> Self {
        TreeNode {
            info,
            children: Some(BTreeMap::new()),
        }
    }

    /// Create a file node.
    pub fn file(info: FileNodeInfo) -> Self {
        TreeNode {
            info,
            children: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.info.is_directory
    }

    /// Iterate direct children in name order.
    pub fn children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().flat_map(|c| c.values())
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Find a node by its path. The root matches `""` and `"/"`.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let target = path.trim_end_matches('/');
        if self.info.path.trim_end_matches('/') == target {
            return Some(self);
        }
        self.children()
            .filter(|child| {
                child.info.path.trim_end_matches('/') == target
                    || is_strict_descendant(&child.info.path, target)
            })
            .find_map(|child| child.find(target))
    }

    /// Check if a node with this path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Count all nodes including this one.
    pub fn count(&self) -> usize {
        1 + self.children().map(TreeNode::count).sum::<usize>()
    }

    /// Check the structural invariants of a fetched tree.
    pub fn validate(&self) -> std::result::Result<(), TreeViolation> {
        let Some(children) = &self.children else {
            return Ok(());
        };

        if !self.info.is_directory && !children.is_empty() {
            return Err(TreeViolation::FileWithChildren {
                path: self.info.path.clone(),
            });
        }

        for (key, child) in children {
            if key != &child.info.name {
                return Err(TreeViolation::KeyMismatch {
                    key: key.clone(),
                    name: child.info.name.clone(),
                });
            }
            if !is_strict_descendant(&self.info.path, &child.info.path) {
                return Err(TreeViolation::NotDescendant {
                    parent: self.info.path.clone(),
                    child: child.info.path.clone(),
                });
            }
            child.validate()?;
        }
        Ok(())
    }

    /// Drop empty `children` maps sent for files.
    pub(crate) fn normalize(&mut self) {
        if !self.info.is_directory && self.children.as_ref().is_some_and(|c| c.is_empty()) {
            self.children = None;
        }
        if self.info.is_directory && self.children.is_none() {
            self.children = Some(BTreeMap::new());
        }
        if let Some(children) = &mut self.children {
            for child in children.values_mut() {
                child.normalize();
            }
        }
    }

    /// Flatten the tree into the rows a navigation view shows.
    ///
    /// The root itself is not a row. A directory's children appear only
    /// when it is expandable and expanded.
    pub fn visible_entries<'a>(&'a self, expansion: &ExpansionState) -> Vec<VisibleEntry<'a>> {
        let mut rows = Vec::new();
        for child in self.children() {
            child.collect_visible(0, expansion, &mut rows);
        }
        rows
    }

    fn collect_visible<'a>(
        &'a self,
        depth: usize,
        expansion: &ExpansionState,
        rows: &mut Vec<VisibleEntry<'a>>,
    ) {
        let expandable = self.info.is_directory && self.has_children();
        let expanded = expandable && expansion.is_expanded(&self.info.path);
        rows.push(VisibleEntry {
            depth,
            info: &self.info,
            expandable,
            expanded,
        });

        if expanded {
            for child in self.children() {
                child.collect_visible(depth + 1, expansion, rows);
            }
        }
    }
}
