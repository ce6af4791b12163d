//! Which directories are open in the navigation view.

use std::collections::HashSet;

/// Set of expanded directory paths.
///
/// Kept apart from the tree so a refresh never collapses the view. Paths that
/// disappear after a refresh stay in the set and simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the expansion of `path`. Returns the new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}
