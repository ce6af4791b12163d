//! Client-side copy of the remote tree.
//!
//! The store publishes whole snapshots through a `watch` channel. A refresh
//! either replaces the snapshot entirely or leaves it untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::api::FileManagerApi;
use crate::error::Result;
use crate::fs::TreeNode;

/// One complete, internally consistent tree.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    pub tree: Arc<TreeNode>,
    /// Ticket of the refresh that produced this snapshot; 0 before the first one.
    pub generation: u64,
}

impl TreeSnapshot {
    fn initial() -> Self {
        Self {
            tree: Arc::new(TreeNode::empty_root()),
            generation: 0,
        }
    }
}

/// Holds the latest tree and refreshes it from the service.
pub struct TreeSyncStore<A> {
    api: Arc<A>,
    tickets: AtomicU64,
    sender: watch::Sender<TreeSnapshot>,
}

impl<A: FileManagerApi> TreeSyncStore<A> {
    /// Create a store holding an empty root until the first refresh.
    pub fn new(api: Arc<A>) -> Self {
        let (sender, _) = watch::channel(TreeSnapshot::initial());
        Self {
            api,
            tickets: AtomicU64::new(0),
            sender,
        }
    }

    /// Fetch the full tree and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept and the error is returned.
    /// When refreshes overlap, the one started last wins: a response whose
    /// ticket is older than the applied snapshot is dropped.
    pub async fn refresh(&self) -> Result<Arc<TreeNode>> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(ticket, "refreshing tree");

        let tree = match self.api.fetch_tree().await {
            Ok(tree) => Arc::new(tree),
            Err(e) => {
                tracing::debug!(ticket, "refresh failed, keeping previous tree: {}", e);
                return Err(e);
            }
        };

        let applied = self.sender.send_if_modified(|current| {
            if ticket > current.generation {
                *current = TreeSnapshot {
                    tree: Arc::clone(&tree),
                    generation: ticket,
                };
                true
            } else {
                false
            }
        });
        if !applied {
            tracing::debug!(ticket, "discarding stale tree response");
        }

        Ok(self.tree())
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> TreeSnapshot {
        self.sender.borrow().clone()
    }

    /// The current tree.
    pub fn tree(&self) -> Arc<TreeNode> {
        Arc::clone(&self.sender.borrow().tree)
    }

    /// Watch for new snapshots.
    pub fn subscribe(&self) -> watch::Receiver<TreeSnapshot> {
        self.sender.subscribe()
    }

    /// Look up a node in the current tree.
    pub fn find(&self, path: &str) -> Option<TreeNode> {
        self.sender.borrow().tree.find(path).cloned()
    }
}
