//! In-memory file-manager service used by tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{ChunkUpload, FileManagerApi};
use crate::error::{FmError, Result};
use crate::fs::utils::join_path;
use crate::fs::{FileNodeInfo, TreeNode, UploadFile};

/// A request the fake service received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    FetchTree,
    Upload { path: String, names: Vec<String> },
    UploadChunk {
        path: String,
        filename: String,
        chunk_number: u32,
        total_chunks: u32,
        len: usize,
    },
    CreateDirectory(String),
    Remove(String),
    Download(String),
}

#[derive(Default)]
struct State {
    tree: Option<TreeNode>,
    calls: Vec<Call>,
    assembling: HashMap<(String, String), Vec<u8>>,
    contents: HashMap<String, Vec<u8>>,
    fail_fetch: bool,
    fail_chunk: Option<u32>,
    fail_mutations: bool,
    fail_download: bool,
    download_delays: HashMap<String, Duration>,
}

/// Fake service holding a real tree that mutations edit.
#[derive(Default)]
pub(crate) struct MockApi {
    state: Mutex<State>,
}

impl MockApi {
    pub(crate) fn with_tree(tree: TreeNode) -> Self {
        let api = Self::default();
        api.state().tree = Some(tree);
        api
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| **c == Call::FetchTree)
            .count()
    }

    pub(crate) fn set_fail_fetch(&self, fail: bool) {
        self.state().fail_fetch = fail;
    }

    pub(crate) fn set_fail_chunk(&self, chunk_number: Option<u32>) {
        self.state().fail_chunk = chunk_number;
    }

    pub(crate) fn set_fail_mutations(&self, fail: bool) {
        self.state().fail_mutations = fail;
    }

    pub(crate) fn set_fail_download(&self, fail: bool) {
        self.state().fail_download = fail;
    }

    pub(crate) fn set_contents(&self, path: &str, data: &[u8]) {
        self.state().contents.insert(path.to_string(), data.to_vec());
    }

    /// Delay the download response for `path`.
    pub(crate) fn set_download_delay(&self, path: &str, delay: Duration) {
        self.state().download_delays.insert(path.to_string(), delay);
    }

    pub(crate) fn remote_tree(&self) -> Option<TreeNode> {
        self.state().tree.clone()
    }
}

fn rejected(message: &str) -> FmError {
    FmError::Transport {
        message: message.to_string(),
        status: Some(500),
    }
}

fn find_mut<'a>(node: &'a mut TreeNode, path: &str) -> Option<&'a mut TreeNode> {
    if node.info.path.trim_end_matches('/') == path.trim_end_matches('/') {
        return Some(node);
    }
    node.children
        .as_mut()?
        .values_mut()
        .find_map(|child| find_mut(child, path))
}

fn parent_of(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

fn insert(tree: &mut TreeNode, info: FileNodeInfo) -> Result<()> {
    let (parent, _) = parent_of(&info.path);
    let parent = find_mut(tree, parent)
        .filter(|p| p.info.is_directory)
        .ok_or_else(|| rejected("Parent directory not found"))?;
    let node = if info.is_directory {
        TreeNode::empty_directory(info)
    } else {
        TreeNode::file(info)
    };
    parent
        .children
        .get_or_insert_with(Default::default)
        .insert(node.info.name.clone(), node);
    Ok(())
}

fn file_info(path: String, name: String, size: u64) -> FileNodeInfo {
    FileNodeInfo {
        path,
        name,
        is_directory: false,
        size,
        last_modified: None,
    }
}

impl FileManagerApi for MockApi {
    async fn fetch_tree(&self) -> Result<TreeNode> {
        let mut state = self.state();
        state.calls.push(Call::FetchTree);
        if state.fail_fetch {
            return Err(rejected("Error fetching file tree"));
        }
        Ok(state.tree.clone().unwrap_or_else(TreeNode::empty_root))
    }

    async fn upload(&self, path: &str, files: Vec<UploadFile>) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Upload {
            path: path.to_string(),
            names: files.iter().map(|f| f.name.clone()).collect(),
        });
        if state.fail_mutations {
            return Err(rejected("Error uploading file"));
        }
        let tree = state.tree.get_or_insert_with(TreeNode::empty_root);
        for file in &files {
            insert(tree, file_info(join_path(path, &file.name), file.name.clone(), file.size()))?;
        }
        Ok(())
    }

    async fn upload_chunk(&self, chunk: ChunkUpload) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::UploadChunk {
            path: chunk.path.clone(),
            filename: chunk.filename.clone(),
            chunk_number: chunk.chunk_number,
            total_chunks: chunk.total_chunks,
            len: chunk.data.len(),
        });
        if state.fail_chunk == Some(chunk.chunk_number) {
            return Err(rejected("Error uploading chunk"));
        }

        let key = (chunk.path.clone(), chunk.filename.clone());
        state.assembling.entry(key.clone()).or_default().extend(chunk.data);
        if chunk.chunk_number == chunk.total_chunks {
            let data = state.assembling.remove(&key).unwrap_or_default();
            let path = join_path(&chunk.path, &chunk.filename);
            let tree = state.tree.get_or_insert_with(TreeNode::empty_root);
            insert(tree, file_info(path.clone(), chunk.filename, data.len() as u64))?;
            state.contents.insert(path, data);
        }
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::CreateDirectory(path.to_string()));
        if state.fail_mutations {
            return Err(rejected("Error creating directory"));
        }
        let (_, name) = parent_of(path);
        let info = FileNodeInfo {
            path: path.to_string(),
            name: name.to_string(),
            is_directory: true,
            size: 0,
            last_modified: None,
        };
        insert(state.tree.get_or_insert_with(TreeNode::empty_root), info)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Remove(path.to_string()));
        if state.fail_mutations {
            return Err(rejected("Error deleting item"));
        }
        let (parent, name) = parent_of(path);
        let removed = state
            .tree
            .as_mut()
            .and_then(|tree| find_mut(tree, parent))
            .and_then(|p| p.children.as_mut())
            .and_then(|children| children.remove(name));
        match removed {
            Some(_) => Ok(()),
            None => Err(rejected("Item not found")),
        }
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let delay = {
            let mut state = self.state();
            state.calls.push(Call::Download(path.to_string()));
            state.download_delays.get(path).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if state.fail_download {
            return Err(rejected("Error downloading file"));
        }
        state
            .contents
            .get(path)
            .cloned()
            .ok_or_else(|| rejected("Error downloading file"))
    }
}
