//! High-level file explorer.
//!
//! [`Explorer`] ties the service client, tree store, expansion state and
//! preview manager together and implements the user-facing actions:
//!
//! - every successful mutation is followed by exactly one tree refresh
//! - errors from user actions are published on a single visible error
//!   channel where the latest error wins
//! - directory names are validated before anything reaches the network
//!
//! # Example
//!
//! ```no_run
//! use fmclient::{ClientConfig, Explorer};
//!
//! # async fn example() -> fmclient::Result<()> {
//! let explorer = Explorer::new(ClientConfig::from_env()?)?;
//! explorer.refresh().await?;
//!
//! explorer.create_directory("/docs", "drafts").await?;
//! explorer.upload_file("/docs/drafts", "notes.txt", None).await?;
//!
//! for entry in explorer.visible_entries() {
//!     println!("{}{}", "  ".repeat(entry.depth), entry.info.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::try_join_all;
use tokio::sync::watch;

use crate::api::{FileManagerApi, RemoteFileClient};
use crate::config::ClientConfig;
use crate::error::{FmError, Result};
use crate::fs::utils::{join_path, validate_dir_name};
use crate::fs::{
    ChunkUploadJob, ChunkedFile, ChunkedUploadEngine, ExpansionState, FileNodeInfo, TreeNode,
    UploadFile, UploadReport,
};
use crate::preview::{PreviewResource, PreviewResourceManager};
use crate::progress::ProgressCallback;
use crate::store::{TreeSnapshot, TreeSyncStore};

/// The single user-visible error slot.
#[derive(Debug)]
pub struct ErrorChannel {
    sender: watch::Sender<Option<String>>,
}

impl Default for ErrorChannel {
    fn default() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }
}

impl ErrorChannel {
    /// Replace the visible error.
    pub fn publish(&self, err: &FmError) {
        self.sender.send_replace(Some(err.to_string()));
    }

    pub fn latest(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}

/// One row of the navigation view, detached from the tree it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub depth: usize,
    pub info: FileNodeInfo,
    pub expandable: bool,
    pub expanded: bool,
}

/// File explorer bound to one file-manager service.
pub struct Explorer<A = RemoteFileClient> {
    api: Arc<A>,
    config: ClientConfig,
    store: TreeSyncStore<A>,
    expansion: Mutex<ExpansionState>,
    previews: PreviewResourceManager<A>,
    errors: ErrorChannel,
}

impl Explorer<RemoteFileClient> {
    /// Create an explorer talking HTTP to the configured service.
    ///
    /// The tree starts empty; call [`Explorer::refresh`] to load it.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = RemoteFileClient::new(&config)?;
        Ok(Self::with_api(api, config))
    }
}

impl<A: FileManagerApi> Explorer<A> {
    /// Create an explorer over any service implementation.
    pub fn with_api(api: A, config: ClientConfig) -> Self {
        let api = Arc::new(api);
        Self {
            store: TreeSyncStore::new(Arc::clone(&api)),
            previews: PreviewResourceManager::new(Arc::clone(&api)),
            api,
            config,
            expansion: Mutex::new(ExpansionState::new()),
            errors: ErrorChannel::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Publish the error of a failed user action.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.errors.publish(e);
        }
        result
    }

    /// Refresh after a successful mutation.
    async fn finish_mutation(&self, action: &str, path: &str) -> Result<()> {
        tracing::info!(path, "{}", action);
        self.refresh().await.map(|_| ())
    }

    /// Reload the tree from the service.
    pub async fn refresh(&self) -> Result<Arc<TreeNode>> {
        self.report(self.store.refresh().await)
    }

    pub fn tree(&self) -> Arc<TreeNode> {
        self.store.tree()
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        self.store.snapshot()
    }

    /// Watch for tree replacements.
    pub fn subscribe(&self) -> watch::Receiver<TreeSnapshot> {
        self.store.subscribe()
    }

    /// Look up a node in the current tree.
    pub fn find(&self, path: &str) -> Option<TreeNode> {
        self.store.find(path)
    }

    /// Upload in-memory files into `dir` with one request.
    pub async fn upload(&self, dir: &str, files: Vec<UploadFile>) -> Result<()> {
        let count = files.len();
        self.report(self.api.upload(dir, files).await)?;
        tracing::info!(path = dir, files = count, "uploaded files");
        self.refresh().await.map(|_| ())
    }

    /// Read local files concurrently and upload them into `dir` with one request.
    pub async fn upload_paths<P: AsRef<Path>>(&self, dir: &str, paths: &[P]) -> Result<()> {
        let reads = paths.iter().map(|p| UploadFile::from_path(p.as_ref()));
        let files = self.report(try_join_all(reads).await)?;
        self.upload(dir, files).await
    }

    /// Upload one local file into `dir`.
    ///
    /// Files larger than the configured threshold go through the chunked
    /// path; smaller ones are sent in a single request.
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        dir: &str,
        local: P,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let file = self.report(ChunkedFile::from_path(local.as_ref()).await)?;
        if file.size > self.config.chunk_threshold {
            self.upload_chunked(dir, file, progress).await?;
            return Ok(());
        }

        let file = self.report(UploadFile::from_path(local.as_ref()).await)?;
        self.upload(dir, vec![file]).await
    }

    /// Upload one file in sequential chunks, then refresh once.
    pub async fn upload_chunked(
        &self,
        dir: &str,
        file: ChunkedFile,
        progress: Option<ProgressCallback>,
    ) -> Result<UploadReport> {
        let engine = ChunkedUploadEngine::with_chunk_size(&*self.api, self.config.chunk_size);
        let job = self.report(ChunkUploadJob::new(file, dir, engine.chunk_size()))?;
        let report = self.report(engine.run(job, progress).await)?;
        self.finish_mutation("chunked upload finished", &join_path(dir, &report.filename))
            .await?;
        Ok(report)
    }

    /// Create directory `name` under `parent`.
    ///
    /// The name is trimmed; an empty name or one containing `/` is rejected
    /// without contacting the service.
    pub async fn create_directory(&self, parent: &str, name: &str) -> Result<()> {
        let name = self.report(validate_dir_name(name))?;
        let path = join_path(parent, name);
        self.report(self.api.create_directory(&path).await)?;
        self.finish_mutation("created directory", &path).await
    }

    /// Delete a file or directory (recursively, on the service side).
    pub async fn remove(&self, path: &str) -> Result<()> {
        self.report(self.api.remove(path).await)?;
        self.finish_mutation("removed", path).await
    }

    /// Download a file's contents.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.report(self.api.download(path).await)
    }

    /// Download a file and write it to `local`.
    pub async fn download_to_file<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<u64> {
        let data = self.download(path).await?;
        self.report(tokio::fs::write(local.as_ref(), &data).await.map_err(FmError::from))?;
        tracing::info!(path, local = %local.as_ref().display(), bytes = data.len(), "downloaded");
        Ok(data.len() as u64)
    }

    fn expansion(&self) -> MutexGuard<'_, ExpansionState> {
        self.expansion.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip a directory between expanded and collapsed. Returns the new state.
    pub fn toggle(&self, path: &str) -> bool {
        self.expansion().toggle(path)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expansion().is_expanded(path)
    }

    pub fn collapse_all(&self) {
        self.expansion().collapse_all();
    }

    /// The rows currently visible in the navigation view.
    pub fn visible_entries(&self) -> Vec<VisibleRow> {
        let tree = self.store.tree();
        let expansion = self.expansion();
        tree.visible_entries(&expansion)
            .into_iter()
            .map(|entry| VisibleRow {
                depth: entry.depth,
                info: entry.info.clone(),
                expandable: entry.expandable,
                expanded: entry.expanded,
            })
            .collect()
    }

    /// Start a hover preview. Failures are logged, never published.
    pub async fn begin_preview(&self, path: &str) -> Option<Arc<PreviewResource>> {
        self.previews.begin_preview(path).await
    }

    pub fn end_preview(&self) {
        self.previews.end_preview();
    }

    pub fn current_preview(&self) -> Option<Arc<PreviewResource>> {
        self.previews.current()
    }

    /// The message of the most recent failed action, if any.
    pub fn last_error(&self) -> Option<String> {
        self.errors.latest()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.errors.subscribe()
    }

    /// Dismiss the visible error.
    pub fn clear_error(&self) {
        self.errors.clear();
    }
}
