//! File-manager service API: the transport seam and its HTTP client.
//!
//! Everything above this module (upload engine, tree store, previews,
//! explorer) talks to the service only through [`FileManagerApi`], so the
//! transport can be swapped, e.g. for an in-memory service in tests.

use std::future::Future;

use crate::error::Result;
use crate::fs::{TreeNode, UploadFile};

pub mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::RemoteFileClient;

/// One chunk of a chunked upload, as sent on the wire.
#[derive(Debug, Clone)]
pub struct ChunkUpload {
    /// Remote directory receiving the file
    pub path: String,
    pub filename: String,
    /// 1-based chunk number
    pub chunk_number: u32,
    pub total_chunks: u32,
    pub data: Vec<u8>,
}

/// Remote capabilities of the file-manager service.
///
/// Each call is a suspension point; implementations hold no state besides
/// connection settings.
pub trait FileManagerApi: Send + Sync {
    /// Fetch the whole tree, rooted at a possibly synthetic root.
    fn fetch_tree(&self) -> impl Future<Output = Result<TreeNode>> + Send;

    /// Upload several files into the directory `path` in one request.
    fn upload(&self, path: &str, files: Vec<UploadFile>) -> impl Future<Output = Result<()>> + Send;

    /// Upload one chunk. The caller sequences chunks.
    fn upload_chunk(&self, chunk: ChunkUpload) -> impl Future<Output = Result<()>> + Send;

    /// Create the directory `path`.
    fn create_directory(&self, path: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove a file or directory. Directories are removed recursively by the service.
    fn remove(&self, path: &str) -> impl Future<Output = Result<()>> + Send;

    /// Download the contents of a file.
    fn download(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
