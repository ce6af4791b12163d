//! # fmclient
//!
//! Rust client library for a remote file-manager service.
//!
//! ## Features
//!
//! - **Tree browsing**: fetch the whole remote hierarchy as one validated
//!   snapshot and watch for replacements.
//!   - Expand/collapse navigation with a flattened view of visible rows.
//! - **Filesystem Operations**:
//!   - Create directories (`mkdir`) and delete files or folders (`rm`).
//!   - Download files into memory or to local disk.
//! - **File Transfers**:
//!   - Multi-file upload in one request.
//!   - Sequential chunked upload for large files, reading one chunk at a time.
//!   - Progress tracking with custom callbacks.
//! - **Previews**: hover previews for image files, with a single live resource.
//!
//! Every successful mutation is followed by exactly one tree refresh, so the
//! tree returned by [`Explorer::tree`] reflects the service after each action.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use fmclient::{ClientConfig, Explorer};
//!
//! # async fn example() -> fmclient::Result<()> {
//! let config = ClientConfig::new("http://localhost:8080/v1/filemanager").with_token("secret");
//! let explorer = Explorer::new(config)?;
//!
//! // Load the tree
//! let tree = explorer.refresh().await?;
//! for node in tree.children() {
//!     println!("{} ({} bytes)", node.info.name, node.info.size);
//! }
//!
//! // Upload a file (chunked automatically when large)
//! explorer.upload_file("/docs", "local_file.txt", None).await?;
//!
//! // Download a file to local disk
//! explorer.download_to_file("/docs/local_file.txt", "downloaded.txt").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The library logs through `tracing`. Install a subscriber to see it:
//!
//! ```no_run
//! use tracing_subscriber::EnvFilter;
//!
//! let filter = EnvFilter::try_from_default_env()
//!     .unwrap_or_else(|_| EnvFilter::new("fmclient=debug"));
//! tracing_subscriber::fmt().with_env_filter(filter).init();
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod explorer;
pub mod fs;
pub mod http;
pub mod preview;
pub mod progress;
pub mod store;

// Re-export commonly used types
pub use api::{ChunkUpload, FileManagerApi, RemoteFileClient};
pub use config::ClientConfig;
pub use error::{FmError, Result};
pub use explorer::{ErrorChannel, Explorer, VisibleRow};
pub use fs::{
    ChunkedFile, ChunkedUploadEngine, ExpansionState, FileNodeInfo, TreeNode, UploadFile,
    UploadReport,
};
pub use preview::{PreviewResource, PreviewResourceManager, is_previewable};
pub use progress::{ProgressCallback, TransferProgress};
pub use store::{TreeSnapshot, TreeSyncStore};
