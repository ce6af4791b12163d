//! Filesystem model: tree nodes, expansion state and uploads.

mod expansion;
pub(crate) mod node;
mod upload_engine;
mod upload_state;
pub(crate) mod utils;

pub use expansion::ExpansionState;
pub use node::{FileNodeInfo, TreeNode, TreeViolation, VisibleEntry};
pub use upload_engine::{ChunkedUploadEngine, UploadReport};
pub use upload_state::{ChunkSource, ChunkUploadJob, ChunkedFile, UploadFile};
