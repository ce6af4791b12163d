//! Progress reporting for chunked uploads.

/// Progress after one acknowledged chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes acknowledged so far
    pub done: u64,
    /// Total bytes to transfer
    pub total: u64,
    /// Name of the file being transferred
    pub filename: String,
    /// 1-based number of the chunk just acknowledged
    pub chunk_number: u32,
    pub total_chunks: u32,
}

impl TransferProgress {
    /// Get progress as a percentage (0.0 to 100.0).
    ///
    /// An empty file counts as complete once its single chunk is through.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return if self.is_complete() { 100.0 } else { 0.0 };
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if the final chunk has been acknowledged.
    pub fn is_complete(&self) -> bool {
        self.chunk_number >= self.total_chunks
    }
}

/// Callback invoked after each acknowledged chunk.
pub type ProgressCallback = Box<dyn FnMut(&TransferProgress) + Send>;
