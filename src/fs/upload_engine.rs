//! Sequential chunked upload.
//!
//! Chunks are numbered from 1 and sent one at a time: chunk n+1 is read and
//! sent only after the service acknowledged chunk n. The first failure ends
//! the job. Chunks already accepted by the service are left there.

use super::upload_state::{ChunkUploadJob, ChunkedFile};
use crate::api::{ChunkUpload, FileManagerApi};
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::{FmError, Result};
use crate::progress::{ProgressCallback, TransferProgress};

/// Summary of a completed chunked upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub filename: String,
    pub total_chunks: u32,
    pub bytes_sent: u64,
}

/// Drives chunked uploads against a file-manager service.
pub struct ChunkedUploadEngine<'a, A: FileManagerApi> {
    api: &'a A,
    chunk_size: u64,
}

impl<'a, A: FileManagerApi> ChunkedUploadEngine<'a, A> {
    /// Create an engine using the default 4 MiB chunk size.
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create an engine with a custom chunk size.
    pub fn with_chunk_size(api: &'a A, chunk_size: u64) -> Self {
        Self { api, chunk_size }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Upload `file` into the remote directory `target_path`.
    pub async fn upload(
        &self,
        file: ChunkedFile,
        target_path: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<UploadReport> {
        let job = ChunkUploadJob::new(file, target_path, self.chunk_size)?;
        self.run(job, progress).await
    }

    /// Run a prepared job to completion or to its first failure.
    pub async fn run(
        &self,
        mut job: ChunkUploadJob,
        mut progress: Option<ProgressCallback>,
    ) -> Result<UploadReport> {
        let total_chunks = job.total_chunks;
        tracing::debug!(
            filename = %job.file.name,
            path = %job.target_path,
            size = job.file.size,
            total_chunks,
            "starting chunked upload"
        );

        while !job.is_complete() {
            let chunk_number = job.next_chunk;
            let abort = |source: FmError| FmError::ChunkAborted {
                chunk_number,
                total_chunks,
                source: Box::new(source),
            };

            let data = job.read_chunk(chunk_number).await.map_err(abort)?;
            let chunk = ChunkUpload {
                path: job.target_path.clone(),
                filename: job.file.name.clone(),
                chunk_number,
                total_chunks,
                data,
            };

            if let Err(e) = self.api.upload_chunk(chunk).await {
                tracing::warn!(
                    filename = %job.file.name,
                    chunk_number,
                    total_chunks,
                    "chunk failed, aborting upload: {}",
                    e
                );
                return Err(abort(e));
            }

            job.next_chunk += 1;
            if let Some(callback) = progress.as_mut() {
                callback(&TransferProgress {
                    done: job.bytes_done(),
                    total: job.file.size,
                    filename: job.file.name.clone(),
                    chunk_number,
                    total_chunks,
                });
            }
        }

        tracing::info!(
            filename = %job.file.name,
            path = %job.target_path,
            total_chunks,
            "chunked upload complete"
        );
        Ok(UploadReport {
            filename: job.file.name,
            total_chunks,
            bytes_sent: job.file.size,
        })
    }
}
