//! Upload inputs and per-job chunk state.
//!
//! A [`ChunkUploadJob`] lives for one chunked upload. It is never saved, so
//! an interrupted upload starts over from chunk 1.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt as _, AsyncSeekExt as _};

use super::utils::{chunk_count, chunk_len};
use crate::error::{FmError, Result};

/// A named in-memory blob for a plain multi-file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a local file into memory, named after its file name.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        Ok(Self {
            name: file_name_of(path)?,
            data,
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Where chunk bytes come from.
#[derive(Debug, Clone)]
pub enum ChunkSource {
    /// Whole file already in memory
    Memory(Vec<u8>),
    /// Local file read one chunk at a time
    File(PathBuf),
}

/// A file to upload in chunks.
#[derive(Debug, Clone)]
pub struct ChunkedFile {
    pub name: String,
    pub size: u64,
    pub source: ChunkSource,
}

impl ChunkedFile {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            source: ChunkSource::Memory(data),
        }
    }

    /// Reference a local file. Only its size is read now.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(FmError::Validation(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }
        Ok(Self {
            name: file_name_of(path)?,
            size: metadata.len(),
            source: ChunkSource::File(path.to_path_buf()),
        })
    }
}

impl From<UploadFile> for ChunkedFile {
    fn from(file: UploadFile) -> Self {
        ChunkedFile::from_bytes(file.name, file.data)
    }
}

/// State of one chunked upload.
#[derive(Debug)]
pub struct ChunkUploadJob {
    pub file: ChunkedFile,
    /// Remote directory receiving the file
    pub target_path: String,
    pub chunk_size: u64,
    pub total_chunks: u32,
    /// 1-based number of the next chunk to send
    pub next_chunk: u32,
}

impl ChunkUploadJob {
    pub fn new(file: ChunkedFile, target_path: impl Into<String>, chunk_size: u64) -> Result<Self> {
        if chunk_size == 0 {
            return Err(FmError::Validation(
                "Chunk size must be positive".to_string(),
            ));
        }
        if file.name.trim().is_empty() {
            return Err(FmError::Validation("File name cannot be empty".to_string()));
        }
        let total_chunks = chunk_count(file.size, chunk_size)?;
        Ok(Self {
            file,
            target_path: target_path.into(),
            chunk_size,
            total_chunks,
            next_chunk: 1,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.next_chunk > self.total_chunks
    }

    /// Byte offset of the given 1-based chunk.
    pub fn offset_of(&self, chunk_number: u32) -> u64 {
        u64::from(chunk_number - 1) * self.chunk_size
    }

    /// Bytes sent once every chunk before `next_chunk` is acknowledged.
    pub fn bytes_done(&self) -> u64 {
        self.offset_of(self.next_chunk).min(self.file.size)
    }

    /// Read the bytes of the given 1-based chunk.
    pub async fn read_chunk(&self, chunk_number: u32) -> Result<Vec<u8>> {
        let offset = self.offset_of(chunk_number);
        let len = chunk_len(chunk_number, self.file.size, self.chunk_size);

        match &self.file.source {
            ChunkSource::Memory(data) => {
                let start = usize::try_from(offset)
                    .map_err(|_| FmError::Validation("Chunk offset too large".to_string()))?;
                let end = start + len as usize;
                data.get(start..end).map(<[u8]>::to_vec).ok_or_else(|| {
                    FmError::Validation(format!(
                        "Chunk {} out of range for {} bytes",
                        chunk_number,
                        data.len()
                    ))
                })
            }
            ChunkSource::File(path) => {
                let mut file = tokio::fs::File::open(path).await?;
                file.seek(std::io::SeekFrom::Start(offset)).await?;
                let mut buffer = vec![0u8; len as usize];
                file.read_exact(&mut buffer).await?;
                Ok(buffer)
            }
        }
    }
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| FmError::Validation(format!("No file name in {}", path.display())))
}
