//! Error types for the fmclient library.

use thiserror::Error;

/// Main error type for fmclient operations.
#[derive(Error, Debug)]
pub enum FmError {
    /// Network or protocol failure talking to the file-manager service.
    ///
    /// `message` is the server's own message when the response carried a
    /// structured error body, otherwise a generic per-operation message.
    #[error("{message}")]
    Transport {
        message: String,
        /// HTTP status code, when a response was received at all.
        status: Option<u16>,
    },

    /// User input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// Preview bytes could not be fetched. Never shown to the user.
    #[error("Preview fetch failed: {0}")]
    PreviewFetch(String),

    /// A chunked upload stopped at the given chunk.
    #[error("Upload aborted at chunk {chunk_number}/{total_chunks}: {source}")]
    ChunkAborted {
        chunk_number: u32,
        total_chunks: u32,
        #[source]
        source: Box<FmError>,
    },

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FmError {
    /// Build a transport error without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        FmError::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Check if this error came from the transport layer (including a chunk abort).
    pub fn is_transport(&self) -> bool {
        match self {
            FmError::Transport { .. } => true,
            FmError::ChunkAborted { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Check if this error is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, FmError::Validation(_))
    }
}

impl From<reqwest::Error> for FmError {
    fn from(err: reqwest::Error) -> Self {
        FmError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FmError {
    fn from(err: serde_json::Error) -> Self {
        FmError::transport(format!("Malformed response: {}", err))
    }
}

/// Result type alias for fmclient operations.
pub type Result<T> = std::result::Result<T, FmError>;
