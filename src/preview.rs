//! Hover previews for image files.
//!
//! Hovering an image entry fetches its bytes and exposes them as a
//! transient resource. At most one resource is live at a time: starting a
//! new preview or ending the current one releases the previous resource,
//! and a fetch that finishes after being superseded is thrown away.
//!
//! Preview failures are logged and otherwise ignored.
//!
//! # Example
//!
//! ```
//! use fmclient::preview::is_previewable;
//!
//! assert!(is_previewable("/photos/cat.JPG"));
//! assert!(!is_previewable("/docs/report.pdf"));
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::{engine::general_purpose, Engine};
use image::ImageFormat;

use crate::api::FileManagerApi;
use crate::error::FmError;
use crate::fs::utils::extension_of;

/// Extensions that get a hover preview
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

const FALLBACK_MIME: &str = "application/octet-stream";

/// Check if the file at `path` gets a preview, by extension (case-insensitive).
pub fn is_previewable(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Detect the MIME type of image bytes, falling back to the file extension.
fn mime_type_of(path: &str, data: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(data) {
        return format.to_mime_type();
    }
    extension_of(path)
        .and_then(ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Fetched preview bytes for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewResource {
    pub path: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl PreviewResource {
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        let path = path.into();
        let mime_type = mime_type_of(&path, &data);
        Self {
            path,
            mime_type,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encode the bytes as a `data:` URL that can be handed to a renderer.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }
}

#[derive(Default)]
struct PreviewState {
    /// Bumped by every begin/end; a fetch only lands if it still matches.
    generation: u64,
    live: Option<Arc<PreviewResource>>,
}

impl PreviewState {
    fn release(&mut self) {
        if let Some(resource) = self.live.take() {
            tracing::debug!(path = %resource.path, "released preview");
        }
    }
}

/// Owns the single live preview resource.
pub struct PreviewResourceManager<A> {
    api: Arc<A>,
    state: Mutex<PreviewState>,
}

impl<A: FileManagerApi> PreviewResourceManager<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(PreviewState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start previewing `path`.
    ///
    /// Returns `None` for non-image files (no fetch happens), when the fetch
    /// fails, or when another begin/end superseded this call meanwhile.
    pub async fn begin_preview(&self, path: &str) -> Option<Arc<PreviewResource>> {
        if !is_previewable(path) {
            return None;
        }

        let generation = {
            let mut state = self.state();
            state.release();
            state.generation += 1;
            state.generation
        };

        let data = match self.api.download(path).await {
            Ok(data) => data,
            Err(e) => {
                let err = FmError::PreviewFetch(format!("{}: {}", path, e));
                tracing::warn!("{}", err);
                return None;
            }
        };

        let mut state = self.state();
        if state.generation != generation {
            tracing::debug!(path, "discarding superseded preview");
            return None;
        }
        let resource = Arc::new(PreviewResource::new(path, data));
        tracing::debug!(path, bytes = resource.len(), mime = resource.mime_type, "preview ready");
        state.live = Some(Arc::clone(&resource));
        Some(resource)
    }

    /// Release the live resource and cancel any in-flight preview.
    pub fn end_preview(&self) {
        let mut state = self.state();
        state.generation += 1;
        state.release();
    }

    /// The live resource, if any.
    pub fn current(&self) -> Option<Arc<PreviewResource>> {
        self.state().live.clone()
    }
}
