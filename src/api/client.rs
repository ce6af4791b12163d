//! HTTP implementation of the file-manager API.

use reqwest::multipart::{Form, Part};
use serde_json::json;

use super::{ChunkUpload, FileManagerApi};
use crate::config::ClientConfig;
use crate::error::{FmError, Result};
use crate::fs::utils::validate_leaf;
use crate::fs::{TreeNode, UploadFile};
use crate::http::HttpClient;

/// Multipart field carrying each file of a plain upload.
const UPLOAD_FIELD: &str = "files[]";

/// Client for the remote file-manager service.
#[derive(Debug, Clone)]
pub struct RemoteFileClient {
    http: HttpClient,
}

impl RemoteFileClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(
            &config.base_url,
            config.auth_token.clone(),
            config.timeout,
            config.proxy.as_deref(),
        )?;
        Ok(Self { http })
    }

    /// Get the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

impl FileManagerApi for RemoteFileClient {
    async fn fetch_tree(&self) -> Result<TreeNode> {
        const FALLBACK: &str = "Error fetching file tree";

        tracing::debug!("GET /tree");
        let response = self.http.send(self.http.get("/tree"), FALLBACK).await?;
        let body = response.bytes().await.map_err(|e| {
            tracing::debug!("reading tree body failed: {}", e);
            FmError::transport(FALLBACK)
        })?;

        let mut tree: TreeNode = serde_json::from_slice(&body)?;
        tree.normalize();
        tree.validate()
            .map_err(|violation| FmError::transport(format!("Malformed file tree: {}", violation)))?;

        tracing::debug!(nodes = tree.count(), "tree fetched");
        Ok(tree)
    }

    async fn upload(&self, path: &str, files: Vec<UploadFile>) -> Result<()> {
        if files.is_empty() {
            return Err(FmError::Validation("No files to upload".to_string()));
        }
        tracing::debug!(path, files = files.len(), "POST /upload");

        let mut form = Form::new().text("path", path.to_string());
        for file in files {
            form = form.part(UPLOAD_FIELD, Part::bytes(file.data).file_name(file.name));
        }

        self.http
            .send(self.http.post("/upload").multipart(form), "Error uploading file")
            .await?;
        Ok(())
    }

    async fn upload_chunk(&self, chunk: ChunkUpload) -> Result<()> {
        tracing::debug!(
            path = %chunk.path,
            filename = %chunk.filename,
            chunk = chunk.chunk_number,
            total = chunk.total_chunks,
            bytes = chunk.data.len(),
            "POST /upload-chunk"
        );

        let form = Form::new()
            .part("chunk", Part::bytes(chunk.data).file_name(chunk.filename.clone()))
            .text("chunk_number", chunk.chunk_number.to_string())
            .text("total_chunks", chunk.total_chunks.to_string())
            .text("filename", chunk.filename)
            .text("path", chunk.path);

        self.http
            .send(
                self.http.post("/upload-chunk").multipart(form),
                "Error uploading chunk",
            )
            .await?;
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        validate_leaf(path)?;
        tracing::debug!(path, "POST /dir");

        self.http
            .send(
                self.http.post("/dir").json(&json!({ "path": path })),
                "Error creating directory",
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "DELETE /remove");

        self.http
            .send(
                self.http.delete("/remove").query(&[("path", path)]),
                "Error deleting item",
            )
            .await?;
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        const FALLBACK: &str = "Error downloading file";

        tracing::debug!(path, "GET /download");
        let response = self
            .http
            .send(self.http.get("/download").query(&[("path", path)]), FALLBACK)
            .await?;
        let bytes = response.bytes().await.map_err(|e| {
            tracing::debug!("reading download body failed: {}", e);
            FmError::transport(FALLBACK)
        })?;
        Ok(bytes.to_vec())
    }
}
