//! Local staging of multipart image uploads.
//!
//! Uploaded files are written to `media.upload_dir` and live there only
//! until they have been pushed to the image host or the request has been
//! rejected. Callers must [`StagedUpload::discard`] every staged file.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use estatehub_core::error::{AppError, ErrorKind};
use estatehub_core::result::AppResult;

/// A file spooled to local disk, waiting to be hosted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    /// Location on disk.
    pub path: PathBuf,
    /// Name supplied by the client.
    pub file_name: String,
    /// Content type supplied by the client.
    pub content_type: Option<String>,
}

impl StagedUpload {
    /// Read the file and base64-encode it for the image host.
    pub async fn read_base64(&self) -> AppResult<String> {
        let data = fs::read(&self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read staged upload: {}", self.path.display()),
                e,
            )
        })?;
        Ok(STANDARD.encode(data))
    }

    /// Delete the file. A file that is already gone is not an error;
    /// other failures are logged and swallowed.
    pub async fn discard(&self) {
        match fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Discarded staged upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to discard staged upload"),
        }
    }

    /// The client file name without extension, used as the hosted image name.
    pub fn stem(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }
}

/// Writes uploads into the staging directory.
#[derive(Debug, Clone)]
pub struct UploadStaging {
    root: PathBuf,
}

impl UploadStaging {
    /// Stage into `root`, creating it when missing.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one upload under a fresh unique name.
    pub async fn stage(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> AppResult<StagedUpload> {
        let path = self.root.join(format!("{}-{}", Uuid::new_v4(), sanitize(file_name)));
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stage upload: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Staged upload");
        Ok(StagedUpload {
            path,
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
        })
    }
}

/// Discard every staged file.
pub async fn discard_all(uploads: &[StagedUpload]) {
    for upload in uploads {
        upload.discard().await;
    }
}

/// Keep only characters that are safe in a file name.
fn sanitize(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
