// Resume artifact storage.
// Uploads are first staged as request-owned temp files (`TempUpload`), then
// either discarded (preview) or handed to a `ResumeStorage` backend (apply).

pub mod local;
pub mod s3;
pub mod staging;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalResumeStorage;
pub use s3::S3ResumeStorage;
pub use staging::TempUpload;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

impl From<tempfile::PersistError> for StorageError {
    fn from(e: tempfile::PersistError) -> Self {
        StorageError::Io(e.error)
    }
}

/// Durable home for resume files.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    /// Takes ownership of a staged upload and returns its stored path.
    async fn store(&self, upload: TempUpload) -> Result<String, StorageError>;

    /// Removes a stored resume. Removing something already gone is not an error.
    async fn remove(&self, stored_path: &str) -> Result<(), StorageError>;
}

/// Final path component of a stored path, whichever separator produced it.
pub fn stored_file_name(stored_path: &str) -> Option<&str> {
    stored_path
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Public download URL for a stored resume. Only the file name is exposed.
pub fn resume_download_url(public_base: &str, stored_path: &str) -> Option<String> {
    stored_file_name(stored_path)
        .map(|name| format!("{}/{}", public_base.trim_end_matches('/'), name))
}

/// Lowercase alphanumeric extension taken from the client's file name.
pub fn safe_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "pdf".to_string())
}
