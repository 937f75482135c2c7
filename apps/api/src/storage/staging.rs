//! Request-owned temp files for uploaded documents.
//!
//! A `TempUpload` owns a uniquely named file under the staging directory and
//! deletes it on drop, so every exit path (errors, early returns, a dropped
//! request future) releases it. Ownership moves to a `ResumeStorage` on apply.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::storage::{safe_extension, StorageError};

#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    original_name: Option<String>,
    len: u64,
}

/// Streams chunks into a fresh `TempUpload`.
pub struct UploadWriter {
    upload: TempUpload,
    sink: tokio::fs::File,
}

impl TempUpload {
    /// Opens a new staged file in `staging_dir`.
    pub fn writer(
        staging_dir: &Path,
        original_name: Option<String>,
    ) -> Result<UploadWriter, StorageError> {
        let suffix = format!(".{}", safe_extension(original_name.as_deref()));
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(staging_dir)?;
        let sink = tokio::fs::File::from_std(file.reopen()?);

        Ok(UploadWriter {
            upload: TempUpload {
                file,
                original_name,
                len: 0,
            },
            sink,
        })
    }

    /// Stages an in-memory document.
    pub async fn from_bytes(
        staging_dir: &Path,
        original_name: Option<String>,
        bytes: &[u8],
    ) -> Result<Self, StorageError> {
        let mut writer = Self::writer(staging_dir, original_name)?;
        writer.write(bytes).await?;
        writer.finish().await
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub async fn read(&self) -> Result<Bytes, StorageError> {
        Ok(Bytes::from(tokio::fs::read(self.path()).await?))
    }

    /// Deletes the staged file now. A file that is already gone is fine.
    pub fn discard(self) {
        let path = self.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!("Removed staged upload {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Staged upload {} was already removed", path.display())
            }
            Err(e) => warn!("Failed to remove staged upload {}: {e}", path.display()),
        }
    }

    /// Moves the staged file to `dest`, giving up ownership of the temp path.
    pub fn persist(self, dest: &Path) -> Result<PathBuf, StorageError> {
        self.file.persist(dest)?;
        Ok(dest.to_path_buf())
    }
}

impl UploadWriter {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.sink.write_all(chunk).await?;
        self.upload.len += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<TempUpload, StorageError> {
        self.sink.flush().await?;
        Ok(self.upload)
    }
}
