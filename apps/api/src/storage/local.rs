use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::storage::{safe_extension, stored_file_name, ResumeStorage, StorageError, TempUpload};

/// Stores resumes as files under `<upload_dir>/resumes`, served read-only at the public base.
#[derive(Debug, Clone)]
pub struct LocalResumeStorage {
    resume_dir: PathBuf,
}

impl LocalResumeStorage {
    pub fn new(resume_dir: impl Into<PathBuf>) -> Self {
        Self {
            resume_dir: resume_dir.into(),
        }
    }
}

#[async_trait]
impl ResumeStorage for LocalResumeStorage {
    async fn store(&self, upload: TempUpload) -> Result<String, StorageError> {
        let name = format!(
            "{}.{}",
            Uuid::new_v4(),
            safe_extension(upload.original_name())
        );
        let dest = upload.persist(&self.resume_dir.join(name))?;
        info!("Stored resume at {}", dest.display());
        Ok(dest.to_string_lossy().into_owned())
    }

    async fn remove(&self, stored_path: &str) -> Result<(), StorageError> {
        // Resolve inside our own directory; stored paths are never trusted as-is.
        let Some(name) = stored_file_name(stored_path) else {
            return Ok(());
        };
        match tokio::fs::remove_file(self.resume_dir.join(name)).await {
            Ok(()) => {
                info!("Removed resume {stored_path}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
