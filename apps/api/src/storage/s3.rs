use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::config::S3Settings;
use crate::storage::{safe_extension, ResumeStorage, StorageError, TempUpload};

const KEY_PREFIX: &str = "resumes";

/// Stores resumes as `resumes/<uuid>.<ext>` objects in an S3 / MinIO bucket.
#[derive(Clone)]
pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    /// Constructs a client configured for MinIO (custom endpoint) or AWS.
    pub async fn connect(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "hireflow-static",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn store(&self, upload: TempUpload) -> Result<String, StorageError> {
        let ext = safe_extension(upload.original_name());
        let key = format!("{KEY_PREFIX}/{}.{ext}", Uuid::new_v4());
        let content_type = if ext == "pdf" {
            "application/pdf"
        } else {
            "application/octet-stream"
        };
        let body = upload.read().await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload failed: {e}")))?;

        upload.discard();
        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn remove(&self, stored_path: &str) -> Result<(), StorageError> {
        // DeleteObject succeeds for keys that do not exist.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(stored_path)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("delete failed: {e}")))?;

        info!("Removed resume s3://{}/{}", self.bucket, stored_path);
        Ok(())
    }
}
