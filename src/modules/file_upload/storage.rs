use std::time::Duration;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use crate::api::error;

#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), error::SystemError>;

    async fn presign_get_object(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, error::SystemError>;

    async fn delete_object(&self, key: &str) -> Result<(), error::SystemError>;
}

pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), error::SystemError> {
        let mut request =
            self.client.put_object().bucket(&self.bucket).key(key).body(ByteStream::from(bytes));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|e| {
            error::SystemError::storage(format!(
                "failed to upload object {key}: {}",
                DisplayErrorContext(e)
            ))
        })?;

        Ok(())
    }

    async fn presign_get_object(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, error::SystemError> {
        let presign_config = PresigningConfig::builder().expires_in(expires_in).build().map_err(
            |e| error::SystemError::storage(format!("failed to build presigning config: {e}")),
        )?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| {
                error::SystemError::storage(format!(
                    "failed to presign object {key}: {}",
                    DisplayErrorContext(e)
                ))
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn delete_object(&self, key: &str) -> Result<(), error::SystemError> {
        self.client.delete_object().bucket(&self.bucket).key(key).send().await.map_err(|e| {
            error::SystemError::storage(format!(
                "failed to delete object {key}: {}",
                DisplayErrorContext(e)
            ))
        })?;
        Ok(())
    }
}
