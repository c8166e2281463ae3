//! Blob storage for uploaded media and guideline documents.
//!
//! Media lives in a public bucket and is referenced by plain URL. Guideline
//! documents live in a private bucket and are only ever handed out as
//! time-limited signed URLs.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), AppError>;

    /// A GET URL for `key` that stops working after `ttl`.
    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, AppError>;

    fn public_url(&self, bucket: &str, key: &str) -> String;
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    public_base: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, public_base: String) -> Self {
        Self {
            client,
            public_base,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload to s3://{bucket}/{key} failed: {e}")))?;

        info!("Uploaded s3://{bucket}/{key}");
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::Storage(format!("invalid signed URL lifetime: {e}")))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("signing s3://{bucket}/{key} failed: {e}")))?;
        Ok(request.uri().to_string())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        object_url(&self.public_base, bucket, key)
    }
}

/// Path-style object URL.
pub fn object_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}

/// Last `.`-separated segment of a file name, lowercased. `"file"` when the
/// name has no extension.
pub fn file_extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => "file".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_trims_trailing_slash() {
        assert_eq!(
            object_url("http://localhost:9000/", "content-media", "u/1.png"),
            "http://localhost:9000/content-media/u/1.png"
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Brand Book.PDF"), "pdf");
        assert_eq!(file_extension("notes.final.md"), "md");
        assert_eq!(file_extension("README"), "file");
        assert_eq!(file_extension(".env"), "file");
    }
}
