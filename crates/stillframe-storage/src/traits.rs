use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream of one object's content.
pub type ObjectStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key does not exist in the bucket. Kept distinct from
    /// transport failures so callers can tell a bad request from a bad link.
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("storage backend error: {0}")]
    BackendError(String),
}

/// The two object-store operations the pipeline needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Open a byte stream over the object at `bucket`/`key`.
    async fn download_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectStream>;

    /// Write `data` under `bucket`/`key` with the given content type.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;
}
