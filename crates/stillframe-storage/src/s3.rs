use crate::traits::{ObjectStore, ObjectStream, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::StreamExt;
use tokio_util::io::ReaderStream;

/// S3 object store, usable against AWS or S3-compatible providers.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore.
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        // Every failure is terminal for the invocation, so the SDK must not
        // retry behind the pipeline's back.
        let retry_config = RetryConfig::disabled();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers need a custom endpoint and path-style
            // addressing (required for MinIO, etc.)
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned())
                .retry_config(retry_config);
            if let Some(provider) = config.credentials_provider().into_iter().next() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            s3_config_builder = s3_config_builder.force_path_style(true);

            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3ObjectStore { client })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectStream> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(key.to_string()),
                    _ => {
                        tracing::error!(
                            error = %e,
                            bucket = %bucket,
                            key = %key,
                            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                            "S3 download failed"
                        );
                        StorageError::DownloadFailed(e.to_string())
                    }
                },
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %bucket,
                        key = %key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download stream opened"
        );

        let async_read = response.body.into_async_read();
        let stream = ReaderStream::new(async_read)
            .map(|result| result.map_err(|e| StorageError::DownloadFailed(e.to_string())));

        Ok(Box::pin(stream))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let body = ByteStream::from(Bytes::from(data));
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
