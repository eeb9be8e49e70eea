//! Request orchestration: download, probe, extract, upload, cleanup.

use crate::response::HandlerResponse;
use futures::StreamExt;
use std::path::Path;
use stillframe_core::{thumbnail_key, Config, ThumbnailError, ThumbnailRequest};
use stillframe_processing::{Staging, ThumbnailSize, VideoToolkit};
use stillframe_storage::{ObjectStore, StorageError};
use tokio::io::AsyncWriteExt;

/// Offset into playback at which the representative frame is taken. Sources
/// shorter than this fail the extraction stage before ffmpeg is spawned.
const FRAME_TIMESTAMP_SECS: f64 = 1.0;

const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Orchestrates one thumbnail request end to end. Every internal failure is
/// caught here and converted into a [`HandlerResponse`]; staged files are
/// removed on every exit path.
pub struct ThumbnailHandler<S, V> {
    config: Config,
    store: S,
    toolkit: V,
}

impl<S: ObjectStore, V: VideoToolkit> ThumbnailHandler<S, V> {
    pub fn new(config: Config, store: S, toolkit: V) -> Self {
        Self {
            config,
            store,
            toolkit,
        }
    }

    /// Handle one request payload. Never returns an error: every outcome is
    /// a response envelope.
    pub async fn handle(&self, payload: serde_json::Value) -> HandlerResponse {
        // Validation failures short-circuit before anything is staged or any
        // collaborator is called.
        let request = match ThumbnailRequest::parse(&payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "rejected thumbnail request");
                return HandlerResponse::failure(&e);
            }
        };

        let staging = match Staging::prepare(&self.config.staging_root).await {
            Ok(staging) => staging,
            Err(e) => {
                let e = ThumbnailError::LocalWrite(format!(
                    "failed to create staging directory: {e}"
                ));
                tracing::error!(error = %e, "thumbnail request failed");
                return HandlerResponse::failure(&e);
            }
        };

        let result = self.run(&request, &staging).await;
        staging.cleanup().await;

        match result {
            Ok(destination_key) => {
                tracing::info!(
                    bucket = %request.bucket,
                    source_key = %request.filepath,
                    destination_key = %destination_key,
                    "thumbnail generated"
                );
                HandlerResponse::success(&destination_key)
            }
            Err(e) => {
                tracing::error!(
                    bucket = %request.bucket,
                    source_key = %request.filepath,
                    error = %e,
                    error_kind = e.kind(),
                    "thumbnail request failed"
                );
                HandlerResponse::failure(&e)
            }
        }
    }

    /// The four sequential pipeline stages. Each stage maps its failure onto
    /// one error kind; the first failure is terminal.
    async fn run(
        &self,
        request: &ThumbnailRequest,
        staging: &Staging,
    ) -> Result<String, ThumbnailError> {
        self.download(request, staging.source_path()).await?;

        let info = self
            .toolkit
            .probe(staging.source_path())
            .await
            .map_err(|e| ThumbnailError::Probe(format!("{e:#}")))?;

        if info.duration_secs < FRAME_TIMESTAMP_SECS {
            return Err(ThumbnailError::Extraction(format!(
                "video is {:.2}s long, shorter than the {FRAME_TIMESTAMP_SECS}s frame offset",
                info.duration_secs
            )));
        }

        let size = ThumbnailSize::for_source(&info);
        self.toolkit
            .extract_frame(
                staging.source_path(),
                staging.thumbnail_path(),
                FRAME_TIMESTAMP_SECS,
                size,
            )
            .await
            .map_err(|e| ThumbnailError::Extraction(format!("{e:#}")))?;

        let destination_key = thumbnail_key(&request.filepath);
        let thumbnail = tokio::fs::read(staging.thumbnail_path())
            .await
            .map_err(|e| {
                ThumbnailError::LocalWrite(format!("failed to read staged thumbnail: {e}"))
            })?;

        self.store
            .upload(
                &request.bucket,
                &destination_key,
                thumbnail,
                THUMBNAIL_CONTENT_TYPE,
            )
            .await
            .map_err(|e| ThumbnailError::StorageWrite(e.to_string()))?;

        Ok(destination_key)
    }

    /// Drain the source object byte-for-byte into the staged video path.
    /// Stream-side failures are storage-read faults; file-side failures are
    /// local-write faults.
    async fn download(
        &self,
        request: &ThumbnailRequest,
        destination: &Path,
    ) -> Result<(), ThumbnailError> {
        let mut stream = self
            .store
            .download_stream(&request.bucket, &request.filepath)
            .await
            .map_err(storage_read)?;

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(local_write)?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(storage_read)?;
            file.write_all(&chunk).await.map_err(local_write)?;
        }
        file.flush().await.map_err(local_write)?;

        Ok(())
    }
}

fn storage_read(e: StorageError) -> ThumbnailError {
    ThumbnailError::StorageRead(e.to_string())
}

fn local_write(e: std::io::Error) -> ThumbnailError {
    ThumbnailError::LocalWrite(e.to_string())
}
