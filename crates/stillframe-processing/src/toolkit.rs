//! The decoding-tool seam.

use crate::geometry::ThumbnailSize;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Stream facts read from the first video stream of a probed file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoStreamInfo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
}

/// Probe and frame-extraction operations of the external decoding tool.
///
/// Both calls suspend the caller until the external process completes and
/// surface a single value or a single error; the production implementation
/// is [`crate::FfmpegToolkit`].
#[async_trait]
pub trait VideoToolkit: Send + Sync {
    /// Read stream metadata from a local video file.
    async fn probe(&self, path: &Path) -> Result<VideoStreamInfo>;

    /// Render exactly one JPEG frame at `timestamp_secs` into `output`,
    /// scaled to `size`.
    async fn extract_frame(
        &self,
        path: &Path,
        output: &Path,
        timestamp_secs: f64,
        size: ThumbnailSize,
    ) -> Result<()>;
}
