//! ffmpeg/ffprobe-backed implementation of [`VideoToolkit`].

use crate::geometry::ThumbnailSize;
use crate::toolkit::{VideoStreamInfo, VideoToolkit};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Validate that a path doesn't contain shell metacharacters or dangerous sequences
fn validate_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Validate and canonicalize a file path to prevent directory traversal
fn validate_and_canonicalize_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    validate_path(&path_str)?;

    if path.exists() {
        path.canonicalize()
            .map_err(|e| anyhow!("Failed to canonicalize path: {}", e))
    } else {
        if let Some(parent) = path.parent() {
            parent
                .canonicalize()
                .map_err(|e| anyhow!("Failed to canonicalize parent path: {}", e))?;
        }
        Ok(path.to_path_buf())
    }
}

/// Invokes the ffmpeg and ffprobe binaries configured at startup.
pub struct FfmpegToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        for path in [&ffmpeg_path, &ffprobe_path] {
            validate_path(path).context("Invalid tool path: contains dangerous characters")?;
        }

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }
}

#[async_trait]
impl VideoToolkit for FfmpegToolkit {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<VideoStreamInfo> {
        let start = std::time::Instant::now();

        let validated_path = validate_and_canonicalize_path(path).context("Invalid video path")?;

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(&validated_path)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let probe_data: serde_json::Value =
            serde_json::from_slice(&output.stdout).context("Failed to parse ffprobe output")?;

        let stream = probe_data["streams"]
            .get(0)
            .ok_or_else(|| anyhow!("No video stream found"))?;

        let width = stream["width"]
            .as_u64()
            .ok_or_else(|| anyhow!("Could not parse width"))? as u32;

        let height = stream["height"]
            .as_u64()
            .ok_or_else(|| anyhow!("Could not parse height"))? as u32;

        let duration_secs = probe_data["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| anyhow!("Could not parse duration"))?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            video_duration = duration_secs,
            width = width,
            height = height,
            "Video probe completed"
        );

        Ok(VideoStreamInfo {
            width,
            height,
            duration_secs,
        })
    }

    #[tracing::instrument(skip(self, path, output), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "extract_frame"
    ))]
    async fn extract_frame(
        &self,
        path: &Path,
        output: &Path,
        timestamp_secs: f64,
        size: ThumbnailSize,
    ) -> Result<()> {
        let start = std::time::Instant::now();

        let input_path = validate_and_canonicalize_path(path).context("Invalid video path")?;
        let output_path =
            validate_and_canonicalize_path(output).context("Invalid thumbnail path")?;

        let args = vec![
            "-ss".to_string(),
            timestamp_secs.to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!("scale={}:{}", size.width, size.height),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(anyhow!("FFmpeg thumbnail extraction failed: {}", stderr));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            timestamp_secs = timestamp_secs,
            size = %size,
            "Thumbnail frame extracted"
        );

        Ok(())
    }
}
