//! Request-scoped staging directory.
//!
//! One request stages exactly two files: the downloaded source video and the
//! rendered thumbnail. The paths are deterministic under the configured
//! staging root, which assumes at most one in-flight request per process;
//! concurrent requests sharing the root is an explicit non-goal.

use std::io;
use std::path::{Path, PathBuf};

const SOURCE_VIDEO_FILENAME: &str = "source_video.mp4";
const THUMBNAIL_FILENAME: &str = "thumbnail.jpg";

#[derive(Debug)]
pub struct Staging {
    source_video: PathBuf,
    thumbnail: PathBuf,
}

impl Staging {
    /// Create the staging directory under `root` (if absent) and resolve the
    /// two staged file paths.
    pub async fn prepare(root: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;
        Ok(Self {
            source_video: root.join(SOURCE_VIDEO_FILENAME),
            thumbnail: root.join(THUMBNAIL_FILENAME),
        })
    }

    /// Where the downloaded source video is staged.
    pub fn source_path(&self) -> &Path {
        &self.source_video
    }

    /// Where the rendered thumbnail is staged.
    pub fn thumbnail_path(&self) -> &Path {
        &self.thumbnail
    }

    /// Remove both staged files. Missing files are fine; removal failures
    /// are logged and swallowed so cleanup never masks the request outcome.
    pub async fn cleanup(&self) {
        for path in [&self.source_video, &self.thumbnail] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove staged file");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepare_creates_root_and_deterministic_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("staging");

        let staging = Staging::prepare(&root).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(staging.source_path(), root.join("source_video.mp4"));
        assert_eq!(staging.thumbnail_path(), root.join("thumbnail.jpg"));
    }

    #[tokio::test]
    async fn cleanup_removes_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let staging = Staging::prepare(dir.path()).await.unwrap();

        tokio::fs::write(staging.source_path(), b"video").await.unwrap();
        tokio::fs::write(staging.thumbnail_path(), b"jpeg").await.unwrap();

        staging.cleanup().await;
        assert!(!staging.source_path().exists());
        assert!(!staging.thumbnail_path().exists());
    }

    #[tokio::test]
    async fn cleanup_of_missing_files_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let staging = Staging::prepare(dir.path()).await.unwrap();

        // Nothing staged yet; twice over to check idempotence.
        staging.cleanup().await;
        staging.cleanup().await;
    }
}
