use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stillframe_core::{Config, ExecutionContext};
use stillframe_handler::ThumbnailHandler;
use stillframe_processing::{ThumbnailSize, VideoStreamInfo, VideoToolkit};
use stillframe_storage::{MemoryObjectStore, ObjectStore, ObjectStream, StorageResult};

// Minimal JPEG header, enough for a non-zero staged thumbnail.
const JPEG_STUB: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

/// Stands in for ffmpeg/ffprobe: probe answers from a fixture, extract
/// writes a JPEG stub to the staged thumbnail path.
struct FakeToolkit {
    info: VideoStreamInfo,
    fail_probe: bool,
    fail_extract: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeToolkit {
    fn new(width: u32, height: u32, duration_secs: f64) -> Self {
        Self {
            info: VideoStreamInfo {
                width,
                height,
                duration_secs,
            },
            fail_probe: false,
            fail_extract: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl VideoToolkit for FakeToolkit {
    async fn probe(&self, _path: &Path) -> anyhow::Result<VideoStreamInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_probe {
            anyhow::bail!("no video stream found");
        }
        Ok(self.info)
    }

    async fn extract_frame(
        &self,
        _path: &Path,
        output: &Path,
        _timestamp_secs: f64,
        _size: ThumbnailSize,
    ) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_extract {
            anyhow::bail!("unsupported codec");
        }
        tokio::fs::write(output, JPEG_STUB).await?;
        Ok(())
    }
}

/// Counts store calls so tests can assert validation short-circuits.
#[derive(Clone)]
struct CountingStore {
    inner: MemoryObjectStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn new(inner: MemoryObjectStore) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn download_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.download_stream(bucket, key).await
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.upload(bucket, key, data, content_type).await
    }
}

fn test_config(staging_root: PathBuf) -> Config {
    let mut config = Config::for_context(ExecutionContext::Local);
    config.staging_root = staging_root;
    config
}

fn seeded_store() -> MemoryObjectStore {
    let store = MemoryObjectStore::new();
    store.set_object("media", "videos/a.mp4", vec![0u8; 4096]);
    store
}

#[tokio::test]
async fn valid_request_round_trips_to_a_thumbnail_object() {
    let staging = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let toolkit = FakeToolkit::new(1080, 1920, 12.0);

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        store.clone(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;

    assert!(response.is_success(), "body: {}", response.body);
    assert_eq!(
        response.body_json()["thumbnailPath"],
        "videos/a_thumbnail.jpg"
    );

    let thumbnail = store.object("media", "videos/a_thumbnail.jpg").unwrap();
    assert!(!thumbnail.is_empty());
    assert_eq!(
        store
            .content_type_of("media", "videos/a_thumbnail.jpg")
            .as_deref(),
        Some("image/jpeg")
    );
}

#[tokio::test]
async fn string_payload_is_parsed_into_a_request() {
    let staging = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let toolkit = FakeToolkit::new(1080, 1920, 12.0);

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        store.clone(),
        toolkit,
    );
    let response = handler
        .handle(json!(r#"{"bucket":"media","filepath":"videos/a.mp4"}"#))
        .await;

    assert!(response.is_success());
    assert!(store.has_object("media", "videos/a_thumbnail.jpg"));
}

#[tokio::test]
async fn missing_fields_fail_without_touching_collaborators() {
    let staging = tempfile::tempdir().unwrap();
    let store = CountingStore::new(MemoryObjectStore::new());
    let store_calls = store.calls.clone();
    let toolkit = FakeToolkit::new(1080, 1920, 12.0);
    let toolkit_calls = toolkit.call_count();

    let handler = ThumbnailHandler::new(test_config(staging.path().to_path_buf()), store, toolkit);

    for payload in [
        json!({}),
        json!({ "bucket": "media" }),
        json!({ "filepath": "videos/a.mp4" }),
        json!({ "bucket": "", "filepath": "videos/a.mp4" }),
        json!({ "bucket": "media", "filepath": "   " }),
    ] {
        let response = handler.handle(payload).await;
        assert_eq!(response.status_code, 500);
        assert!(response.body_json()["stack"]
            .as_str()
            .unwrap()
            .starts_with("ValidationError"));
    }

    assert_eq!(store_calls.load(Ordering::SeqCst), 0);
    assert_eq!(toolkit_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_source_object_is_a_storage_read_failure() {
    let staging = tempfile::tempdir().unwrap();
    let toolkit = FakeToolkit::new(1080, 1920, 12.0);

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        MemoryObjectStore::new(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/missing.mp4" }))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body_json()["stack"]
        .as_str()
        .unwrap()
        .starts_with("StorageReadError"));
}

#[tokio::test]
async fn probe_failure_surfaces_as_probe_error() {
    let staging = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let mut toolkit = FakeToolkit::new(1080, 1920, 12.0);
    toolkit.fail_probe = true;

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        store.clone(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body_json()["stack"]
        .as_str()
        .unwrap()
        .starts_with("ProbeError"));
    assert!(!store.has_object("media", "videos/a_thumbnail.jpg"));
}

#[tokio::test]
async fn extraction_failure_writes_no_destination_object() {
    let staging = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let mut toolkit = FakeToolkit::new(1080, 1920, 12.0);
    toolkit.fail_extract = true;

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        store.clone(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body_json()["stack"]
        .as_str()
        .unwrap()
        .starts_with("ExtractionError"));
    assert!(!store.has_object("media", "videos/a_thumbnail.jpg"));
}

#[tokio::test]
async fn source_shorter_than_frame_offset_fails_extraction() {
    let staging = tempfile::tempdir().unwrap();
    let store = seeded_store();
    let toolkit = FakeToolkit::new(1080, 1920, 0.5);

    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        store.clone(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;

    assert_eq!(response.status_code, 500);
    assert!(response.body_json()["stack"]
        .as_str()
        .unwrap()
        .starts_with("ExtractionError"));
    assert!(!store.has_object("media", "videos/a_thumbnail.jpg"));
}

#[tokio::test]
async fn staged_files_are_removed_on_success_and_failure() {
    let staging = tempfile::tempdir().unwrap();
    let source_path = staging.path().join("source_video.mp4");
    let thumbnail_path = staging.path().join("thumbnail.jpg");

    // Success path.
    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        seeded_store(),
        FakeToolkit::new(1080, 1920, 12.0),
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;
    assert!(response.is_success());
    assert!(!source_path.exists());
    assert!(!thumbnail_path.exists());

    // Failure path: extraction errors after the source was staged.
    let mut toolkit = FakeToolkit::new(1080, 1920, 12.0);
    toolkit.fail_extract = true;
    let handler = ThumbnailHandler::new(
        test_config(staging.path().to_path_buf()),
        seeded_store(),
        toolkit,
    );
    let response = handler
        .handle(json!({ "bucket": "media", "filepath": "videos/a.mp4" }))
        .await;
    assert_eq!(response.status_code, 500);
    assert!(!source_path.exists());
    assert!(!thumbnail_path.exists());
}

#[tokio::test]
async fn landscape_source_gets_ratio_preserving_size() {
    // The handler passes the derived size through to the toolkit; assert on
    // the geometry rule at the seam.
    let info = VideoStreamInfo {
        width: 1920,
        height: 1080,
        duration_secs: 12.0,
    };
    assert_eq!(
        ThumbnailSize::for_source(&info),
        ThumbnailSize {
            width: 360,
            height: 203
        }
    );
}
