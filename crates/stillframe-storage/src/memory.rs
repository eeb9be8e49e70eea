//! In-memory object store used by the tests.

use crate::traits::{ObjectStore, ObjectStream, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Object store that keeps everything in a process-local map.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn object_key(bucket: &str, key: &str) -> String {
        format!("{}/{}", bucket, key)
    }

    /// Seed an object, as if it had been uploaded earlier.
    pub fn set_object(&self, bucket: &str, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            Self::object_key(bucket, key),
            StoredObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Object content, for test assertions.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&Self::object_key(bucket, key))
            .map(|o| o.data.clone())
    }

    /// Content type recorded at upload time, for test assertions.
    pub fn content_type_of(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&Self::object_key(bucket, key))
            .map(|o| o.content_type.clone())
    }

    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&Self::object_key(bucket, key))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn download_stream(&self, bucket: &str, key: &str) -> StorageResult<ObjectStream> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(&Self::object_key(bucket, key))
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        Ok(Box::pin(stream::once(async move {
            Ok::<_, StorageError>(Bytes::from(data))
        })))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.objects.lock().unwrap().insert(
            Self::object_key(bucket, key),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let store = MemoryObjectStore::new();
        store
            .upload("media", "videos/a.mp4", b"abc".to_vec(), "video/mp4")
            .await
            .unwrap();

        let mut stream = store.download_stream("media", "videos/a.mp4").await.unwrap();
        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.as_ref(), b"abc");
        assert_eq!(
            store.content_type_of("media", "videos/a.mp4").as_deref(),
            Some("video/mp4")
        );
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store
            .download_stream("media", "nope")
            .await
            .err()
            .expect("expected download_stream to fail");
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
