//! Batched concurrent upload of frame sets.

use futures::future::try_join_all;
use std::sync::Arc;

use framegrab_core::FrameArtifact;
use framegrab_storage::{ContentStore, StorageError};

use crate::error::UploadError;

/// Uploads frame sets in bounded groups.
///
/// Groups are processed sequentially; within a group every upload is
/// dispatched concurrently. In-flight requests are capped at the group
/// size rather than the total frame count, so arbitrarily long videos
/// can't exhaust connections. A failure inside a group surfaces
/// immediately; groups completed earlier stay persisted, since every frame
/// key is independently addressable and idempotent to re-upload.
pub struct BatchUploader {
    batch_size: usize,
}

impl BatchUploader {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Upload every artifact under its pre-assigned key.
    ///
    /// The returned key list preserves input order regardless of completion
    /// order within a group.
    pub async fn upload_all(
        &self,
        store: &Arc<dyn ContentStore>,
        items: Vec<(String, FrameArtifact)>,
    ) -> Result<Vec<String>, UploadError> {
        let total_groups = items.len().div_ceil(self.batch_size);
        let mut keys = Vec::with_capacity(items.len());

        for (group_index, group) in items.chunks(self.batch_size).enumerate() {
            let uploads = group.iter().map(|(key, artifact)| {
                let store = Arc::clone(store);
                let key = key.clone();
                let path = artifact.path.clone();
                let content_type = artifact.content_type;
                async move {
                    let data = tokio::fs::read(&path).await.map_err(|e| UploadError {
                        key: key.clone(),
                        source: StorageError::IoError(e),
                    })?;
                    store
                        .put(&key, data, content_type)
                        .await
                        .map_err(|e| UploadError {
                            key: key.clone(),
                            source: e,
                        })
                }
            });

            let group_keys = try_join_all(uploads).await?;

            tracing::debug!(
                group = group_index + 1,
                groups = total_groups,
                uploaded = group_keys.len(),
                "Frame group uploaded"
            );

            keys.extend(group_keys);
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use framegrab_core::FRAME_CONTENT_TYPE;
    use framegrab_storage::{StorageBackend, StorageResult};
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory store that records puts and can fail on a chosen key.
    /// Completion order inside a group is scrambled with per-item delays.
    struct RecordingStore {
        puts: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingStore {
        fn new(fail_on: Option<String>) -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
                fail_on,
            }
        }

        fn recorded(&self) -> Vec<String> {
            self.puts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentStore for RecordingStore {
        async fn put(&self, key: &str, _data: Vec<u8>, _ct: &str) -> StorageResult<String> {
            // Scramble completion order: later keys finish first.
            let jitter = 10 - (key.len() % 10) as u64;
            tokio::time::sleep(Duration::from_millis(jitter)).await;

            if self.fail_on.as_deref() == Some(key) {
                return Err(StorageError::UploadFailed("injected failure".to_string()));
            }
            self.puts.lock().unwrap().push(key.to_string());
            Ok(key.to_string())
        }

        async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::NotFound(key.to_string()))
        }

        async fn presigned_get_url(&self, key: &str, _e: Duration) -> StorageResult<String> {
            Ok(format!("http://localhost/{}", key))
        }

        async fn delete(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    fn make_items(dir: &Path, count: usize) -> Vec<(String, FrameArtifact)> {
        (0..count)
            .map(|i| {
                let file_name = format!("frame-{}.jpg", i + 1);
                let path = dir.join(&file_name);
                std::fs::write(&path, b"jpeg").unwrap();
                (
                    format!("frames/1-{}", file_name),
                    FrameArtifact {
                        path,
                        index: i,
                        timestamp_secs: i as u64 * 10,
                        size_bytes: 4,
                        content_type: FRAME_CONTENT_TYPE,
                    },
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_upload_all_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let items = make_items(dir.path(), 25);
        let expected: Vec<String> = items.iter().map(|(k, _)| k.clone()).collect();

        let store: Arc<dyn ContentStore> = Arc::new(RecordingStore::new(None));
        let uploader = BatchUploader::new(10);

        let keys = uploader.upload_all(&store, items).await.unwrap();
        assert_eq!(keys, expected);
    }

    #[tokio::test]
    async fn test_upload_all_partitions_into_groups() {
        let dir = tempfile::tempdir().unwrap();
        let items = make_items(dir.path(), 1200);

        let store = Arc::new(RecordingStore::new(None));
        let dyn_store: Arc<dyn ContentStore> = store.clone();
        let uploader = BatchUploader::new(500);

        let keys = uploader.upload_all(&dyn_store, items).await.unwrap();
        assert_eq!(keys.len(), 1200);
        assert_eq!(store.recorded().len(), 1200);
    }

    #[tokio::test]
    async fn test_failure_in_later_group_keeps_earlier_groups() {
        let dir = tempfile::tempdir().unwrap();
        let items = make_items(dir.path(), 1200);
        let group_one: HashSet<String> = items.iter().take(500).map(|(k, _)| k.clone()).collect();
        let failing_key = items[502].0.clone();

        let store = Arc::new(RecordingStore::new(Some(failing_key.clone())));
        let dyn_store: Arc<dyn ContentStore> = store.clone();
        let uploader = BatchUploader::new(500);

        let err = uploader.upload_all(&dyn_store, items).await.unwrap_err();
        assert_eq!(err.key, failing_key);

        let recorded: HashSet<String> = store.recorded().into_iter().collect();
        // Every item from the first group is persisted.
        assert!(group_one.is_subset(&recorded));
        // The third group never started.
        assert!(!recorded.contains("frames/1-frame-1001.jpg"));
        assert!(!recorded.contains("frames/1-frame-1200.jpg"));
        assert!(recorded.len() < 1000);
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let store: Arc<dyn ContentStore> = Arc::new(RecordingStore::new(None));
        let uploader = BatchUploader::new(500);

        let keys = uploader.upload_all(&store, Vec::new()).await.unwrap();
        assert!(keys.is_empty());
    }
}
