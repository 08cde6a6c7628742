//! In-process object store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use babycontest_core::naming::object_url;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StorageError;
use crate::store::ObjectStore;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

/// Keeps uploaded objects in memory.
///
/// Public URLs follow the same virtual-hosted S3 pattern as the real store so
/// pages rendered against it look identical. Uploads can be forced to fail
/// with [`MemoryObjectStore::fail_uploads`].
#[derive(Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    region: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: &str, region: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            region: region.to_string(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Make every following upload fail with `message`.
    pub async fn fail_uploads(&self, message: &str) {
        *self.failure.lock().await = Some(message.to_string());
    }

    /// Stored bytes for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(key).map(|o| o.data.clone())
    }

    /// Content type recorded for `key`, if any.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .await
            .get(key)
            .and_then(|o| o.content_type.clone())
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(StorageError::Upload(key.to_string(), message));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::LocalRead(path.display().to_string(), e.to_string()))?;

        debug!(key, bytes = data.len(), "Stored object in memory");
        self.objects.lock().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
