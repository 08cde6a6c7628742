use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;

/// A bucket-addressed object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Upload the file at `path` under `key`, replacing any existing object.
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Publicly reachable URL for `key`. Deterministic: depends only on the
    /// store's configuration and the key.
    fn public_url(&self, key: &str) -> String;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        (**self).put_file(key, path, content_type).await
    }

    fn public_url(&self, key: &str) -> String {
        (**self).public_url(key)
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
