use thiserror::Error;

/// Errors raised while placing an object in storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read local file {0}: {1}")]
    LocalRead(String, String),

    #[error("Bucket {0} does not exist")]
    NoSuchBucket(String),

    #[error("Access denied for object {0}: {1}")]
    AccessDenied(String, String),

    #[error("Failed to upload object {0}: {1}")]
    Upload(String, String),
}
