//! Content-store abstraction trait
//!
//! This module defines the ContentStore trait that all storage backends must
//! implement.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Content-store abstraction trait
///
/// Durable key-addressed blob storage with signed-URL retrieval. The
/// pipeline only ever talks to this trait, never to a concrete backend.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist `data` under `key` with the given content type and return the key.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Fetch the full object bytes stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Generate a time-limited URL for direct GET access to `key`.
    ///
    /// Retrieval hands out a URL rather than bytes so callers can stream
    /// the object themselves.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete the object stored under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
