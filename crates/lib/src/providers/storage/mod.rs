pub mod gcs;

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by an object store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load storage credentials: {0}")]
    Credentials(String),
    #[error("Failed to upload '{object}': {message}")]
    Upload { object: String, message: String },
    #[error("Failed to sign URL for '{object}': {message}")]
    Sign { object: String, message: String },
}

/// A trait for a bucket-scoped cloud object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Writes `data` as the content of object `name`.
    async fn upload(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Returns a URL granting anonymous GET access to object `name` for `expires_in`.
    async fn signed_url(&self, name: &str, expires_in: Duration) -> Result<String, StorageError>;
}
