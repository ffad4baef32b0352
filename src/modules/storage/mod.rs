//! Storage module for project images
//!
//! Images are opaque blobs referenced from `projects.image` by URL. The
//! `ImageStorage` trait is what services depend on; `MinIOClient` is the
//! S3-compatible implementation used in production.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `data` under `path` (relative to the public prefix) and return its public URL
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// Remove the object a URL previously returned by `upload` points at.
    ///
    /// URLs that do not belong to this storage are ignored.
    async fn delete_by_url(&self, url: &str) -> Result<(), AppError>;
}
