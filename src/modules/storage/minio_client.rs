//! MinIO/S3-compatible storage client for project images.
//!
//! Uses the rust-s3 crate with path-style URLs. Every image is written under
//! the public prefix so the URL stored on the project can be served directly.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::ImageStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOClient {
    /// Create a client and make sure its bucket exists
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to create MinIO bucket: {}", e)))?;

        // http://endpoint/bucket instead of http://bucket.endpoint
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
        };

        client.ensure_bucket_exists().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, public_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix
        );

        Ok(client)
    }

    /// Create the bucket if missing; existing buckets are fine
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn object_key(&self, path: &str) -> String {
        object_key(&self.public_prefix, path)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    /// Object key behind a URL produced by this client (public or internal endpoint)
    fn extract_key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .find_map(|endpoint| extract_key(endpoint, &bucket, url))
    }
}

fn object_key(public_prefix: &str, path: &str) -> String {
    format!(
        "{}/{}",
        public_prefix.trim_matches('/'),
        path.trim_start_matches('/')
    )
}

fn extract_key(endpoint: &str, bucket: &str, url: &str) -> Option<String> {
    let prefix = format!("{}/{}/", endpoint, bucket);
    url.strip_prefix(&prefix)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ImageStorage for MinIOClient {
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let key = self.object_key(path);
        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(self.public_url(&key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        let Some(key) = self.extract_key_from_url(url) else {
            warn!("Image URL '{}' is not managed by this storage; skipping delete", url);
            return Ok(());
        };

        self.bucket
            .delete_object(&key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", key, e)))?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_joins_prefix() {
        assert_eq!(object_key("public", "projects/a.png"), "public/projects/a.png");
        assert_eq!(object_key("/public/", "/projects/a.png"), "public/projects/a.png");
    }

    #[test]
    fn test_extract_key() {
        assert_eq!(
            extract_key(
                "http://cdn.test",
                "uploads",
                "http://cdn.test/uploads/public/projects/a.png"
            )
            .as_deref(),
            Some("public/projects/a.png")
        );
        assert_eq!(
            extract_key("http://cdn.test", "uploads", "http://elsewhere/a.png"),
            None
        );
        assert_eq!(
            extract_key("http://cdn.test", "uploads", "http://cdn.test/uploads/"),
            None
        );
    }
}
