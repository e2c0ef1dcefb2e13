use crate::utils::format::{format_file_size, format_timestamp};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File path must include folder (e.g. \"image/filename.jpg\")")]
    InvalidPath,

    #[error("File not found or access denied")]
    NotFound,

    #[error("Storage request failed: {0}")]
    Write(String),
}

/// Storage-reported object attributes, as returned by a head request.
#[derive(Debug, Clone)]
pub struct ObjectAttributes {
    pub content_length: u64,
    pub content_type: Option<String>,
    pub storage_class: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// The opaque bucket capability: put/head/delete by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
    async fn head_object(&self, key: &str) -> Result<ObjectAttributes, StorageError>;
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

/// S3-compatible implementation (Cloudflare R2 in production).
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<ObjectAttributes, StorageError> {
        // Absence and denied access are deliberately not distinguished here.
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("head_object failed for {}: {}", key, e);
                StorageError::NotFound
            })?;

        let last_modified = res.last_modified.and_then(|d| {
            DateTime::from_timestamp(d.secs(), d.subsec_nanos())
        });

        Ok(ObjectAttributes {
            content_length: res.content_length.unwrap_or(0).max(0) as u64,
            content_type: res.content_type,
            storage_class: res.storage_class.map(|c| c.as_str().to_string()),
            last_modified,
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        Ok(())
    }
}

/// Display-friendly metadata view returned by every read path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileDescription {
    pub size: String,
    pub mimetype: String,
    #[serde(rename = "storageClass")]
    pub storage_class: String,
    pub expiry: String,
    pub name: String,
    pub path: String,
    pub modified: String,
    pub url: String,
}

const NO_EXPIRY: &str = "No Expiry Unless Deleted";

/// Wraps the opaque bucket with folder-path preconditions and derives the
/// public metadata view (formatted size, formatted date, public URL).
pub struct StorageGateway {
    store: Arc<dyn ObjectStore>,
    public_domain: String,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn ObjectStore>, public_domain: String) -> Self {
        Self {
            store,
            public_domain,
        }
    }

    pub async fn put(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        Self::check_path(path)?;
        self.store.put_object(path, bytes, content_type).await
    }

    /// Fetches storage-side attributes and renders the public view.
    pub async fn describe(&self, path: &str) -> Result<FileDescription, StorageError> {
        Self::check_path(path)?;
        let attrs = self.store.head_object(path).await?;

        Ok(FileDescription {
            size: format_file_size(attrs.content_length),
            mimetype: attrs
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            storage_class: attrs.storage_class.unwrap_or_else(|| "Standard".to_string()),
            expiry: NO_EXPIRY.to_string(),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            modified: format_timestamp(attrs.last_modified.unwrap_or_else(Utc::now)),
            url: format!("https://{}/{}", self.public_domain, path),
        })
    }

    /// Deletes without checking prior existence; callers wanting pre-delete
    /// metadata must `describe` first.
    pub async fn remove(&self, path: &str) -> Result<(), StorageError> {
        Self::check_path(path)?;
        self.store.delete_object(path).await
    }

    fn check_path(path: &str) -> Result<(), StorageError> {
        if path.contains('/') {
            Ok(())
        } else {
            Err(StorageError::InvalidPath)
        }
    }
}
