// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Bucket-scoped access to the object store
//!
//! Both stages see the store through [`Storage`], which binds an
//! `ObjectStore` to one bucket and knows how to render the bucket's
//! objects as URIs for response bodies.

use crate::config::StorageConfig;
use crate::{PipelineError, Result};
use bytes::Bytes;
use diagnostics::*;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;
use std::time::Duration;

const S3_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn ObjectStore>,
    uri_root: String,
    /// Whether the backend records a content type with each object
    content_types: bool,
}

impl Storage {
    /// Build the backend described by `config` for `bucket`
    pub async fn open(config: &StorageConfig, bucket: &str) -> Result<Self> {
        let bucket = bucket.trim();
        if bucket.is_empty() {
            return Err(PipelineError::MissingConfiguration(vec![
                crate::config::BUCKET_ENV,
            ]));
        }

        match config {
            StorageConfig::S3 {
                region,
                endpoint,
                allow_http,
            } => {
                use object_store::{ClientOptions, aws::AmazonS3Builder};

                info!("Opening S3 bucket {bucket}", bucket);
                let client_options = ClientOptions::new()
                    .with_timeout(Duration::from_secs(S3_TIMEOUT_SECONDS))
                    .with_allow_http(*allow_http);

                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_client_options(client_options);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }

                let store = builder
                    .build()
                    .map_err(|e| PipelineError::Config(format!("Failed to build S3 client: {e}")))?;
                Ok(Self::new(Arc::new(store), format!("s3://{bucket}"), true))
            }
            StorageConfig::Local { root } => {
                if bucket.contains(['/', '\\']) || bucket.contains("..") {
                    return Err(PipelineError::Config(format!(
                        "bucket {bucket:?} is not a valid directory name"
                    )));
                }

                let dir = root.join(bucket);
                let dir_display = dir.display().to_string();
                info!("Opening local bucket directory {dir_display}", dir_display: dir_display.as_str());

                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    PipelineError::Config(format!("Failed to create {dir_display}: {e}"))
                })?;
                let store = object_store::local::LocalFileSystem::new_with_prefix(&dir)
                    .map_err(|e| {
                        PipelineError::Config(format!("Failed to create local store: {e}"))
                    })?;

                // LocalFileSystem rejects object attributes
                Ok(Self::new(
                    Arc::new(store),
                    format!("file://{dir_display}"),
                    false,
                ))
            }
            StorageConfig::Memory => Ok(Self::in_memory(bucket)),
        }
    }

    /// Wrap an existing store; `uri_root` is prepended to keys in URIs
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, uri_root: String, content_types: bool) -> Self {
        Self {
            store,
            uri_root: uri_root.trim_end_matches('/').to_string(),
            content_types,
        }
    }

    /// Fresh in-memory bucket
    #[must_use]
    pub fn in_memory(bucket: &str) -> Self {
        Self::new(
            Arc::new(object_store::memory::InMemory::new()),
            format!("memory://{bucket}"),
            true,
        )
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Full URI of `key`, e.g. `s3://bucket/raw_data/x.json`
    #[must_use]
    pub fn uri(&self, key: &str) -> String {
        format!("{}/{}", self.uri_root, key)
    }

    /// Unconditional write of one object
    pub async fn put(&self, key: &str, data: impl Into<Bytes>, content_type: &'static str) -> Result<()> {
        let data: Bytes = data.into();
        let size = data.len();

        let mut options = PutOptions::default();
        if self.content_types {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.into());
            options.attributes = attributes;
        }

        self.store
            .put_opts(&Path::from(key), PutPayload::from(data), options)
            .await?;

        debug!("Wrote {size} bytes to {key}", size, key);
        Ok(())
    }

    /// Read a whole object
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let data = self.store.get(&Path::from(key)).await?.bytes().await?;
        Ok(data)
    }

    /// Every object under `prefix`
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let prefix_path = Path::from(prefix);
        let objects: Vec<ObjectMeta> = self.store.list(Some(&prefix_path)).try_collect().await?;

        let count = objects.len();
        debug!("Listed {count} objects under {prefix}", count, prefix);
        Ok(objects)
    }

    /// Newest object under `prefix` by last-modified time
    pub async fn latest(&self, prefix: &str) -> Result<Option<ObjectMeta>> {
        Ok(select_latest(self.list(prefix).await?))
    }
}

/// Object with the greatest last-modified time
///
/// On an exact tie the object listed last wins.
#[must_use]
pub fn select_latest(objects: Vec<ObjectMeta>) -> Option<ObjectMeta> {
    objects.into_iter().max_by_key(|meta| meta.last_modified)
}
