use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{AudioObjectStore, ObjectStoreError};

/// [`AudioObjectStore`] over any `object_store` backend. Objects are written
/// under their key; the public URL is `{url_base}/{key}`.
pub struct BlobAudioStore {
    inner: Arc<dyn ObjectStore>,
    url_base: String,
}

impl BlobAudioStore {
    pub fn new(inner: Arc<dyn ObjectStore>, public_base_url: &str, bucket: &str) -> Self {
        Self {
            inner,
            url_base: format!("{}/{}", public_base_url.trim_end_matches('/'), bucket),
        }
    }

    /// Files land in `{base_path}/{bucket}`.
    pub fn local(
        base_path: impl Into<PathBuf>,
        public_base_url: &str,
        bucket: &str,
    ) -> Result<Self, ObjectStoreError> {
        let root = base_path.into().join(bucket);
        std::fs::create_dir_all(&root)?;
        let fs = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| ObjectStoreError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(fs), public_base_url, bucket))
    }

    pub fn azure(
        account: &str,
        access_key: &str,
        container: &str,
        public_base_url: &str,
    ) -> Result<Self, ObjectStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| ObjectStoreError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(store), public_base_url, container))
    }

    pub fn in_memory(public_base_url: &str, bucket: &str) -> Self {
        Self::new(Arc::new(InMemory::new()), public_base_url, bucket)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_base, key)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        match self.inner.head(&StorePath::from(key)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(ObjectStoreError::Configuration(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl AudioObjectStore for BlobAudioStore {
    #[tracing::instrument(skip(self, local_path))]
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, ObjectStoreError> {
        let data = Bytes::from(tokio::fs::read(local_path).await?);
        let size = data.len();

        self.inner
            .put(&StorePath::from(key), PutPayload::from(data))
            .await
            .map_err(|e| ObjectStoreError::UploadFailed(e.to_string()))?;

        tracing::debug!(size, "Audio object stored");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.inner
            .delete(&StorePath::from(key))
            .await
            .map_err(|e| ObjectStoreError::DeleteFailed(e.to_string()))
    }
}
