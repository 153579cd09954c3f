use std::io;
use std::path::Path;

#[async_trait::async_trait]
pub trait AudioObjectStore: Send + Sync {
    /// Uploads the file at `local_path` under `key` and returns its public
    /// URL.
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, ObjectStoreError>;

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
