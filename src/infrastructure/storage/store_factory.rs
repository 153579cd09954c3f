use std::sync::Arc;

use crate::application::ports::{AudioObjectStore, ObjectStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::blob_audio_store::BlobAudioStore;

pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn AudioObjectStore>, ObjectStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let store = BlobAudioStore::local(
                    &settings.local_path,
                    &settings.public_base_url,
                    &settings.bucket,
                )?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Azure => {
                let account = settings.azure_account.as_deref().ok_or_else(|| {
                    ObjectStoreError::Configuration("azure_account required".into())
                })?;
                let key = settings.azure_access_key.as_deref().ok_or_else(|| {
                    ObjectStoreError::Configuration("azure_access_key required".into())
                })?;
                let container = settings
                    .azure_container
                    .as_deref()
                    .unwrap_or(&settings.bucket);
                let store =
                    BlobAudioStore::azure(account, key, container, &settings.public_base_url)?;
                Ok(Arc::new(store))
            }
        }
    }
}
