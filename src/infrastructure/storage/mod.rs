mod blob_audio_store;
mod store_factory;

pub use blob_audio_store::BlobAudioStore;
pub use store_factory::AudioStoreFactory;
