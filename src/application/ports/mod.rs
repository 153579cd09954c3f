mod audio_object_store;
mod audio_repository;
mod folder_repository;
mod key_value_cache;
mod repository_error;
mod token_verifier;
mod transcoder;

pub use audio_object_store::{AudioObjectStore, ObjectStoreError};
pub use audio_repository::AudioRepository;
pub use folder_repository::FolderRepository;
pub use key_value_cache::{CacheError, KeyValueCache};
pub use repository_error::RepositoryError;
pub use token_verifier::{AuthError, TokenClaims, TokenVerifier};
pub use transcoder::{LinkTranscode, Transcoder, TranscoderError};
