mod in_memory_store;
mod pg_audio_repository;
mod pg_folder_repository;

pub use in_memory_store::InMemoryStore;
pub use pg_audio_repository::PgAudioRepository;
pub use pg_folder_repository::PgFolderRepository;
