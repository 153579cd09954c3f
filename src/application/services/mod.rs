mod audio_service;
mod folder_service;
mod ownership;

pub use audio_service::{AudioService, AudioServiceError, FileUpload, LinkUpload, MAX_TITLE_CHARS};
pub use folder_service::{FolderSearch, FolderService, FolderServiceError};
pub use ownership::{AccessError, load_owned};
