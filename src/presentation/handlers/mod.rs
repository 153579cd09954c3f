mod audio;
pub mod dto;
mod error;
mod extract;
mod folder;
mod health;

pub use audio::{
    delete_audio_handler, get_audio_handler, list_audio_handler, my_audio_handler,
    random_audio_handler, search_audio_handler, upload_file_handler, upload_link_handler,
};
pub use error::{ApiError, ErrorResponse};
pub use extract::{AuthUser, ClientIp, OptionalUser, TrustProxyHeaders};
pub use folder::{
    add_audio_handler, create_folder_handler, delete_folder_handler, get_folder_handler,
    liked_folders_handler, remove_audio_handler, rename_folder_handler, search_folder_handler,
    toggle_like_handler,
};
pub use health::health_handler;
