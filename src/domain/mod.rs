mod audio;
mod audio_filter;
mod audio_order;
mod folder;
mod folder_sort;
mod page;
mod scratch_key;
mod user_id;

pub use audio::{AudioId, AudioRecord, NewAudio};
pub use audio_filter::AudioFilter;
pub use audio_order::AudioOrder;
pub use folder::{
    Folder, FolderDetail, FolderId, FolderQuery, FolderSummary, LikeToggle, MAX_FOLDER_NAME_CHARS,
};
pub use folder_sort::FolderSort;
pub use page::{PAGE_SIZE, Page, PageRequest};
pub use scratch_key::ScratchKey;
pub use user_id::{Owned, UserId};
