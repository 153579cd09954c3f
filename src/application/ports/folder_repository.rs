use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{AudioId, Folder, FolderId, FolderQuery, LikeToggle, Page, PageRequest, UserId};

use super::RepositoryError;

#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Fails with `ConstraintViolation` when the name is already taken.
    async fn insert(&self, creator: &UserId, name: &str) -> Result<Folder, RepositoryError>;

    async fn find_by_id(&self, id: FolderId) -> Result<Option<Folder>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Folder>, RepositoryError>;

    /// Fails with `ConstraintViolation` when the name is already taken and
    /// `NotFound` when the folder does not exist.
    async fn rename(&self, id: FolderId, name: &str) -> Result<(), RepositoryError>;

    /// Deletes the folder together with its memberships and likes.
    async fn delete(&self, id: FolderId) -> Result<bool, RepositoryError>;

    /// Fails with `ConstraintViolation` when the pair already exists.
    /// Refreshes the folder's `updated_at`.
    async fn add_audio(&self, folder: FolderId, audio: AudioId) -> Result<(), RepositoryError>;

    /// Returns `false` when the pair did not exist. Refreshes the folder's
    /// `updated_at` otherwise.
    async fn remove_audio(
        &self,
        folder: FolderId,
        audio: AudioId,
    ) -> Result<bool, RepositoryError>;

    /// Audio ids in insertion order.
    async fn membership(&self, folder: FolderId) -> Result<Vec<AudioId>, RepositoryError>;

    /// Inserts or deletes the like row and adjusts the folder's like count
    /// in the same unit of work.
    async fn toggle_like(
        &self,
        folder: FolderId,
        user: &UserId,
    ) -> Result<LikeToggle, RepositoryError>;

    async fn is_liked(&self, folder: FolderId, user: &UserId) -> Result<bool, RepositoryError>;

    /// The subset of `folders` liked by `user`.
    async fn liked_among(
        &self,
        user: &UserId,
        folders: &[FolderId],
    ) -> Result<HashSet<FolderId>, RepositoryError>;

    async fn search(&self, query: &FolderQuery) -> Result<Page<Folder>, RepositoryError>;

    /// Folders liked by `user`, most recently liked first.
    async fn liked_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Page<Folder>, RepositoryError>;
}
