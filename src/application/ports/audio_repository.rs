use async_trait::async_trait;

use crate::domain::{AudioId, AudioOrder, AudioRecord, NewAudio, Page, PageRequest, UserId};

use super::RepositoryError;

#[async_trait]
pub trait AudioRepository: Send + Sync {
    /// Persists a new record; the store assigns the id and a zero view count.
    async fn insert(&self, audio: &NewAudio) -> Result<AudioRecord, RepositoryError>;

    async fn find_by_id(&self, id: AudioId) -> Result<Option<AudioRecord>, RepositoryError>;

    /// Returns the records that exist among `ids`, in no particular order.
    async fn find_many(&self, ids: &[AudioId]) -> Result<Vec<AudioRecord>, RepositoryError>;

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<AudioRecord>, RepositoryError>;

    /// Case-insensitive substring search on title. An empty keyword matches
    /// every record.
    async fn search(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError>;

    async fn list(
        &self,
        order: AudioOrder,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError>;

    async fn sample(&self, size: usize) -> Result<Vec<AudioRecord>, RepositoryError>;

    /// Returns `false` when no record with `id` exists.
    async fn increment_views(&self, id: AudioId, by: i64) -> Result<bool, RepositoryError>;

    /// Deletes the record and every folder membership referencing it.
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: AudioId) -> Result<bool, RepositoryError>;
}
