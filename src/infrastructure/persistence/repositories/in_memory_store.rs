use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::application::ports::{AudioRepository, FolderRepository, RepositoryError};
use crate::domain::{
    AudioId, AudioOrder, AudioRecord, Folder, FolderId, FolderQuery, FolderSort, LikeToggle,
    NewAudio, Page, PageRequest, UserId,
};

#[derive(Default)]
struct StoreState {
    /// Insertion order doubles as creation order.
    audio: Vec<AudioRecord>,
    folders: HashMap<FolderId, Folder>,
    memberships: Vec<(FolderId, AudioId)>,
    /// Like order doubles as "most recently liked" order.
    likes: Vec<(FolderId, UserId)>,
}

/// Process-local store implementing both repositories over shared state, so
/// cascades behave as they do with the relational schema. Used in scaffold
/// mode and tests.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

fn compare_folders(sort: FolderSort, a: &Folder, b: &Folder) -> Ordering {
    let latest_first = b.updated_at.cmp(&a.updated_at);
    let by_id = a.id.as_uuid().cmp(&b.id.as_uuid());
    match sort {
        FolderSort::DateLatest => latest_first.then(by_id),
        FolderSort::DateLast => a.updated_at.cmp(&b.updated_at).then(by_id),
        FolderSort::LikeAsc => a.like_count.cmp(&b.like_count).then(latest_first).then(by_id),
        FolderSort::LikeDesc => b.like_count.cmp(&a.like_count).then(latest_first).then(by_id),
    }
}

#[async_trait]
impl AudioRepository for InMemoryStore {
    async fn insert(&self, audio: &NewAudio) -> Result<AudioRecord, RepositoryError> {
        let record = AudioRecord {
            id: AudioId::new(),
            owner_id: audio.owner_id.clone(),
            url: audio.url.clone(),
            title: audio.title.clone(),
            filter: audio.filter,
            view_count: 0,
            duration_seconds: audio.duration_seconds,
        };
        self.state.lock().await.audio.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: AudioId) -> Result<Option<AudioRecord>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.audio.iter().find(|a| a.id == id).cloned())
    }

    async fn find_many(&self, ids: &[AudioId]) -> Result<Vec<AudioRecord>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .audio
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<AudioRecord>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .audio
            .iter()
            .rev()
            .filter(|a| &a.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError> {
        let needle = keyword.to_lowercase();
        let state = self.state.lock().await;
        let matches: Vec<AudioRecord> = state
            .audio
            .iter()
            .rev()
            .filter(|a| a.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        Ok(Page::new(
            paginate(&matches, page),
            matches.len() as i64,
            page,
        ))
    }

    async fn list(
        &self,
        order: AudioOrder,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError> {
        let state = self.state.lock().await;
        let mut all: Vec<AudioRecord> = state.audio.iter().rev().cloned().collect();
        match order {
            AudioOrder::Latest => {}
            AudioOrder::Last => all.reverse(),
            AudioOrder::ViewsDesc => all.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
            AudioOrder::ViewsAsc => all.sort_by(|a, b| a.view_count.cmp(&b.view_count)),
        }

        Ok(Page::new(paginate(&all, page), all.len() as i64, page))
    }

    async fn sample(&self, size: usize) -> Result<Vec<AudioRecord>, RepositoryError> {
        let state = self.state.lock().await;
        let mut rng = rand::thread_rng();
        Ok(state
            .audio
            .choose_multiple(&mut rng, size)
            .cloned()
            .collect())
    }

    async fn increment_views(&self, id: AudioId, by: i64) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        match state.audio.iter_mut().find(|a| a.id == id) {
            Some(audio) => {
                audio.view_count += by;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: AudioId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.audio.len();
        state.audio.retain(|a| a.id != id);
        if state.audio.len() == before {
            return Ok(false);
        }
        state.memberships.retain(|(_, audio)| *audio != id);
        Ok(true)
    }
}

#[async_trait]
impl FolderRepository for InMemoryStore {
    async fn insert(&self, creator: &UserId, name: &str) -> Result<Folder, RepositoryError> {
        let mut state = self.state.lock().await;
        if state.folders.values().any(|f| f.name == name) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "folder name {} exists",
                name
            )));
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            creator_id: creator.clone(),
            name: name.to_string(),
            like_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_by_id(&self, id: FolderId) -> Result<Option<Folder>, RepositoryError> {
        Ok(self.state.lock().await.folders.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Folder>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.folders.values().find(|f| f.name == name).cloned())
    }

    async fn rename(&self, id: FolderId, name: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.folders.values().any(|f| f.name == name && f.id != id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "folder name {} exists",
                name
            )));
        }
        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        folder.name = name.to_string();
        folder.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: FolderId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        if state.folders.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|(folder, _)| *folder != id);
        state.likes.retain(|(folder, _)| *folder != id);
        Ok(true)
    }

    async fn add_audio(&self, folder: FolderId, audio: AudioId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if !state.audio.iter().any(|a| a.id == audio) {
            return Err(RepositoryError::NotFound(audio.to_string()));
        }
        if state.memberships.contains(&(folder, audio)) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "audio {} already in folder {}",
                audio, folder
            )));
        }
        let entry = state
            .folders
            .get_mut(&folder)
            .ok_or_else(|| RepositoryError::NotFound(folder.to_string()))?;
        entry.updated_at = Utc::now();
        state.memberships.push((folder, audio));
        Ok(())
    }

    async fn remove_audio(
        &self,
        folder: FolderId,
        audio: AudioId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.memberships.len();
        state.memberships.retain(|pair| *pair != (folder, audio));
        if state.memberships.len() == before {
            return Ok(false);
        }
        if let Some(entry) = state.folders.get_mut(&folder) {
            entry.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn membership(&self, folder: FolderId) -> Result<Vec<AudioId>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .iter()
            .filter(|(f, _)| *f == folder)
            .map(|(_, audio)| *audio)
            .collect())
    }

    async fn toggle_like(
        &self,
        folder: FolderId,
        user: &UserId,
    ) -> Result<LikeToggle, RepositoryError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let entry = state
            .folders
            .get_mut(&folder)
            .ok_or_else(|| RepositoryError::NotFound(folder.to_string()))?;

        match state
            .likes
            .iter()
            .position(|(f, u)| *f == folder && u == user)
        {
            Some(index) => {
                state.likes.remove(index);
                entry.like_count -= 1;
                Ok(LikeToggle::Unliked)
            }
            None => {
                state.likes.push((folder, user.clone()));
                entry.like_count += 1;
                Ok(LikeToggle::Liked)
            }
        }
    }

    async fn is_liked(&self, folder: FolderId, user: &UserId) -> Result<bool, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.likes.iter().any(|(f, u)| *f == folder && u == user))
    }

    async fn liked_among(
        &self,
        user: &UserId,
        folders: &[FolderId],
    ) -> Result<HashSet<FolderId>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .likes
            .iter()
            .filter(|(f, u)| u == user && folders.contains(f))
            .map(|(f, _)| *f)
            .collect())
    }

    async fn search(&self, query: &FolderQuery) -> Result<Page<Folder>, RepositoryError> {
        let keyword = query.keyword.as_ref().map(|k| k.to_lowercase());
        let state = self.state.lock().await;
        let mut matches: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| {
                keyword
                    .as_ref()
                    .is_none_or(|k| f.name.to_lowercase().contains(k.as_str()))
            })
            .filter(|f| query.creator.as_ref().is_none_or(|c| &f.creator_id == c))
            .cloned()
            .collect();
        matches.sort_by(|a, b| compare_folders(query.sort, a, b));

        Ok(Page::new(
            paginate(&matches, query.page),
            matches.len() as i64,
            query.page,
        ))
    }

    async fn liked_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Page<Folder>, RepositoryError> {
        let state = self.state.lock().await;
        let liked: Vec<Folder> = state
            .likes
            .iter()
            .rev()
            .filter(|(_, u)| u == user)
            .filter_map(|(f, _)| state.folders.get(f).cloned())
            .collect();

        Ok(Page::new(paginate(&liked, page), liked.len() as i64, page))
    }
}
