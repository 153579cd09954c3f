use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{AudioRepository, FolderRepository, RepositoryError};
use crate::domain::{
    AudioId, Folder, FolderDetail, FolderId, FolderQuery, FolderSort, FolderSummary, LikeToggle,
    MAX_FOLDER_NAME_CHARS, Page, PageRequest, UserId,
};

use super::ownership::{AccessError, load_owned};

/// Filters accepted by folder search. Empty strings mean "no filter".
#[derive(Debug, Clone, Default)]
pub struct FolderSearch {
    pub keyword: Option<String>,
    pub creator: Option<String>,
    pub page: PageRequest,
    pub sort: FolderSort,
}

pub struct FolderService {
    folder_repository: Arc<dyn FolderRepository>,
    audio_repository: Arc<dyn AudioRepository>,
}

impl FolderService {
    pub fn new(
        folder_repository: Arc<dyn FolderRepository>,
        audio_repository: Arc<dyn AudioRepository>,
    ) -> Self {
        Self {
            folder_repository,
            audio_repository,
        }
    }

    /// Folder names are unique across all users, compared case-sensitively.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, owner: &UserId, name: &str) -> Result<Folder, FolderServiceError> {
        let name = validate_folder_name(name)?;

        if self.folder_repository.find_by_name(&name).await?.is_some() {
            return Err(name_taken());
        }

        let folder = self
            .folder_repository
            .insert(owner, &name)
            .await
            .map_err(conflict_as(name_taken))?;

        tracing::info!(folder_id = %folder.id, owner = %owner, "Folder created");
        Ok(folder)
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename(
        &self,
        owner: &UserId,
        folder_id: &str,
        new_name: &str,
    ) -> Result<(), FolderServiceError> {
        let id = parse_folder_id(folder_id)?;
        let name = validate_folder_name(new_name)?;
        load_owned(self.folder_repository.find_by_id(id), owner, "folder").await?;

        if let Some(existing) = self.folder_repository.find_by_name(&name).await? {
            if existing.id != id {
                return Err(name_taken());
            }
        }

        self.folder_repository
            .rename(id, &name)
            .await
            .map_err(conflict_as(name_taken))
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_audio(
        &self,
        owner: &UserId,
        folder_id: &str,
        audio_id: &str,
    ) -> Result<(), FolderServiceError> {
        let folder = parse_folder_id(folder_id)?;
        let audio = parse_audio_id(audio_id)?;
        load_owned(self.folder_repository.find_by_id(folder), owner, "folder").await?;

        if self.audio_repository.find_by_id(audio).await?.is_none() {
            return Err(audio_missing());
        }

        match self.folder_repository.add_audio(folder, audio).await {
            Err(RepositoryError::NotFound(_)) => Err(self.vanished_parent(audio).await),
            result => result.map_err(conflict_as(|| {
                FolderServiceError::Conflict("audio already exists in this folder".to_string())
            })),
        }
    }

    /// Names the parent that disappeared between the existence checks and
    /// the membership insert.
    async fn vanished_parent(&self, audio: AudioId) -> FolderServiceError {
        match self.audio_repository.find_by_id(audio).await {
            Ok(None) => audio_missing(),
            Ok(Some(_)) => folder_missing(),
            Err(e) => e.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_audio(
        &self,
        owner: &UserId,
        folder_id: &str,
        audio_id: &str,
    ) -> Result<(), FolderServiceError> {
        let folder = parse_folder_id(folder_id)?;
        let audio = parse_audio_id(audio_id)?;
        load_owned(self.folder_repository.find_by_id(folder), owner, "folder").await?;

        if !self.folder_repository.remove_audio(folder, audio).await? {
            return Err(FolderServiceError::NotFound(
                "audio does not exist in this folder".to_string(),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn toggle_like(
        &self,
        user: &UserId,
        folder_id: &str,
    ) -> Result<LikeToggle, FolderServiceError> {
        let id = parse_folder_id(folder_id)?;
        if self.folder_repository.find_by_id(id).await?.is_none() {
            return Err(folder_missing());
        }

        let toggle = self
            .folder_repository
            .toggle_like(id, user)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => folder_missing(),
                other => other.into(),
            })?;
        tracing::debug!(folder_id = %id, user = %user, action = toggle.as_str(), "Like toggled");
        Ok(toggle)
    }

    /// Folder metadata with its audio in membership order. `like_status` is
    /// only resolved when a requester is known.
    pub async fn get(
        &self,
        folder_id: &str,
        requester: Option<&UserId>,
    ) -> Result<FolderDetail, FolderServiceError> {
        let id = parse_folder_id(folder_id)?;
        let folder = self
            .folder_repository
            .find_by_id(id)
            .await?
            .ok_or_else(folder_missing)?;

        let members = self.folder_repository.membership(id).await?;
        let mut by_id: HashMap<AudioId, _> = self
            .audio_repository
            .find_many(&members)
            .await?
            .into_iter()
            .map(|audio| (audio.id, audio))
            .collect();
        let audio = members.iter().filter_map(|id| by_id.remove(id)).collect();

        let like_status = match requester {
            Some(user) => Some(self.folder_repository.is_liked(id, user).await?),
            None => None,
        };

        Ok(FolderDetail {
            folder,
            audio,
            like_status,
        })
    }

    pub async fn search(
        &self,
        search: FolderSearch,
        requester: Option<&UserId>,
    ) -> Result<Page<FolderSummary>, FolderServiceError> {
        let query = FolderQuery {
            keyword: non_empty(search.keyword),
            creator: non_empty(search.creator).map(UserId::new),
            sort: search.sort,
            page: search.page,
        };

        let page = self.folder_repository.search(&query).await?;

        let Some(user) = requester else {
            return Ok(page.map(|folder| FolderSummary {
                folder,
                like_status: None,
            }));
        };

        let ids: Vec<FolderId> = page.items.iter().map(|f| f.id).collect();
        let liked = self.folder_repository.liked_among(user, &ids).await?;

        Ok(page.map(|folder| {
            let like_status = Some(liked.contains(&folder.id));
            FolderSummary {
                folder,
                like_status,
            }
        }))
    }

    /// Owner-only. Memberships and likes go with the folder.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &UserId, folder_id: &str) -> Result<(), FolderServiceError> {
        let id = parse_folder_id(folder_id)?;
        load_owned(self.folder_repository.find_by_id(id), owner, "folder").await?;

        if !self.folder_repository.delete(id).await? {
            return Err(folder_missing());
        }

        tracing::info!(folder_id = %id, owner = %owner, "Folder deleted");
        Ok(())
    }

    pub async fn liked_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Page<FolderSummary>, FolderServiceError> {
        let page = self.folder_repository.liked_by(user, page).await?;
        Ok(page.map(|folder| FolderSummary {
            folder,
            like_status: Some(true),
        }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_folder_name(raw: &str) -> Result<String, FolderServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(FolderServiceError::Validation(
            "folderName is required".to_string(),
        ));
    }
    if name.chars().count() > MAX_FOLDER_NAME_CHARS {
        return Err(FolderServiceError::Validation(format!(
            "folderName must be at most {} characters",
            MAX_FOLDER_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}

fn parse_folder_id(raw: &str) -> Result<FolderId, FolderServiceError> {
    FolderId::parse(raw).ok_or_else(folder_missing)
}

fn parse_audio_id(raw: &str) -> Result<AudioId, FolderServiceError> {
    AudioId::parse(raw).ok_or_else(audio_missing)
}

fn folder_missing() -> FolderServiceError {
    FolderServiceError::NotFound("folder does not exist".to_string())
}

fn audio_missing() -> FolderServiceError {
    FolderServiceError::NotFound("audio does not exist".to_string())
}

fn name_taken() -> FolderServiceError {
    FolderServiceError::Conflict("folder name already exists".to_string())
}

/// Maps a store-level uniqueness violation to a user-facing conflict. The
/// store constraint is what settles check-then-act races.
fn conflict_as(
    conflict: impl Fn() -> FolderServiceError,
) -> impl Fn(RepositoryError) -> FolderServiceError {
    move |e| match e {
        RepositoryError::ConstraintViolation(_) => conflict(),
        RepositoryError::NotFound(_) => folder_missing(),
        other => FolderServiceError::Repository(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FolderServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<AccessError> for FolderServiceError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Missing(kind) => {
                FolderServiceError::NotFound(format!("{} does not exist", kind))
            }
            AccessError::NotOwner(kind) => {
                FolderServiceError::Forbidden(format!("{} does not belong to you", kind))
            }
            AccessError::Repository(e) => FolderServiceError::Repository(e),
        }
    }
}
