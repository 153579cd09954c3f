use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioObjectStore, AudioRepository, KeyValueCache, RepositoryError, Transcoder,
    TranscoderError,
};
use crate::domain::{
    AudioFilter, AudioId, AudioOrder, AudioRecord, NewAudio, Page, PageRequest, ScratchKey, UserId,
};

use super::ownership::{AccessError, load_owned};

/// Longest accepted audio title, in characters.
pub const MAX_TITLE_CHARS: usize = 75;

const RANDOM_SAMPLE_SIZE: usize = 15;

/// A multipart file upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub name: String,
    pub filter: String,
}

/// A YouTube link upload. `name` falls back to the source title.
#[derive(Debug, Clone)]
pub struct LinkUpload {
    pub youtube_link: String,
    pub filter: String,
    pub name: Option<String>,
}

pub struct AudioService {
    audio_repository: Arc<dyn AudioRepository>,
    transcoder: Arc<dyn Transcoder>,
    object_store: Arc<dyn AudioObjectStore>,
    view_cache: Arc<dyn KeyValueCache>,
    view_window: Duration,
}

impl AudioService {
    pub fn new(
        audio_repository: Arc<dyn AudioRepository>,
        transcoder: Arc<dyn Transcoder>,
        object_store: Arc<dyn AudioObjectStore>,
        view_cache: Arc<dyn KeyValueCache>,
        view_window: Duration,
    ) -> Self {
        Self {
            audio_repository,
            transcoder,
            object_store,
            view_cache,
            view_window,
        }
    }

    #[tracing::instrument(
        skip(self, upload),
        fields(file_name = %upload.file_name, bytes = upload.data.len())
    )]
    pub async fn upload_by_file(
        &self,
        owner: &UserId,
        upload: FileUpload,
    ) -> Result<AudioRecord, AudioServiceError> {
        let title = validate_title(&upload.name)?;
        validate_mp3_file_name(&upload.file_name)?;
        let filter = parse_filter(&upload.filter)?;
        if upload.data.is_empty() {
            return Err(AudioServiceError::Validation("file is empty".to_string()));
        }

        let key = ScratchKey::generate();
        tracing::debug!(key = %key, filter = %filter, "Transcoding uploaded file");

        let transcoded = self
            .transcoder
            .filter_by_file(&upload.data, &key, filter)
            .await
            .map(|output| (output, title))
            .map_err(|e| transcoder_failure(&key, e));

        self.complete_upload(owner, &key, filter, transcoded).await
    }

    #[tracing::instrument(skip(self, upload), fields(link = %upload.youtube_link))]
    pub async fn upload_by_link(
        &self,
        owner: &UserId,
        upload: LinkUpload,
    ) -> Result<AudioRecord, AudioServiceError> {
        validate_link(&upload.youtube_link)?;
        let filter = parse_filter(&upload.filter)?;
        let name = match upload.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(validate_title(name)?),
            _ => None,
        };

        let key = ScratchKey::generate();
        tracing::debug!(key = %key, filter = %filter, "Transcoding linked source");

        let transcoded = self
            .transcoder
            .filter_by_link(upload.youtube_link.trim(), &key, filter)
            .await
            .map(|link| {
                let title = name.unwrap_or_else(|| fallback_title(&link.source_title));
                (link.output, title)
            })
            .map_err(|e| transcoder_failure(&key, e));

        self.complete_upload(owner, &key, filter, transcoded).await
    }

    async fn complete_upload(
        &self,
        owner: &UserId,
        key: &ScratchKey,
        filter: AudioFilter,
        transcoded: Result<(PathBuf, String), AudioServiceError>,
    ) -> Result<AudioRecord, AudioServiceError> {
        let staged = match transcoded {
            Ok((output, title)) => self.measure_and_store(key, output).await.map(
                |(duration_seconds, url)| NewAudio {
                    owner_id: owner.clone(),
                    url,
                    title,
                    filter,
                    duration_seconds,
                },
            ),
            Err(e) => Err(e),
        };

        let new_audio = match staged {
            Ok(new_audio) => new_audio,
            Err(e) => {
                self.transcoder.cleanup(key).await;
                return Err(e);
            }
        };

        let (_, inserted) = tokio::join!(
            self.transcoder.cleanup(key),
            self.audio_repository.insert(&new_audio)
        );

        match inserted {
            Ok(record) => {
                tracing::info!(
                    audio_id = %record.id,
                    owner = %owner,
                    duration_seconds = record.duration_seconds,
                    "Audio uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Failed to persist audio record");
                if let Err(del_err) = self.object_store.delete(&key.object_key()).await {
                    tracing::warn!(
                        error = %del_err,
                        key = %key,
                        "Failed to remove orphaned object"
                    );
                }
                Err(AudioServiceError::UploadFailed)
            }
        }
    }

    async fn measure_and_store(
        &self,
        key: &ScratchKey,
        output: PathBuf,
    ) -> Result<(f64, String), AudioServiceError> {
        let duration = self
            .transcoder
            .measure_duration(&output)
            .await
            .map_err(|e| transcoder_failure(key, e))?;

        let url = self
            .object_store
            .upload(&key.object_key(), &output)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Object store upload failed");
                AudioServiceError::UploadFailed
            })?;

        Ok((duration, url))
    }

    /// Fetches a record and counts a view at most once per requester within
    /// the view window. Concurrent first views from the same requester can
    /// both count; the window is a best-effort de-duplication only.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        audio_id: &str,
        requester_ip: &str,
    ) -> Result<AudioRecord, AudioServiceError> {
        let id = parse_audio_id(audio_id)?;
        let mut audio = self
            .audio_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AudioServiceError::NotFound("audio does not exist".to_string()))?;

        let key = view_key(id, requester_ip);
        match self.view_cache.get(&key).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                let (marked, incremented) = tokio::join!(
                    self.view_cache.set_with_ttl(&key, "1", self.view_window),
                    self.audio_repository.increment_views(id, 1)
                );
                if let Err(e) = marked {
                    tracing::warn!(error = %e, "Failed to record view marker");
                }
                match incremented {
                    Ok(true) => audio.view_count += 1,
                    Ok(false) => {}
                    Err(e) => tracing::warn!(error = %e, "Failed to increment view count"),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "View cache unavailable, skipping view count");
            }
        }

        Ok(audio)
    }

    pub async fn search(
        &self,
        page: PageRequest,
        keyword: &str,
    ) -> Result<Page<AudioRecord>, AudioServiceError> {
        Ok(self.audio_repository.search(keyword.trim(), page).await?)
    }

    pub async fn list(
        &self,
        page: PageRequest,
        order: AudioOrder,
    ) -> Result<Page<AudioRecord>, AudioServiceError> {
        Ok(self.audio_repository.list(order, page).await?)
    }

    pub async fn random(&self) -> Result<Vec<AudioRecord>, AudioServiceError> {
        Ok(self.audio_repository.sample(RANDOM_SAMPLE_SIZE).await?)
    }

    pub async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<AudioRecord>, AudioServiceError> {
        Ok(self.audio_repository.list_by_owner(owner).await?)
    }

    /// Owner-only. Folder memberships referencing the record go with it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: &UserId, audio_id: &str) -> Result<(), AudioServiceError> {
        let id = parse_audio_id(audio_id)?;
        load_owned(self.audio_repository.find_by_id(id), owner, "audio").await?;

        if !self.audio_repository.delete(id).await? {
            return Err(AudioServiceError::NotFound("audio does not exist".to_string()));
        }

        tracing::info!(audio_id = %id, owner = %owner, "Audio deleted");
        Ok(())
    }
}

fn view_key(id: AudioId, requester_ip: &str) -> String {
    format!("view:{}:{}", id, requester_ip)
}

fn parse_audio_id(raw: &str) -> Result<AudioId, AudioServiceError> {
    AudioId::parse(raw)
        .ok_or_else(|| AudioServiceError::NotFound("audio does not exist".to_string()))
}

fn parse_filter(raw: &str) -> Result<AudioFilter, AudioServiceError> {
    raw.parse::<AudioFilter>().map_err(|_| {
        AudioServiceError::Validation(
            "filter must be one of Default, NightCore, Stereo, NoiseFilter".to_string(),
        )
    })
}

fn validate_title(raw: &str) -> Result<String, AudioServiceError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AudioServiceError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AudioServiceError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

fn validate_mp3_file_name(file_name: &str) -> Result<(), AudioServiceError> {
    let lower = file_name.trim().to_ascii_lowercase();
    match lower.strip_suffix(".mp3") {
        Some(stem) if !stem.is_empty() => Ok(()),
        Some(_) => Err(AudioServiceError::Validation("file name is empty".to_string())),
        None => Err(AudioServiceError::Validation("only mp3 files are allowed".to_string())),
    }
}

fn validate_link(raw: &str) -> Result<(), AudioServiceError> {
    let invalid = || AudioServiceError::Validation("youtubeLink must be a valid URL".to_string());
    let url = url::Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

fn fallback_title(source_title: &str) -> String {
    let title: String = source_title.trim().chars().take(MAX_TITLE_CHARS).collect();
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title
    }
}

fn transcoder_failure(key: &ScratchKey, error: TranscoderError) -> AudioServiceError {
    match error {
        TranscoderError::TooLong {
            seconds,
            max_seconds,
        } => {
            tracing::info!(
                key = %key,
                seconds,
                max_seconds,
                "Rejected audio over duration ceiling"
            );
            AudioServiceError::TooLong { max_seconds }
        }
        TranscoderError::UnboundedSource(reason) => {
            tracing::info!(key = %key, %reason, "Rejected link without a fixed duration");
            AudioServiceError::Validation("link has no fixed duration".to_string())
        }
        other => {
            tracing::error!(error = %other, key = %key, "Transcoding failed");
            AudioServiceError::UploadFailed
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("audio is too long (max {max_seconds} seconds)")]
    TooLong { max_seconds: u64 },
    #[error("upload failed")]
    UploadFailed,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<AccessError> for AudioServiceError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Missing(_) => {
                AudioServiceError::NotFound("audio does not exist".to_string())
            }
            AccessError::NotOwner(_) => {
                AudioServiceError::Forbidden("audio does not belong to you".to_string())
            }
            AccessError::Repository(e) => AudioServiceError::Repository(e),
        }
    }
}
