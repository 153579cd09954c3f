use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{AudioRepository, RepositoryError};
use crate::domain::{AudioId, AudioOrder, AudioRecord, NewAudio, Page, PageRequest, UserId};
use crate::infrastructure::persistence::{like_pattern, map_sqlx_error};

const AUDIO_COLUMNS: &str = "id, owner_id, url, title, filter, view_count, duration_seconds";

#[derive(sqlx::FromRow)]
struct AudioRow {
    id: Uuid,
    owner_id: String,
    url: String,
    title: String,
    filter: String,
    view_count: i64,
    duration_seconds: f64,
}

impl TryFrom<AudioRow> for AudioRecord {
    type Error = RepositoryError;

    fn try_from(r: AudioRow) -> Result<Self, Self::Error> {
        Ok(AudioRecord {
            id: AudioId::from_uuid(r.id),
            owner_id: UserId::new(r.owner_id),
            url: r.url,
            title: r.title,
            filter: r.filter.parse().map_err(RepositoryError::QueryFailed)?,
            view_count: r.view_count,
            duration_seconds: r.duration_seconds,
        })
    }
}

fn into_records(rows: Vec<AudioRow>) -> Result<Vec<AudioRecord>, RepositoryError> {
    rows.into_iter().map(AudioRecord::try_from).collect()
}

fn order_clause(order: AudioOrder) -> &'static str {
    match order {
        AudioOrder::Latest => "created_at DESC, id",
        AudioOrder::Last => "created_at ASC, id",
        AudioOrder::ViewsDesc => "view_count DESC, created_at DESC, id",
        AudioOrder::ViewsAsc => "view_count ASC, created_at DESC, id",
    }
}

pub struct PgAudioRepository {
    pool: PgPool,
}

impl PgAudioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AudioRepository for PgAudioRepository {
    #[instrument(skip(self, audio), fields(owner = %audio.owner_id))]
    async fn insert(&self, audio: &NewAudio) -> Result<AudioRecord, RepositoryError> {
        let row: AudioRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO audio (owner_id, url, title, filter, duration_seconds)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {AUDIO_COLUMNS}
            "#
        ))
        .bind(audio.owner_id.as_str())
        .bind(&audio.url)
        .bind(&audio.title)
        .bind(audio.filter.as_str())
        .bind(audio.duration_seconds)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.try_into()
    }

    #[instrument(skip(self), fields(audio_id = %id))]
    async fn find_by_id(&self, id: AudioId) -> Result<Option<AudioRecord>, RepositoryError> {
        let row: Option<AudioRow> =
            sqlx::query_as(&format!("SELECT {AUDIO_COLUMNS} FROM audio WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(AudioRecord::try_from).transpose()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[AudioId]) -> Result<Vec<AudioRecord>, RepositoryError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let rows: Vec<AudioRow> =
            sqlx::query_as(&format!("SELECT {AUDIO_COLUMNS} FROM audio WHERE id = ANY($1)"))
                .bind(&uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        into_records(rows)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<AudioRecord>, RepositoryError> {
        let rows: Vec<AudioRow> = sqlx::query_as(&format!(
            "SELECT {AUDIO_COLUMNS} FROM audio WHERE owner_id = $1 ORDER BY created_at DESC, id"
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        into_records(rows)
    }

    #[instrument(skip(self), fields(page = page.number()))]
    async fn search(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError> {
        let pattern = like_pattern(keyword);

        let rows: Vec<AudioRow> = sqlx::query_as(&format!(
            r#"
            SELECT {AUDIO_COLUMNS} FROM audio
            WHERE title ILIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM audio WHERE title ILIKE $1 ESCAPE '\'"#)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(Page::new(into_records(rows)?, count, page))
    }

    #[instrument(skip(self), fields(order = %order, page = page.number()))]
    async fn list(
        &self,
        order: AudioOrder,
        page: PageRequest,
    ) -> Result<Page<AudioRecord>, RepositoryError> {
        let rows: Vec<AudioRow> = sqlx::query_as(&format!(
            "SELECT {AUDIO_COLUMNS} FROM audio ORDER BY {} LIMIT $1 OFFSET $2",
            order_clause(order)
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audio")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Page::new(into_records(rows)?, count, page))
    }

    async fn sample(&self, size: usize) -> Result<Vec<AudioRecord>, RepositoryError> {
        let rows: Vec<AudioRow> = sqlx::query_as(&format!(
            "SELECT {AUDIO_COLUMNS} FROM audio ORDER BY random() LIMIT $1"
        ))
        .bind(size as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        into_records(rows)
    }

    #[instrument(skip(self), fields(audio_id = %id))]
    async fn increment_views(&self, id: AudioId, by: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE audio SET view_count = view_count + $1 WHERE id = $2")
            .bind(by)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(audio_id = %id))]
    async fn delete(&self, id: AudioId) -> Result<bool, RepositoryError> {
        // folder_audio rows cascade through the foreign key.
        let result = sqlx::query("DELETE FROM audio WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
